use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;
use wayfare_booking::repository::PackageRepository;
use wayfare_catalog::TravelPackage;
use wayfare_core::{DomainError, DomainResult};

pub struct PgPackageRepository {
    pool: PgPool,
}

impl PgPackageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct PackageRow {
    id: Uuid,
    name: String,
    destination: String,
    description: String,
    package_type: String,
    price: Decimal,
    duration_days: i32,
    start_date: NaiveDate,
    end_date: NaiveDate,
    max_people: i32,
    available: bool,
    is_featured: bool,
    created_by: Uuid,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl PackageRow {
    fn into_package(self) -> DomainResult<TravelPackage> {
        let package_type = self
            .package_type
            .parse()
            .map_err(|e: String| DomainError::Dependency(e.into()))?;
        Ok(TravelPackage {
            id: self.id,
            name: self.name,
            destination: self.destination,
            description: self.description,
            package_type,
            price: self.price,
            duration_days: self.duration_days,
            start_date: self.start_date,
            end_date: self.end_date,
            max_people: self.max_people,
            available: self.available,
            is_featured: self.is_featured,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const PACKAGE_COLUMNS: &str = "id, name, destination, description, package_type, price, \
     duration_days, start_date, end_date, max_people, available, is_featured, \
     created_by, created_at, updated_at";

#[async_trait]
impl PackageRepository for PgPackageRepository {
    async fn insert(&self, package: &TravelPackage) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO packages (id, name, destination, description, package_type, price, \
             duration_days, start_date, end_date, max_people, available, is_featured, \
             created_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
        )
        .bind(package.id)
        .bind(&package.name)
        .bind(&package.destination)
        .bind(&package.description)
        .bind(package.package_type.as_str())
        .bind(package.price)
        .bind(package.duration_days)
        .bind(package.start_date)
        .bind(package.end_date)
        .bind(package.max_people)
        .bind(package.available)
        .bind(package.is_featured)
        .bind(package.created_by)
        .bind(package.created_at)
        .bind(package.updated_at)
        .execute(&self.pool)
        .await
        .map_err(DomainError::dependency)?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<TravelPackage>> {
        let row: Option<PackageRow> =
            sqlx::query_as(&format!("SELECT {PACKAGE_COLUMNS} FROM packages WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(DomainError::dependency)?;
        row.map(PackageRow::into_package).transpose()
    }

    async fn update(&self, package: &TravelPackage) -> DomainResult<()> {
        let result = sqlx::query(
            "UPDATE packages SET name = $2, destination = $3, description = $4, \
             package_type = $5, price = $6, duration_days = $7, start_date = $8, \
             end_date = $9, max_people = $10, available = $11, is_featured = $12, \
             updated_at = $13 WHERE id = $1",
        )
        .bind(package.id)
        .bind(&package.name)
        .bind(&package.destination)
        .bind(&package.description)
        .bind(package.package_type.as_str())
        .bind(package.price)
        .bind(package.duration_days)
        .bind(package.start_date)
        .bind(package.end_date)
        .bind(package.max_people)
        .bind(package.available)
        .bind(package.is_featured)
        .bind(package.updated_at)
        .execute(&self.pool)
        .await
        .map_err(DomainError::dependency)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("package"));
        }
        Ok(())
    }

    async fn list(&self, only_available: bool) -> DomainResult<Vec<TravelPackage>> {
        let sql = if only_available {
            format!(
                "SELECT {PACKAGE_COLUMNS} FROM packages WHERE available ORDER BY created_at DESC"
            )
        } else {
            format!("SELECT {PACKAGE_COLUMNS} FROM packages ORDER BY created_at DESC")
        };
        let rows: Vec<PackageRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(DomainError::dependency)?;
        rows.into_iter().map(PackageRow::into_package).collect()
    }
}
