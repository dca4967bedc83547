use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;
use wayfare_booking::models::WalletTransaction;
use wayfare_booking::repository::WalletRepository;
use wayfare_core::{DomainError, DomainResult};

pub struct PgWalletRepository {
    pool: PgPool,
}

impl PgWalletRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    user_id: Uuid,
    amount: Decimal,
    kind: String,
    affects_balance: bool,
    description: String,
    booking_id: Option<Uuid>,
    date: DateTime<Utc>,
}

impl TransactionRow {
    fn into_transaction(self) -> DomainResult<WalletTransaction> {
        let kind = self
            .kind
            .parse()
            .map_err(|e: String| DomainError::Dependency(e.into()))?;
        Ok(WalletTransaction {
            id: self.id,
            user_id: self.user_id,
            amount: self.amount,
            kind,
            affects_balance: self.affects_balance,
            description: self.description,
            booking_id: self.booking_id,
            date: self.date,
        })
    }
}

async fn insert_ledger_row(
    tx: &mut Transaction<'_, Postgres>,
    entry: &WalletTransaction,
) -> DomainResult<()> {
    sqlx::query(
        "INSERT INTO wallet_transactions \
         (id, user_id, amount, kind, affects_balance, description, booking_id, date) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(entry.id)
    .bind(entry.user_id)
    .bind(entry.amount)
    .bind(entry.kind.as_str())
    .bind(entry.affects_balance)
    .bind(&entry.description)
    .bind(entry.booking_id)
    .bind(entry.date)
    .execute(&mut **tx)
    .await
    .map_err(DomainError::dependency)?;
    Ok(())
}

#[async_trait]
impl WalletRepository for PgWalletRepository {
    async fn credit(&self, entry: &WalletTransaction) -> DomainResult<Decimal> {
        // Balance increment and ledger row share one transaction: they
        // land together or not at all.
        let mut tx = self.pool.begin().await.map_err(DomainError::dependency)?;

        let balance: Option<Decimal> = sqlx::query_scalar(
            "UPDATE users SET wallet_balance = wallet_balance + $2, updated_at = NOW() \
             WHERE id = $1 RETURNING wallet_balance",
        )
        .bind(entry.user_id)
        .bind(entry.amount)
        .fetch_optional(&mut *tx)
        .await
        .map_err(DomainError::dependency)?;

        let balance = balance.ok_or(DomainError::NotFound("user"))?;
        insert_ledger_row(&mut tx, entry).await?;
        tx.commit().await.map_err(DomainError::dependency)?;

        Ok(balance)
    }

    async fn append_audit(&self, entry: &WalletTransaction) -> DomainResult<()> {
        let mut tx = self.pool.begin().await.map_err(DomainError::dependency)?;
        insert_ledger_row(&mut tx, entry).await?;
        tx.commit().await.map_err(DomainError::dependency)?;
        Ok(())
    }

    async fn balance(&self, user_id: Uuid) -> DomainResult<Decimal> {
        let balance: Option<Decimal> =
            sqlx::query_scalar("SELECT wallet_balance FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(DomainError::dependency)?;
        balance.ok_or(DomainError::NotFound("user"))
    }

    async fn history(&self, user_id: Uuid) -> DomainResult<Vec<WalletTransaction>> {
        let rows: Vec<TransactionRow> = sqlx::query_as(
            "SELECT id, user_id, amount, kind, affects_balance, description, booking_id, date \
             FROM wallet_transactions WHERE user_id = $1 ORDER BY date DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(DomainError::dependency)?;
        rows.into_iter()
            .map(TransactionRow::into_transaction)
            .collect()
    }
}
