use rust_decimal::Decimal;
use serde::Deserialize;
use std::env;
use wayfare_booking::RefundPolicy;
use wayfare_catalog::PricingConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
    /// The single identity allowed to alter user roles.
    #[serde(default)]
    pub master_admin_email: Option<String>,
}

/// Commercial knobs. Defaults match the published cancellation policy and
/// rate card; ops can override any of them per environment.
#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    #[serde(default = "default_suite_surcharge")]
    pub suite_surcharge: Decimal,
    #[serde(default = "default_insurance_rate")]
    pub insurance_rate: Decimal,
    #[serde(default = "default_early_cancel_days")]
    pub early_cancel_days: f64,
    #[serde(default = "default_early_cancel_fraction")]
    pub early_cancel_fraction: Decimal,
    #[serde(default = "default_late_cancel_days")]
    pub late_cancel_days: f64,
    #[serde(default = "default_late_cancel_fraction")]
    pub late_cancel_fraction: Decimal,
}

fn default_suite_surcharge() -> Decimal {
    Decimal::new(500, 0)
}

fn default_insurance_rate() -> Decimal {
    Decimal::new(10, 2)
}

fn default_early_cancel_days() -> f64 {
    30.0
}

fn default_early_cancel_fraction() -> Decimal {
    Decimal::new(90, 2)
}

fn default_late_cancel_days() -> f64 {
    7.0
}

fn default_late_cancel_fraction() -> Decimal {
    Decimal::new(50, 2)
}

impl BusinessRules {
    pub fn pricing_config(&self) -> PricingConfig {
        PricingConfig {
            suite_surcharge: self.suite_surcharge,
            insurance_rate: self.insurance_rate,
        }
    }

    pub fn refund_policy(&self) -> RefundPolicy {
        RefundPolicy {
            early_cancel_days: self.early_cancel_days,
            early_cancel_fraction: self.early_cancel_fraction,
            late_cancel_days: self.late_cancel_days,
            late_cancel_fraction: self.late_cancel_fraction,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Environment-specific file is optional.
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in.
            .add_source(config::File::with_name("config/local").required(false))
            // `WAYFARE__SERVER__PORT=9000` style environment overrides.
            .add_source(config::Environment::with_prefix("WAYFARE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
