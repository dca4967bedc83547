//! Wallet reconciliation helpers.
//!
//! The ledger is the source of truth: at any point, the sum of signed
//! contributions across a user's transactions must equal the stored
//! balance. Stores enforce this by pairing every balance mutation with
//! exactly one ledger row inside a single transaction.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::WalletTransaction;

/// Balance plus full history, newest first. The customer-facing wallet view.
#[derive(Debug, Clone, Serialize)]
pub struct WalletStatement {
    pub balance: Decimal,
    pub transactions: Vec<WalletTransaction>,
}

/// Sum of signed contributions across a ledger slice.
pub fn ledger_sum(transactions: &[WalletTransaction]) -> Decimal {
    transactions.iter().map(WalletTransaction::signed_amount).sum()
}

/// True when the stored balance matches the ledger history.
pub fn reconciles(balance: Decimal, transactions: &[WalletTransaction]) -> bool {
    ledger_sum(transactions) == balance
}
