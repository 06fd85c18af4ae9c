use thiserror::Error;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Failures raised while admitting transactions or building billing records.
///
/// Chain integrity problems are never raised through this type; they surface
/// only through `Blockchain::is_chain_valid`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Malformed or self-inconsistent input (bad month, installment count...).
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("transaction must include from and to address")]
    MissingParty,

    #[error("cannot add invalid transaction to chain")]
    InvalidTransaction,

    #[error("transaction amount should be higher than 0")]
    NonPositiveAmount,

    #[error("not enough balance (balance {balance}, required {required})")]
    InsufficientBalance { balance: i128, required: u64 },
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
