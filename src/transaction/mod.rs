pub mod amount;
pub mod model;

pub use amount::{Cents, percent_of, scale, split};
pub use model::{DEFAULT_CARD_BRAND, Transaction, TransactionStatus, TransactionType};
