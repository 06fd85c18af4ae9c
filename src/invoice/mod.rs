pub mod book;
pub mod model;
pub mod pricing;

pub use book::InvoiceBook;
pub use model::{Invoice, InvoiceStatus};
pub use pricing::{InstallmentQuote, price_installments};

/// Day of the month a billing cycle closes.
pub const CLOSING_DAY: u32 = 5;

/// Day of the month payment is due.
pub const DUE_DAY: u32 = 15;

/// Share of the total that must be paid at minimum (percent).
pub const MINIMUM_PAYMENT_PCT: f64 = 15.0;

/// Monthly interest on installment plans (percent).
pub const INSTALLMENT_INTEREST_RATE: f64 = 2.5;

/// One-off penalty on the unpaid balance of an overdue invoice (percent).
pub const LATE_INTEREST_RATE: f64 = 5.0;

/// Plans up to this many installments carry no interest.
pub const INTEREST_FREE_INSTALLMENTS: u32 = 3;

pub const MAX_INSTALLMENTS: u32 = 24;
