use serde::Serialize;

use super::{INSTALLMENT_INTEREST_RATE, INTEREST_FREE_INSTALLMENTS, MAX_INSTALLMENTS};
use crate::error::{LedgerError, LedgerResult};
use crate::transaction::{Cents, scale, split};

/// Price of a purchase split into installments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InstallmentQuote {
    pub original_amount: Cents,
    pub installments: u32,
    pub total_amount: Cents,
    pub installment_amount: Cents,
    /// Monthly rate in percent; zero for interest-free plans.
    pub interest_rate: f64,
}

impl InstallmentQuote {
    pub fn interest_amount(&self) -> Cents {
        self.total_amount - self.original_amount
    }
}

/// Compound the monthly rate over plans longer than the interest-free
/// threshold: `total = round(amount * (1 + rate)^n)`.
pub fn price_installments(amount: Cents, installments: u32) -> LedgerResult<InstallmentQuote> {
    if amount == 0 {
        return Err(LedgerError::NonPositiveAmount);
    }
    if !(1..=MAX_INSTALLMENTS).contains(&installments) {
        return Err(LedgerError::validation(format!(
            "installments must be between 1 and {MAX_INSTALLMENTS}"
        )));
    }

    let (total_amount, interest_rate) = if installments > INTEREST_FREE_INSTALLMENTS {
        let monthly = INSTALLMENT_INTEREST_RATE / 100.0;
        let factor = (1.0 + monthly).powi(installments as i32);
        (scale(amount, factor), INSTALLMENT_INTEREST_RATE)
    } else {
        (amount, 0.0)
    };

    Ok(InstallmentQuote {
        original_amount: amount,
        installments,
        total_amount,
        installment_amount: split(total_amount, installments),
        interest_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_installments_compound_monthly() {
        // 1200.00 * 1.025^6 = 1391.632...
        let q = price_installments(120_000, 6).unwrap();
        assert_eq!(q.total_amount, 139_163);
        assert_eq!(q.interest_rate, 2.5);
        assert_eq!(q.interest_amount(), 19_163);
        assert_eq!(q.installment_amount, 23_194); // 23_193.83
    }

    #[test]
    fn up_to_three_installments_are_interest_free() {
        for n in 1..=3 {
            let q = price_installments(120_000, n).unwrap();
            assert_eq!(q.total_amount, 120_000);
            assert_eq!(q.interest_rate, 0.0);
            assert_eq!(q.interest_amount(), 0);
        }
        assert_eq!(price_installments(120_000, 3).unwrap().installment_amount, 40_000);
    }

    #[test]
    fn four_installments_start_charging() {
        // 1000.00 * 1.025^4 = 1103.8128...
        let q = price_installments(100_000, 4).unwrap();
        assert_eq!(q.total_amount, 110_381);
    }

    #[test]
    fn rejects_out_of_range_counts() {
        assert!(matches!(
            price_installments(1_000, 0),
            Err(LedgerError::Validation(_))
        ));
        assert!(matches!(
            price_installments(1_000, 25),
            Err(LedgerError::Validation(_))
        ));
        assert!(price_installments(1_000, 24).is_ok());
        assert_eq!(
            price_installments(0, 2),
            Err(LedgerError::NonPositiveAmount)
        );
    }
}
