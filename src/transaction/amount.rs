/// Monetary amounts are kept in the smallest currency unit (cents).
pub type Cents = u64;

/// Multiply an amount by `factor`, rounding half-up to the nearest cent.
pub fn scale(amount: Cents, factor: f64) -> Cents {
    let scaled = (amount as f64 * factor).round();
    if scaled <= 0.0 { 0 } else { scaled as Cents }
}

/// `pct` percent of `amount`, rounded to the nearest cent.
pub fn percent_of(amount: Cents, pct: f64) -> Cents {
    scale(amount, pct / 100.0)
}

/// One of `parts` equal shares of `amount`, rounded half-up to the cent.
pub fn split(amount: Cents, parts: u32) -> Cents {
    let parts = u128::from(parts.max(1));
    ((u128::from(amount) * 2 + parts) / (2 * parts)) as Cents
}
