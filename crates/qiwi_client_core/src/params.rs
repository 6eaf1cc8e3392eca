//! Request parameter helpers shared by the form-link encoder and the wallet facade.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Drop everything past the cent, rounding toward zero.
pub fn truncate_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::ToZero)
}

/// Whole and fractional (cents) parts of a non-negative amount.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitAmount {
    pub integer: Decimal,
    pub cents: u32,
}

impl SplitAmount {
    pub fn new(amount: Decimal) -> Self {
        let amount = truncate_to_cents(amount);
        let integer = amount.trunc();
        let cents = ((amount - integer) * Decimal::ONE_HUNDRED)
            .trunc()
            .abs()
            .to_u32()
            .unwrap_or(0);
        Self { integer, cents }
    }

    /// Cents as the two-digit string the payment form expects.
    pub fn cents_str(&self) -> String {
        format!("{:02}", self.cents)
    }
}

/// `name[0]=a, name[1]=b, ...` pairs for list-valued parameters.
pub fn indexed<I, S>(name: &str, values: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .enumerate()
        .map(|(i, v)| (format!("{name}[{i}]"), v.as_ref().to_string()))
        .collect()
}

/// Percent-encode pairs into a query string, keeping their order.
pub fn encode_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}
