//! Standard (tariff) commission of a provider.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::decode::{Decode, Fields};
use crate::error::Result;

/// Provider form as far as the tariff goes: `content.terms.commission.ranges`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[non_exhaustive]
pub struct Commission {
    #[serde(rename = "id")]
    pub provider_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<CommissionContent>,
}

impl Commission {
    /// Tariff ranges ordered by `bound` as sent by the service; empty when the
    /// form carries no tariff.
    pub fn ranges(&self) -> &[CommissionRange] {
        self.content
            .as_ref()
            .and_then(|c| c.terms.as_ref())
            .and_then(|t| t.commission.as_ref())
            .and_then(|c| c.ranges.as_deref())
            .unwrap_or(&[])
    }

    /// Commission the tariff charges for `amount`, using the range with the
    /// greatest bound not above it.
    pub fn estimate(&self, amount: Decimal) -> Option<Decimal> {
        self.ranges()
            .iter()
            .filter(|r| r.bound <= amount)
            .max_by(|a, b| a.bound.cmp(&b.bound))
            .map(|r| r.apply(amount))
    }
}

impl Decode for Commission {
    const ENTITY: &'static str = "Commission";

    fn decode_fields(f: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            provider_id: f.id("id")?,
            content: f.opt_nested("content")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[non_exhaustive]
pub struct CommissionContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms: Option<CommissionTerms>,
}

impl Decode for CommissionContent {
    const ENTITY: &'static str = "CommissionContent";

    fn decode_fields(f: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            terms: f.opt_nested("terms")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[non_exhaustive]
pub struct CommissionTerms {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commission: Option<Tariff>,
}

impl Decode for CommissionTerms {
    const ENTITY: &'static str = "CommissionTerms";

    fn decode_fields(f: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            commission: f.opt_nested("commission")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[non_exhaustive]
pub struct Tariff {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranges: Option<Vec<CommissionRange>>,
}

impl Decode for Tariff {
    const ENTITY: &'static str = "Tariff";

    fn decode_fields(f: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            ranges: f.opt_list("ranges")?,
        })
    }
}

/// One tariff step: `fixed + amount * rate`, clamped to `[min, max]` where given.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[non_exhaustive]
pub struct CommissionRange {
    #[serde(with = "rust_decimal::serde::float")]
    pub bound: Decimal,
    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub fixed: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub rate: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub min: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::float_option", skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
}

impl CommissionRange {
    fn apply(&self, amount: Decimal) -> Decimal {
        let mut fee = self.fixed.unwrap_or_default() + amount * self.rate.unwrap_or_default();
        if let Some(min) = self.min.filter(|m| !m.is_zero()) {
            fee = fee.max(min);
        }
        if let Some(max) = self.max.filter(|m| !m.is_zero()) {
            fee = fee.min(max);
        }
        fee.round_dp(2)
    }
}

impl Decode for CommissionRange {
    const ENTITY: &'static str = "CommissionRange";

    fn decode_fields(f: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            bound: f.decimal("bound")?,
            fixed: f.opt_decimal("fixed")?,
            rate: f.opt_decimal("rate")?,
            min: f.opt_decimal("min")?,
            max: f.opt_decimal("max")?,
        })
    }
}
