//! Payment submission results, online commission previews and mobile provider detection.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::Money;
use crate::decode::{Decode, Fields};
use crate::error::Result;

/// Commission preview for a prospective payment.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct OnlineCommission {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<u64>,
    /// Amount debited from the wallet.
    pub withdraw_sum: Money,
    /// Amount credited to the recipient.
    pub enrollment_sum: Money,
    pub qw_commission: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding_source_commission: Option<Money>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub withdraw_to_enrollment_rate: Option<Decimal>,
}

impl Decode for OnlineCommission {
    const ENTITY: &'static str = "OnlineCommission";

    fn decode_fields(f: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            provider_id: f.opt_u64("providerId")?,
            withdraw_sum: f.nested("withdrawSum")?,
            enrollment_sum: f.nested("enrollmentSum")?,
            qw_commission: f.nested("qwCommission")?,
            funding_source_commission: f.opt_nested("fundingSourceCommission")?,
            withdraw_to_enrollment_rate: f.opt_decimal("withdrawToEnrollmentRate")?,
        })
    }
}

/// Result of a submitted payment.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Payment {
    /// Client-side request id (Unix time in milliseconds when sent by this crate).
    pub id: String,
    /// Provider id the payment was made to.
    pub terms: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, String>>,
    pub sum: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction: Option<PaymentTransaction>,
}

impl Payment {
    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction.as_ref().map(|t| t.id.as_str())
    }

    /// State code reported by the service, e.g. `Accepted`.
    pub fn status(&self) -> Option<&str> {
        self.transaction.as_ref().map(|t| t.state.code.as_str())
    }

    /// Submission time, recovered from a millisecond request id.
    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.id
            .parse::<i64>()
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
    }
}

impl Decode for Payment {
    const ENTITY: &'static str = "Payment";

    fn decode_fields(f: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            id: f.id("id")?,
            terms: f.id("terms")?,
            fields: f.opt_str_map("fields")?,
            sum: f.nested("sum")?,
            source: f.opt_str("source")?,
            comment: f.opt_str("comment")?,
            transaction: f.opt_nested("transaction")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[non_exhaustive]
pub struct PaymentTransaction {
    pub id: String,
    pub state: PaymentState,
}

impl Decode for PaymentTransaction {
    const ENTITY: &'static str = "PaymentTransaction";

    fn decode_fields(f: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            id: f.id("id")?,
            state: f.nested("state")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[non_exhaustive]
pub struct PaymentState {
    pub code: String,
}

impl Decode for PaymentState {
    const ENTITY: &'static str = "PaymentState";

    fn decode_fields(f: &Fields<'_>) -> Result<Self> {
        Ok(Self { code: f.str("code")? })
    }
}

/// Answer of the mobile-number provider lookup.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[non_exhaustive]
pub struct MobileProvider {
    pub code: ResponseCode,
    /// Provider id on success, an explanation otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MobileProvider {
    pub fn provider_id(&self) -> Option<&str> {
        if self.code.value == "0" {
            self.message.as_deref().filter(|m| !m.is_empty())
        } else {
            None
        }
    }
}

impl Decode for MobileProvider {
    const ENTITY: &'static str = "MobileProvider";

    fn decode_fields(f: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            code: f.nested("code")?,
            message: f.opt_id("message")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[non_exhaustive]
pub struct ResponseCode {
    pub value: String,
    #[serde(rename = "_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Decode for ResponseCode {
    const ENTITY: &'static str = "ResponseCode";

    fn decode_fields(f: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            value: f.id("value")?,
            name: f.opt_str("_name")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use serde_json::json;

    #[test]
    fn decodes_online_commission() {
        let c = OnlineCommission::decode(&json!({
            "providerId": 99,
            "withdrawSum": {"amount": 10.2, "currency": "643"},
            "enrollmentSum": {"amount": 10, "currency": "643"},
            "qwCommission": {"amount": 0.2, "currency": "643"},
            "fundingSourceCommission": {"amount": 0, "currency": "643"},
            "withdrawToEnrollmentRate": 1
        }))
        .expect("decode");
        assert_eq!(c.provider_id, Some(99));
        assert_eq!(c.qw_commission.amount, Decimal::new(2, 1));
        assert_eq!(c.withdraw_sum.currency, 643);
        assert_eq!(c.withdraw_to_enrollment_rate, Some(Decimal::ONE));
    }

    #[test]
    fn online_commission_without_funding_source_commission() {
        let c = OnlineCommission::decode(&json!({
            "withdrawSum": {"amount": 10, "currency": 643},
            "enrollmentSum": {"amount": 10, "currency": 643},
            "qwCommission": {"amount": 0, "currency": 643}
        }))
        .expect("decode");
        assert_eq!(c.funding_source_commission, None);
        assert_eq!(c.provider_id, None);
    }

    #[test]
    fn decodes_payment() {
        let p = Payment::decode(&json!({
            "id": "1485784498000",
            "terms": "99",
            "fields": {"account": "+79121112233"},
            "sum": {"amount": 1, "currency": "643"},
            "source": "account_643",
            "comment": "test",
            "transaction": {"id": "4969142201", "state": {"code": "Accepted"}}
        }))
        .expect("decode");
        assert_eq!(p.terms, "99");
        assert_eq!(
            p.fields.as_ref().and_then(|f| f.get("account")).map(String::as_str),
            Some("+79121112233")
        );
        assert_eq!(p.transaction_id(), Some("4969142201"));
        assert_eq!(p.status(), Some("Accepted"));
        assert_eq!(p.sum.currency, 643);
        assert_eq!(p.date().map(|d| d.year()), Some(2017));
    }

    #[test]
    fn payment_without_transaction_has_no_status() {
        let p = Payment::decode(&json!({
            "id": "abc",
            "terms": 1,
            "sum": {"amount": 5, "currency": 643}
        }))
        .expect("decode");
        assert_eq!(p.terms, "1");
        assert_eq!(p.fields, None);
        assert_eq!(p.status(), None);
        assert_eq!(p.date(), None);
        let encoded = serde_json::to_value(&p).expect("serialize");
        assert!(encoded.get("fields").is_none());
        assert!(encoded.get("transaction").is_none());
    }

    #[test]
    fn mobile_provider_only_on_success_code() {
        let ok = MobileProvider::decode(&json!({"code": {"value": "0", "_name": "NORMAL"}, "message": "1"}))
            .expect("decode");
        assert_eq!(ok.provider_id(), Some("1"));
        let fail = MobileProvider::decode(&json!({"code": {"value": "2", "_name": "ERROR"}, "message": "Unknown"}))
            .expect("decode");
        assert_eq!(fail.provider_id(), None);
    }
}
