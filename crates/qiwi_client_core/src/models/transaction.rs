//! Payment history entries, history pages and period totals.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};

use super::Money;
use crate::decode::{serialize_date, serialize_opt_date, Decode, Fields};
use crate::error::Result;

/// One payment-history entry. `status` and `txn_type` are passed through verbatim.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Transaction {
    pub txn_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_id: Option<u64>,
    #[serde(serialize_with = "serialize_date")]
    pub date: DateTime<FixedOffset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub status: String,
    #[serde(rename = "type")]
    pub txn_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trm_txn_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
    pub sum: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commission: Option<Money>,
    pub total: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<Provider>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub currency_rate: Option<Decimal>,
    /// Provider-specific payment fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extras: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cheque_ready: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_document_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_payment_enabled: Option<bool>,
}

impl Decode for Transaction {
    const ENTITY: &'static str = "Transaction";

    fn decode_fields(f: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            txn_id: f.u64("txnId")?,
            person_id: f.opt_u64("personId")?,
            date: f.date("date")?,
            error_code: f.opt_i64("errorCode")?,
            error: f.opt_str("error")?,
            status: f.str("status")?,
            txn_type: f.str("type")?,
            status_text: f.opt_str("statusText")?,
            trm_txn_id: f.opt_id("trmTxnId")?,
            account: f.opt_str("account")?,
            sum: f.nested("sum")?,
            commission: f.opt_nested("commission")?,
            total: f.nested("total")?,
            provider: f.opt_nested("provider")?,
            comment: f.opt_str("comment")?,
            currency_rate: f.opt_decimal("currencyRate")?,
            extras: f.opt_object("extras")?,
            cheque_ready: f.opt_bool("chequeReady")?,
            bank_document_available: f.opt_bool("bankDocumentAvailable")?,
            repeat_payment_enabled: f.opt_bool("repeatPaymentEnabled")?,
        })
    }
}

/// Payee of a transaction.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Provider {
    pub id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
}

impl Decode for Provider {
    const ENTITY: &'static str = "Provider";

    fn decode_fields(f: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            id: f.u64("id")?,
            short_name: f.opt_str("shortName")?,
            long_name: f.opt_str("longName")?,
            logo_url: f.opt_str("logoUrl")?,
            description: f.opt_str("description")?,
            keys: f.opt_str("keys")?,
            site_url: f.opt_str("siteUrl")?,
        })
    }
}

/// One page of payment history plus the cursor for the next page.
///
/// Both cursor fields are `None` on the last page.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct History {
    #[serde(rename = "data")]
    pub transactions: Vec<Transaction>,
    #[serde(
        serialize_with = "serialize_opt_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub next_txn_date: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_txn_id: Option<u64>,
}

impl History {
    pub fn has_next(&self) -> bool {
        self.next_txn_date.is_some() && self.next_txn_id.is_some()
    }
}

impl Decode for History {
    const ENTITY: &'static str = "History";

    fn decode_fields(f: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            transactions: f.list("data")?,
            next_txn_date: f.opt_date("nextTxnDate")?,
            next_txn_id: f.opt_u64("nextTxnId")?,
        })
    }
}

/// Incoming and outgoing totals over a date range, one entry per currency.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Statistics {
    pub incoming_total: Vec<Money>,
    pub outgoing_total: Vec<Money>,
}

impl Decode for Statistics {
    const ENTITY: &'static str = "Statistics";

    fn decode_fields(f: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            incoming_total: f.list("incomingTotal")?,
            outgoing_total: f.list("outgoingTotal")?,
        })
    }
}
