//! Typed inputs for the wallet facade and the JSON bodies built from them.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::decode::{format_date, serialize_day};
use crate::error::{Error, Result};
use crate::models::{History, RUB};
use crate::params::{indexed, truncate_to_cents};

/// Operation filter for history and statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Operation {
    #[default]
    All,
    In,
    Out,
    QiwiCard,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::All => "ALL",
            Operation::In => "IN",
            Operation::Out => "OUT",
            Operation::QiwiCard => "QIWI_CARD",
        }
    }
}

/// Payment source filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Source {
    QwRub,
    QwUsd,
    QwEur,
    Card,
    Mk,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::QwRub => "QW_RUB",
            Source::QwUsd => "QW_USD",
            Source::QwEur => "QW_EUR",
            Source::Card => "CARD",
            Source::Mk => "MK",
        }
    }
}

pub const DEFAULT_ROWS: u8 = 20;
pub const MAX_ROWS: u8 = 50;

/// Payment history filter.
///
/// Dates and cursors come in pairs: the service rejects a start date without an
/// end date, and a cursor date without its transaction id. The period may span
/// at most 90 days.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryQuery {
    pub rows: u8,
    pub operation: Option<Operation>,
    pub sources: Vec<Source>,
    pub period: Option<(DateTime<FixedOffset>, DateTime<FixedOffset>)>,
    pub cursor: Option<(DateTime<FixedOffset>, u64)>,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            operation: None,
            sources: Vec::new(),
            period: None,
            cursor: None,
        }
    }
}

impl HistoryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(mut self, rows: u8) -> Self {
        self.rows = rows;
        self
    }

    pub fn operation(mut self, operation: Operation) -> Self {
        self.operation = Some(operation);
        self
    }

    pub fn sources(mut self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources = sources.into_iter().collect();
        self
    }

    pub fn period(mut self, start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        self.period = Some((start, end));
        self
    }

    /// Continue after `page`. Returns `None` when `page` was the last one.
    pub fn after(self, page: &History) -> Option<Self> {
        match (page.next_txn_date, page.next_txn_id) {
            (Some(date), Some(id)) => Some(Self {
                cursor: Some((date, id)),
                ..self
            }),
            _ => None,
        }
    }

    pub(crate) fn to_params(&self) -> Result<Vec<(String, String)>> {
        if !(1..=MAX_ROWS).contains(&self.rows) {
            return Err(Error::InvalidRows(self.rows));
        }
        let mut params = vec![("rows".to_string(), self.rows.to_string())];
        if let Some(op) = self.operation {
            params.push(("operation".to_string(), op.as_str().to_string()));
        }
        params.extend(indexed("sources", self.sources.iter().map(Source::as_str)));
        if let Some((start, end)) = &self.period {
            params.push(("startDate".to_string(), format_date(start)));
            params.push(("endDate".to_string(), format_date(end)));
        }
        if let Some((date, id)) = &self.cursor {
            params.push(("nextTxnDate".to_string(), format_date(date)));
            params.push(("nextTxnId".to_string(), id.to_string()));
        }
        Ok(params)
    }
}

/// A payment to submit.
///
/// `fields` carries provider-specific form fields (bank transfers, for example,
/// need `account_type`, `mfo`, `lname`...). `account` is always set from
/// `recipient`.
#[derive(Clone, Debug, PartialEq)]
pub struct SendRequest {
    pub provider_id: String,
    pub recipient: String,
    pub amount: Decimal,
    pub comment: Option<String>,
    pub fields: BTreeMap<String, String>,
}

impl SendRequest {
    pub fn new(provider_id: impl Into<String>, recipient: impl Into<String>, amount: Decimal) -> Self {
        Self {
            provider_id: provider_id.into(),
            recipient: recipient.into(),
            amount,
            comment: None,
            fields: BTreeMap::new(),
        }
    }

    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub(crate) fn body(&self, id: String) -> Result<PaymentBody<'_>> {
        if self.amount < Decimal::ZERO {
            return Err(Error::NegativeAmount(self.amount));
        }
        let mut fields: BTreeMap<&str, &str> = self
            .fields
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        fields.insert("account", &self.recipient);
        Ok(PaymentBody {
            id,
            sum: Sum::rub(self.amount),
            payment_method: PaymentMethod::wallet(),
            comment: self.comment.as_deref(),
            fields,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentBody<'a> {
    id: String,
    sum: Sum,
    payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<&'a str>,
    fields: BTreeMap<&'a str, &'a str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Sum {
    #[serde(with = "rust_decimal::serde::float")]
    amount: Decimal,
    currency: String,
}

impl Sum {
    /// Roubles, truncated to the cent.
    pub(crate) fn rub(amount: Decimal) -> Self {
        Self {
            amount: truncate_to_cents(amount),
            currency: RUB.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentMethod {
    #[serde(rename = "type")]
    kind: &'static str,
    account_id: String,
}

impl PaymentMethod {
    /// Pay from the rouble wallet balance.
    pub(crate) fn wallet() -> Self {
        Self {
            kind: "Account",
            account_id: RUB.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OnlineCommissionBody<'a> {
    account: &'a str,
    payment_method: PaymentMethod,
    purchase_totals: PurchaseTotals,
}

#[derive(Debug, Serialize)]
pub(crate) struct PurchaseTotals {
    total: Sum,
}

impl<'a> OnlineCommissionBody<'a> {
    pub(crate) fn new(recipient: &'a str, amount: Decimal) -> Self {
        Self {
            account: recipient,
            payment_method: PaymentMethod::wallet(),
            purchase_totals: PurchaseTotals {
                total: Sum::rub(amount),
            },
        }
    }
}

/// Personal data for simplified identification.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentificationRequest {
    #[serde(serialize_with = "serialize_day")]
    pub birth_date: NaiveDate,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    /// Series and number, digits only.
    pub passport: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snils: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oms: Option<String>,
}

/// Receipt file format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ChequeFormat {
    #[default]
    Pdf,
    Jpeg,
}

impl ChequeFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChequeFormat::Pdf => "PDF",
            ChequeFormat::Jpeg => "JPEG",
        }
    }
}

/// Outcome of a receipt request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Cheque {
    /// Mailed to the given address.
    Sent,
    File(Vec<u8>),
}
