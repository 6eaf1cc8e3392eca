//! Crate-wide error type. Every failure the client can surface is a distinct variant.

use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed date {0:?}")]
    MalformedDate(String),

    #[error("amount {0} exceeds the single payment limit of 99999")]
    AmountTooLarge(Decimal),

    #[error("amount {0} is negative")]
    NegativeAmount(Decimal),

    #[error("blocked field must be one of sum, account, comment; got {0:?}")]
    InvalidBlockedField(String),

    #[error("no account holds a non-zero balance in currency {currency}")]
    NoUsableBalance { currency: u16 },

    #[error("{entity}: missing field `{field}`")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("{entity}: field `{field}` is not {expected}")]
    InvalidField {
        entity: &'static str,
        field: &'static str,
        expected: &'static str,
    },

    #[error("{entity}: expected a JSON object")]
    NotAnObject { entity: &'static str },

    #[error("could not detect mobile provider for {0}")]
    UnknownMobileProvider(String),

    #[error("rows must be between 1 and 50, got {0}")]
    InvalidRows(u8),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API responded {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
