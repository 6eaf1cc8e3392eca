//! Client for the QIWI wallet HTTP API: typed decoding of service responses,
//! an endpoint facade over a pluggable transport, and payment form links.

pub mod api;
pub mod config;
pub mod decode;
pub mod error;
pub mod form;
pub mod models;
pub mod params;
pub mod requests;
pub mod wallet;

pub use api::{HttpTransport, Params, Transport};
pub use config::ClientConfig;
pub use decode::{format_date, parse_date, Decode};
pub use error::{Error, Result};
pub use form::{generate_form_link, AccountTypeSelector, BlockedField};
pub use requests::{Cheque, ChequeFormat, HistoryQuery, IdentificationRequest, Operation, SendRequest, Source};
pub use wallet::Wallet;
