//! Domain entities decoded from service responses.
//!
//! Every entity is built only through [`Decode`](crate::decode::Decode) and serialises
//! back to the service's camelCase JSON, omitting absent optionals.

mod account;
mod commission;
mod identity;
mod payment;
mod profile;
mod transaction;

pub use account::{find_balance, Account, AccountType, Rate};
pub use commission::{Commission, CommissionContent, CommissionRange, CommissionTerms, Tariff};
pub use identity::Identity;
pub use payment::{MobileProvider, OnlineCommission, Payment, PaymentState, PaymentTransaction, ResponseCode};
pub use profile::{AuthInfo, ContractInfo, IdentificationInfo, PassInfo, Profile, UserInfo};
pub use transaction::{History, Provider, Statistics, Transaction};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::decode::{Decode, Fields};
use crate::error::Result;

/// Russian rouble, ISO 4217 numeric.
pub const RUB: u16 = 643;

/// Amount with its ISO 4217 numeric currency code.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[non_exhaustive]
pub struct Money {
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: u16,
}

impl Decode for Money {
    const ENTITY: &'static str = "Money";

    fn decode_fields(f: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            amount: f.decimal("amount")?,
            currency: f.currency("currency")?,
        })
    }
}
