//! Funding sources (balance slots) and exchange rates.

use rust_decimal::Decimal;
use serde::Serialize;

use super::Money;
use crate::decode::{Decode, Fields};
use crate::error::{Error, Result};

/// One balance-bearing slot of a wallet, e.g. `qw_wallet_rub`.
///
/// Offered accounts only carry `alias` and `currency`; everything else is absent.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Account {
    pub alias: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fs_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_balance: Option<bool>,
    /// `None` when the service sends `null` or omits the key; a zero balance is `Some`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balance: Option<Money>,
    pub currency: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_account: Option<bool>,
}

impl Account {
    /// Balance amount when present and non-zero.
    pub fn usable_balance(&self) -> Option<Decimal> {
        self.balance
            .as_ref()
            .map(|b| b.amount)
            .filter(|amount| !amount.is_zero())
    }
}

impl Decode for Account {
    const ENTITY: &'static str = "Account";

    fn decode_fields(f: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            alias: f.str("alias")?,
            fs_alias: f.opt_str("fsAlias")?,
            bank_alias: f.opt_str("bankAlias")?,
            title: f.opt_str("title")?,
            account_type: f.opt_nested("type")?,
            has_balance: f.opt_bool("hasBalance")?,
            balance: f.opt_nested("balance")?,
            currency: f.currency("currency")?,
            default_account: f.opt_bool("defaultAccount")?,
        })
    }
}

/// Kind of funding source (`WALLET`, `CARD`...).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[non_exhaustive]
pub struct AccountType {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Decode for AccountType {
    const ENTITY: &'static str = "AccountType";

    fn decode_fields(f: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            id: f.id("id")?,
            title: f.opt_str("title")?,
        })
    }
}

/// Amount of the first account holding a non-zero balance in `currency`.
///
/// Every account is scanned before giving up; accounts in the right currency but
/// without a usable balance are skipped.
pub fn find_balance(accounts: &[Account], currency: u16) -> Result<Decimal> {
    accounts
        .iter()
        .filter(|a| a.currency == currency)
        .find_map(Account::usable_balance)
        .ok_or(Error::NoUsableBalance { currency })
}

/// Cross rate between two currencies.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[non_exhaustive]
pub struct Rate {
    pub from: u16,
    pub to: u16,
    #[serde(with = "rust_decimal::serde::float")]
    pub rate: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,
}

impl Decode for Rate {
    const ENTITY: &'static str = "Rate";

    fn decode_fields(f: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            from: f.currency("from")?,
            to: f.currency("to")?,
            rate: f.decimal("rate")?,
            set: f.opt_str("set")?,
        })
    }
}
