//! Pre-filled payment form links (`https://qiwi.com/payment/form/<pid>?...`).
//!
//! Building a link is pure: no request is made and nothing is remembered
//! between calls.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::models::RUB;
use crate::params::{encode_query, indexed, SplitAmount};

pub const FORM_URL: &str = "https://qiwi.com/payment/form";

/// Largest amount the service accepts for a single payment.
pub const MAX_FORM_AMOUNT: Decimal = Decimal::from_parts(99_999, 0, 0, false, 0);

/// Transfer to another wallet by phone number.
pub const WALLET_TRANSFER_PID: &str = "99";

/// Transfer to another wallet by phone number or nickname.
pub const NICKNAME_TRANSFER_PID: &str = "99999";

/// Form field that can be locked against editing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockedField {
    Sum,
    Account,
    Comment,
}

impl BlockedField {
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockedField::Sum => "sum",
            BlockedField::Account => "account",
            BlockedField::Comment => "comment",
        }
    }
}

impl FromStr for BlockedField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sum" => Ok(BlockedField::Sum),
            "account" => Ok(BlockedField::Account),
            "comment" => Ok(BlockedField::Comment),
            other => Err(Error::InvalidBlockedField(other.to_string())),
        }
    }
}

impl fmt::Display for BlockedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recipient kind for nickname transfers: `0` is phone, `1` is nickname, a
/// string is sent as is. Other codes are ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AccountTypeSelector {
    Code(i64),
    Name(String),
}

impl AccountTypeSelector {
    fn wire_value(&self) -> Option<&str> {
        match self {
            AccountTypeSelector::Code(0) => Some("phone"),
            AccountTypeSelector::Code(1) => Some("nickname"),
            AccountTypeSelector::Code(_) => None,
            AccountTypeSelector::Name(name) => Some(name.as_str()),
        }
    }
}

impl From<i64> for AccountTypeSelector {
    fn from(code: i64) -> Self {
        AccountTypeSelector::Code(code)
    }
}

impl From<&str> for AccountTypeSelector {
    fn from(name: &str) -> Self {
        AccountTypeSelector::Name(name.to_string())
    }
}

impl From<String> for AccountTypeSelector {
    fn from(name: String) -> Self {
        AccountTypeSelector::Name(name)
    }
}

/// Build a pre-filled payment form link.
///
/// The amount is truncated to the cent and sent as `amountInteger` /
/// `amountFraction`; currency is always roubles. `comment` is only used for
/// wallet transfers (`99`), `account_type` only for nickname transfers (`99999`).
pub fn generate_form_link(
    provider_id: &str,
    account: Option<&str>,
    amount: Decimal,
    comment: Option<&str>,
    blocked: &[&str],
    account_type: Option<AccountTypeSelector>,
) -> Result<String> {
    if amount > MAX_FORM_AMOUNT {
        return Err(Error::AmountTooLarge(amount));
    }
    if amount < Decimal::ZERO {
        return Err(Error::NegativeAmount(amount));
    }

    let split = SplitAmount::new(amount);
    let mut params = vec![
        ("currency".to_string(), RUB.to_string()),
        ("amountInteger".to_string(), split.integer.to_string()),
        ("amountFraction".to_string(), split.cents_str()),
    ];

    if provider_id == WALLET_TRANSFER_PID {
        if let Some(comment) = comment.filter(|c| !c.is_empty()) {
            params.push(("extra['comment']".to_string(), comment.to_string()));
        }
    }
    if let Some(account) = account.filter(|a| !a.is_empty()) {
        params.push(("extra['account']".to_string(), account.to_string()));
    }
    if !blocked.is_empty() {
        let fields = blocked
            .iter()
            .map(|b| b.parse::<BlockedField>())
            .collect::<Result<Vec<_>>>()?;
        params.extend(indexed("blocked", fields.iter().map(BlockedField::as_str)));
    }
    if provider_id == NICKNAME_TRANSFER_PID {
        if let Some(value) = account_type.as_ref().and_then(AccountTypeSelector::wire_value) {
            params.push(("extra['accountType']".to_string(), value.to_string()));
        }
    }

    Ok(format!(
        "{}/{}?{}",
        FORM_URL,
        urlencoding::encode(provider_id),
        encode_query(&params)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).expect("decimal")
    }

    /// Decoded `(key, value)` pairs of a link's query string.
    fn query(link: &str) -> Vec<(String, String)> {
        let (_, q) = link.split_once('?').expect("query");
        q.split('&')
            .map(|pair| {
                let (k, v) = pair.split_once('=').expect("pair");
                (
                    urlencoding::decode(k).expect("key").into_owned(),
                    urlencoding::decode(v).expect("value").into_owned(),
                )
            })
            .collect()
    }

    fn pair(k: &str, v: &str) -> (String, String) {
        (k.to_string(), v.to_string())
    }

    #[test]
    fn wallet_transfer_link() {
        let link = generate_form_link("99", Some("79991234567"), dec("100.5"), Some("hi"), &[], None)
            .expect("link");
        assert!(link.starts_with("https://qiwi.com/payment/form/99?"));
        assert_eq!(
            query(&link),
            vec![
                pair("currency", "643"),
                pair("amountInteger", "100"),
                pair("amountFraction", "50"),
                pair("extra['comment']", "hi"),
                pair("extra['account']", "79991234567"),
            ]
        );
        assert!(link.contains("extra%5B%27account%27%5D=79991234567"));
    }

    #[test]
    fn amount_above_limit_fails() {
        let err = generate_form_link("1", None, Decimal::from(100_000), None, &[], None).expect_err("too large");
        assert!(matches!(err, Error::AmountTooLarge(a) if a == Decimal::from(100_000)));
        let err = generate_form_link("1", None, dec("99999.01"), None, &[], None).expect_err("too large");
        assert!(matches!(err, Error::AmountTooLarge(_)));
    }

    #[test]
    fn amount_at_limit_succeeds() {
        let link = generate_form_link("1", None, MAX_FORM_AMOUNT, None, &[], None).expect("link");
        assert!(query(&link).contains(&pair("amountInteger", "99999")));
    }

    #[test]
    fn negative_amount_fails() {
        let err = generate_form_link("1", None, dec("-1"), None, &[], None).expect_err("negative");
        assert!(matches!(err, Error::NegativeAmount(_)));
    }

    #[test]
    fn comment_dropped_for_other_providers() {
        let link = generate_form_link("1963", Some("4111"), dec("10"), Some("hi"), &[], None).expect("link");
        let q = query(&link);
        assert!(!q.iter().any(|(k, _)| k == "extra['comment']"));
        assert!(q.contains(&pair("extra['account']", "4111")));
    }

    #[test]
    fn excess_precision_is_truncated() {
        let q = query(&generate_form_link("1", None, dec("12.349"), None, &[], None).expect("link"));
        assert!(q.contains(&pair("amountInteger", "12")));
        assert!(q.contains(&pair("amountFraction", "34")));
    }

    #[test]
    fn blocked_fields_become_indexed_params() {
        let link = generate_form_link("99", Some("7999"), dec("1"), None, &["sum", "account", "comment"], None)
            .expect("link");
        let q = query(&link);
        assert!(q.contains(&pair("blocked[0]", "sum")));
        assert!(q.contains(&pair("blocked[1]", "account")));
        assert!(q.contains(&pair("blocked[2]", "comment")));
    }

    #[test]
    fn unknown_blocked_field_fails() {
        let err = generate_form_link("99", None, dec("1"), None, &["sum", "currency"], None).expect_err("invalid");
        assert!(matches!(err, Error::InvalidBlockedField(f) if f == "currency"));
    }

    #[test]
    fn nickname_transfer_maps_account_type() {
        let cases: [(AccountTypeSelector, Option<&str>); 4] = [
            (AccountTypeSelector::Code(0), Some("phone")),
            (AccountTypeSelector::Code(1), Some("nickname")),
            ("custom".into(), Some("custom")),
            (7i64.into(), None),
        ];
        for (selector, expected) in cases {
            let link = generate_form_link("99999", Some("nick"), dec("5"), None, &[], Some(selector.clone()))
                .expect("link");
            let found = query(&link)
                .into_iter()
                .find(|(k, _)| k == "extra['accountType']")
                .map(|(_, v)| v);
            assert_eq!(found.as_deref(), expected, "selector {selector:?}");
        }
    }

    #[test]
    fn account_type_ignored_for_other_providers() {
        let link = generate_form_link("99", None, dec("5"), None, &[], Some(AccountTypeSelector::Code(0))).expect("link");
        assert!(!link.contains("accountType"));
    }
}
