//! User profile snapshot: three independently optional sections.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use crate::decode::{serialize_opt_date, Decode, Fields};
use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Profile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_info: Option<ContractInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_info: Option<AuthInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_info: Option<UserInfo>,
}

impl Profile {
    /// Identification level the given bank (e.g. `QIWI`) reports for this wallet.
    pub fn identification_level(&self, bank_alias: &str) -> Option<&str> {
        self.contract_info
            .as_ref()?
            .identification_info
            .as_deref()?
            .iter()
            .find(|i| i.bank_alias == bank_alias)
            .map(|i| i.identification_level.as_str())
    }
}

impl Decode for Profile {
    const ENTITY: &'static str = "Profile";

    fn decode_fields(f: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            contract_info: f.opt_nested("contractInfo")?,
            auth_info: f.opt_nested("authInfo")?,
            user_info: f.opt_nested("userInfo")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct ContractInfo {
    /// Canonical wallet id; usually equals the phone number.
    pub contract_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked: Option<bool>,
    #[serde(
        serialize_with = "serialize_opt_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub creation_date: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identification_info: Option<Vec<IdentificationInfo>>,
}

impl Decode for ContractInfo {
    const ENTITY: &'static str = "ContractInfo";

    fn decode_fields(f: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            contract_id: f.u64("contractId")?,
            blocked: f.opt_bool("blocked")?,
            creation_date: f.opt_date("creationDate")?,
            identification_info: f.opt_list("identificationInfo")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct IdentificationInfo {
    pub bank_alias: String,
    /// `ANONYMOUS`, `SIMPLIFIED`, `VERIFIED` or `FULL`; kept verbatim.
    pub identification_level: String,
}

impl Decode for IdentificationInfo {
    const ENTITY: &'static str = "IdentificationInfo";

    fn decode_fields(f: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            bank_alias: f.str("bankAlias")?,
            identification_level: f.str("identificationLevel")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct AuthInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub person_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bound_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(
        serialize_with = "serialize_opt_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub registration_date: Option<DateTime<FixedOffset>>,
    #[serde(
        serialize_with = "serialize_opt_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_login_date: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pass_info: Option<PassInfo>,
}

impl Decode for AuthInfo {
    const ENTITY: &'static str = "AuthInfo";

    fn decode_fields(f: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            person_id: f.opt_u64("personId")?,
            bound_email: f.opt_str("boundEmail")?,
            ip: f.opt_str("ip")?,
            registration_date: f.opt_date("registrationDate")?,
            last_login_date: f.opt_date("lastLoginDate")?,
            pass_info: f.opt_nested("passInfo")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct PassInfo {
    #[serde(
        serialize_with = "serialize_opt_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_pass_change: Option<DateTime<FixedOffset>>,
    #[serde(
        serialize_with = "serialize_opt_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub next_pass_change: Option<DateTime<FixedOffset>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_used: Option<bool>,
}

impl Decode for PassInfo {
    const ENTITY: &'static str = "PassInfo";

    fn decode_fields(f: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            last_pass_change: f.opt_date("lastPassChange")?,
            next_pass_change: f.opt_date("nextPassChange")?,
            password_used: f.opt_bool("passwordUsed")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct UserInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_pay_currency: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_pay_source: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_txn_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promo_enabled: Option<bool>,
}

impl Decode for UserInfo {
    const ENTITY: &'static str = "UserInfo";

    fn decode_fields(f: &Fields<'_>) -> Result<Self> {
        Ok(Self {
            default_pay_currency: f.opt_currency("defaultPayCurrency")?,
            default_pay_source: f.opt_u64("defaultPaySource")?,
            email: f.opt_str("email")?,
            first_txn_id: f.opt_u64("firstTxnId")?,
            language: f.opt_str("language")?,
            operator: f.opt_str("operator")?,
            phone_hash: f.opt_str("phoneHash")?,
            promo_enabled: f.opt_bool("promoEnabled")?,
        })
    }
}
