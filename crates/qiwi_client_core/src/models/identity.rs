//! Result of a simplified identification submission.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::decode::{serialize_opt_day, Decode, Fields};
use crate::error::Result;

/// Levels at which the service considers the wallet owner identified.
const IDENTIFIED_LEVELS: [&str; 3] = ["SIMPLIFIED", "VERIFIED", "FULL"];

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Identity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Identification level echoed by the service (`type` on the wire).
    #[serde(rename = "type")]
    pub level: String,
    #[serde(
        serialize_with = "serialize_opt_day",
        skip_serializing_if = "Option::is_none"
    )]
    pub birth_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passport: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snils: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oms: Option<String>,
    /// Tax id the caller submitted; the service does not return it.
    #[serde(skip)]
    pub base_inn: Option<String>,
    /// True when `level` is an identified level.
    #[serde(skip)]
    pub check: bool,
}

impl Identity {
    /// Decode a response and attach the tax id that was submitted with the request.
    pub fn decode_with_base_inn(value: &Value, base_inn: Option<&str>) -> Result<Self> {
        let mut identity = Self::decode(value)?;
        identity.base_inn = base_inn.map(str::to_string);
        Ok(identity)
    }
}

impl Decode for Identity {
    const ENTITY: &'static str = "Identity";

    fn decode_fields(f: &Fields<'_>) -> Result<Self> {
        let level = f.str("type")?;
        let check = IDENTIFIED_LEVELS.contains(&level.as_str());
        Ok(Self {
            id: f.opt_u64("id")?,
            level,
            birth_date: f.opt_day("birthDate")?,
            first_name: f.opt_str("firstName")?,
            middle_name: f.opt_str("middleName")?,
            last_name: f.opt_str("lastName")?,
            passport: f.opt_str("passport")?,
            inn: f.opt_str("inn")?,
            snils: f.opt_str("snils")?,
            oms: f.opt_str("oms")?,
            base_inn: None,
            check,
        })
    }
}
