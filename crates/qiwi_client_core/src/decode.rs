//! Decoding rules shared by every entity: the `Decode` capability, a typed field
//! reader over one JSON object, and the single timestamp rule.
//!
//! Decoders are pure. They never log, never touch the network and never
//! substitute defaults for malformed input.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serializer;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Wire format of every timestamp the service emits and accepts (`yyyy-MM-dd'T'HH:mm:ssXXX`).
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";

/// Offset form without the colon, seen on some older endpoints.
const DATE_FORMAT_COMPACT_OFFSET: &str = "%Y-%m-%dT%H:%M:%S%z";

/// Local part of a UTC timestamp written with a trailing `Z`.
const DATE_FORMAT_UTC: &str = "%Y-%m-%dT%H:%M:%S";

const DAY_FORMAT: &str = "%Y-%m-%d";

/// Parse a service timestamp into a timezone-aware instant.
///
/// Accepts `2017-01-21T11:41:07+03:00`, `2017-01-21T11:41:07+0300` and
/// `2017-01-21T11:41:07Z`. Anything else (a space or lowercase separator,
/// fractional seconds, a missing offset) is `MalformedDate`.
pub fn parse_date(s: &str) -> Result<DateTime<FixedOffset>> {
    let malformed = || Error::MalformedDate(s.to_string());
    if s.chars().any(char::is_whitespace) {
        return Err(malformed());
    }
    let parsed = match s.strip_suffix('Z') {
        Some(local) => NaiveDateTime::parse_from_str(local, DATE_FORMAT_UTC).map(|dt| dt.and_utc().fixed_offset()),
        None => DateTime::parse_from_str(s, DATE_FORMAT)
            .or_else(|_| DateTime::parse_from_str(s, DATE_FORMAT_COMPACT_OFFSET)),
    };
    parsed.map_err(|_| malformed())
}

/// Format an instant the way the service expects it in query parameters.
pub fn format_date(date: &DateTime<FixedOffset>) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_day(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DAY_FORMAT).map_err(|_| Error::MalformedDate(s.to_string()))
}

pub(crate) fn serialize_date<S: Serializer>(
    date: &DateTime<FixedOffset>,
    ser: S,
) -> std::result::Result<S::Ok, S::Error> {
    ser.serialize_str(&format_date(date))
}

pub(crate) fn serialize_opt_date<S: Serializer>(
    date: &Option<DateTime<FixedOffset>>,
    ser: S,
) -> std::result::Result<S::Ok, S::Error> {
    match date {
        Some(d) => serialize_date(d, ser),
        None => ser.serialize_none(),
    }
}

pub(crate) fn serialize_day<S: Serializer>(day: &NaiveDate, ser: S) -> std::result::Result<S::Ok, S::Error> {
    ser.serialize_str(&day.format(DAY_FORMAT).to_string())
}

pub(crate) fn serialize_opt_day<S: Serializer>(
    day: &Option<NaiveDate>,
    ser: S,
) -> std::result::Result<S::Ok, S::Error> {
    match day {
        Some(d) => serialize_day(d, ser),
        None => ser.serialize_none(),
    }
}

/// Build an entity from one JSON object.
///
/// Implementors only describe how to read their own fields; nested entities are
/// read through [`Fields::nested`] and friends, which call the nested type's own
/// decoder.
pub trait Decode: Sized {
    /// Name used in error messages.
    const ENTITY: &'static str;

    fn decode_fields(fields: &Fields<'_>) -> Result<Self>;

    fn decode(value: &Value) -> Result<Self> {
        let map = value
            .as_object()
            .ok_or(Error::NotAnObject { entity: Self::ENTITY })?;
        Self::decode_fields(&Fields::new(Self::ENTITY, map))
    }

    /// `None` and JSON `null` decode to `None`; never a partially built entity.
    fn decode_opt(value: Option<&Value>) -> Result<Option<Self>> {
        match value {
            None | Some(Value::Null) => Ok(None),
            Some(v) => Self::decode(v).map(Some),
        }
    }
}

/// Decode every element of a JSON array, keeping source order.
pub fn decode_list<T: Decode>(value: &Value) -> Result<Vec<T>> {
    let items = value.as_array().ok_or(Error::InvalidField {
        entity: T::ENTITY,
        field: "[]",
        expected: "an array",
    })?;
    items.iter().map(T::decode).collect()
}

/// Typed, read-only view over one JSON object. Unknown keys are ignored.
pub struct Fields<'a> {
    entity: &'static str,
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn new(entity: &'static str, map: &'a Map<String, Value>) -> Self {
        Self { entity, map }
    }

    /// Present and non-null value under `key`.
    pub fn raw(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    fn missing(&self, field: &'static str) -> Error {
        Error::MissingField {
            entity: self.entity,
            field,
        }
    }

    fn invalid(&self, field: &'static str, expected: &'static str) -> Error {
        Error::InvalidField {
            entity: self.entity,
            field,
            expected,
        }
    }

    fn required<T>(&self, key: &'static str, value: Result<Option<T>>) -> Result<T> {
        value?.ok_or_else(|| self.missing(key))
    }

    pub fn opt_str(&self, key: &'static str) -> Result<Option<String>> {
        match self.raw(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(self.invalid(key, "a string")),
        }
    }

    pub fn str(&self, key: &'static str) -> Result<String> {
        self.required(key, self.opt_str(key))
    }

    /// String or number, rendered as a string. Used for identifiers the service
    /// emits in either shape.
    pub fn opt_id(&self, key: &'static str) -> Result<Option<String>> {
        match self.raw(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(_) => Err(self.invalid(key, "a string or number")),
        }
    }

    pub fn id(&self, key: &'static str) -> Result<String> {
        self.required(key, self.opt_id(key))
    }

    pub fn opt_bool(&self, key: &'static str) -> Result<Option<bool>> {
        match self.raw(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(self.invalid(key, "a boolean")),
        }
    }

    pub fn opt_u64(&self, key: &'static str) -> Result<Option<u64>> {
        match self.raw(key) {
            None => Ok(None),
            Some(Value::Number(n)) => n.as_u64().map(Some).ok_or_else(|| self.invalid(key, "an unsigned integer")),
            Some(Value::String(s)) => s
                .parse()
                .map(Some)
                .map_err(|_| self.invalid(key, "an unsigned integer")),
            Some(_) => Err(self.invalid(key, "an unsigned integer")),
        }
    }

    pub fn u64(&self, key: &'static str) -> Result<u64> {
        self.required(key, self.opt_u64(key))
    }

    pub fn opt_i64(&self, key: &'static str) -> Result<Option<i64>> {
        match self.raw(key) {
            None => Ok(None),
            Some(Value::Number(n)) => n.as_i64().map(Some).ok_or_else(|| self.invalid(key, "an integer")),
            Some(_) => Err(self.invalid(key, "an integer")),
        }
    }

    /// ISO 4217 numeric code, sent as `643` or `"643"` depending on the endpoint.
    pub fn opt_currency(&self, key: &'static str) -> Result<Option<u16>> {
        match self.opt_u64(key) {
            Ok(Some(code)) => u16::try_from(code)
                .map(Some)
                .map_err(|_| self.invalid(key, "an ISO 4217 numeric code")),
            Ok(None) => Ok(None),
            Err(_) => Err(self.invalid(key, "an ISO 4217 numeric code")),
        }
    }

    pub fn currency(&self, key: &'static str) -> Result<u16> {
        self.required(key, self.opt_currency(key))
    }

    pub fn opt_decimal(&self, key: &'static str) -> Result<Option<Decimal>> {
        let text = match self.raw(key) {
            None => return Ok(None),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(_) => return Err(self.invalid(key, "a number")),
        };
        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .map(Some)
            .map_err(|_| self.invalid(key, "a number"))
    }

    pub fn decimal(&self, key: &'static str) -> Result<Decimal> {
        self.required(key, self.opt_decimal(key))
    }

    pub fn opt_date(&self, key: &'static str) -> Result<Option<DateTime<FixedOffset>>> {
        self.opt_str(key)?.as_deref().map(parse_date).transpose()
    }

    pub fn date(&self, key: &'static str) -> Result<DateTime<FixedOffset>> {
        self.required(key, self.opt_date(key))
    }

    /// Calendar day in `YYYY-MM-DD` form.
    pub fn opt_day(&self, key: &'static str) -> Result<Option<NaiveDate>> {
        self.opt_str(key)?.as_deref().map(parse_day).transpose()
    }

    pub fn opt_object(&self, key: &'static str) -> Result<Option<Map<String, Value>>> {
        match self.raw(key) {
            None => Ok(None),
            Some(Value::Object(m)) => Ok(Some(m.clone())),
            Some(_) => Err(self.invalid(key, "an object")),
        }
    }

    /// Flat object of scalars, each rendered as a string.
    pub fn opt_str_map(&self, key: &'static str) -> Result<Option<BTreeMap<String, String>>> {
        let Some(map) = self.opt_object(key)? else {
            return Ok(None);
        };
        map.into_iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, v)| match v {
                Value::String(s) => Ok((k, s)),
                Value::Number(n) => Ok((k, n.to_string())),
                Value::Bool(b) => Ok((k, b.to_string())),
                _ => Err(self.invalid(key, "an object of scalar values")),
            })
            .collect::<Result<BTreeMap<_, _>>>()
            .map(Some)
    }

    /// Nested entity under `key`. A present value that is not an object is
    /// reported against this entity's field.
    pub fn opt_nested<T: Decode>(&self, key: &'static str) -> Result<Option<T>> {
        match self.raw(key) {
            None => Ok(None),
            Some(v) if v.is_object() => T::decode(v).map(Some),
            Some(_) => Err(self.invalid(key, "an object")),
        }
    }

    pub fn nested<T: Decode>(&self, key: &'static str) -> Result<T> {
        self.required(key, self.opt_nested(key))
    }

    /// Absent or `null` lists are `None`; an empty array is `Some(vec![])`.
    pub fn opt_list<T: Decode>(&self, key: &'static str) -> Result<Option<Vec<T>>> {
        match self.raw(key) {
            None => Ok(None),
            Some(v) if v.is_array() => decode_list(v).map(Some),
            Some(_) => Err(self.invalid(key, "an array")),
        }
    }

    pub fn list<T: Decode>(&self, key: &'static str) -> Result<Vec<T>> {
        self.required(key, self.opt_list(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    struct Pair {
        name: String,
        count: Option<u64>,
    }

    impl Decode for Pair {
        const ENTITY: &'static str = "Pair";

        fn decode_fields(f: &Fields<'_>) -> Result<Self> {
            Ok(Self {
                name: f.str("name")?,
                count: f.opt_u64("count")?,
            })
        }
    }

    #[test]
    fn parse_date_keeps_offset() {
        let d = parse_date("2017-01-21T11:41:07+03:00").expect("parse");
        assert_eq!(d.offset().local_minus_utc(), 3 * 3600);
        assert_eq!((d.year(), d.month(), d.day()), (2017, 1, 21));
        assert_eq!((d.hour(), d.minute(), d.second()), (11, 41, 7));
    }

    #[test]
    fn parse_date_accepts_zulu() {
        let d = parse_date("2017-07-27T06:51:06Z").expect("parse");
        assert_eq!(d.offset().local_minus_utc(), 0);
        assert_eq!(format_date(&d), "2017-07-27T06:51:06+00:00");
    }

    #[test]
    fn parse_date_accepts_offset_without_colon() {
        let d = parse_date("2017-01-21T11:41:07+0300").expect("parse");
        assert_eq!(d.offset().local_minus_utc(), 3 * 3600);
    }

    #[test]
    fn parse_date_rejects_other_formats() {
        for bad in [
            "21.01.2017 11:41",
            "2017-01-21",
            "",
            "2017-01-21T11:41:07",
            "2017-01-21 11:41:07+03:00",
            "2017-01-21t11:41:07z",
            "2017-01-21T11:41:07z",
            "2017-01-21T11:41:07.5Z",
            "2017-01-21T11:41:07.099+03:00",
            " 2017-01-21T11:41:07+03:00",
        ] {
            match parse_date(bad) {
                Err(Error::MalformedDate(s)) => assert_eq!(s, bad),
                other => panic!("expected MalformedDate for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn format_date_is_inverse_of_parse() {
        let s = "2017-01-21T11:41:07+03:00";
        assert_eq!(format_date(&parse_date(s).expect("parse")), s);
    }

    #[test]
    fn decode_opt_maps_null_and_absent_to_none() {
        assert!(Pair::decode_opt(None).expect("absent").is_none());
        assert!(Pair::decode_opt(Some(&Value::Null)).expect("null").is_none());
    }

    #[test]
    fn decode_rejects_non_objects() {
        assert!(matches!(
            Pair::decode(&json!([1, 2])),
            Err(Error::NotAnObject { entity: "Pair" })
        ));
    }

    #[test]
    fn missing_required_field_is_reported() {
        assert!(matches!(
            Pair::decode(&json!({"count": 1})),
            Err(Error::MissingField { entity: "Pair", field: "name" })
        ));
    }

    #[test]
    fn optional_field_absent_is_none_not_zero() {
        let p = Pair::decode(&json!({"name": "a", "extra": true})).expect("decode");
        assert_eq!(p.name, "a");
        assert_eq!(p.count, None);
        let p = Pair::decode(&json!({"name": "a", "count": 0})).expect("decode");
        assert_eq!(p.count, Some(0));
    }

    #[test]
    fn absent_list_is_none_and_required_list_is_missing() {
        let v = json!({"empty": [], "null": null});
        let f = Fields::new("T", v.as_object().expect("object"));
        assert!(f.opt_list::<Pair>("absent").expect("absent").is_none());
        assert!(f.opt_list::<Pair>("null").expect("null").is_none());
        assert_eq!(f.opt_list::<Pair>("empty").expect("empty").map(|l| l.len()), Some(0));
        assert!(matches!(
            f.list::<Pair>("absent"),
            Err(Error::MissingField { entity: "T", field: "absent" })
        ));
    }

    #[test]
    fn nested_non_object_is_an_invalid_field() {
        let v = json!({"inner": "text"});
        let f = Fields::new("Outer", v.as_object().expect("object"));
        assert!(matches!(
            f.opt_nested::<Pair>("inner"),
            Err(Error::InvalidField { entity: "Outer", field: "inner", .. })
        ));
    }

    #[test]
    fn decode_list_preserves_order() {
        let list: Vec<Pair> =
            decode_list(&json!([{"name": "first"}, {"name": "second"}])).expect("decode");
        let names: Vec<_> = list.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn currency_accepts_number_or_numeric_string() {
        let v = json!({"a": 643, "b": "840", "c": "RUB"});
        let f = Fields::new("T", v.as_object().expect("object"));
        assert_eq!(f.currency("a").expect("a"), 643);
        assert_eq!(f.currency("b").expect("b"), 840);
        assert!(matches!(f.currency("c"), Err(Error::InvalidField { field: "c", .. })));
    }

    #[test]
    fn decimal_keeps_two_decimal_places() {
        let v = json!({"amount": 12.5, "small": 0.29, "int": 70});
        let f = Fields::new("T", v.as_object().expect("object"));
        assert_eq!(f.decimal("amount").expect("amount"), Decimal::new(125, 1));
        assert_eq!(f.decimal("small").expect("small"), Decimal::new(29, 2));
        assert_eq!(f.decimal("int").expect("int"), Decimal::from(70));
    }
}
