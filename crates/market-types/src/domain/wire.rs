//! Serde helpers for fields whose JSON shape differs from their Rust type.

use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer};

/// The only accepted textual form of a calendar date.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Rendered in place of a date that has not been set.
pub const UNSET_DATE: &str = "None";

pub fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
}

/// `Option<NaiveDate>` as `"YYYY-MM-DD"`, or [`UNSET_DATE`] when empty.
///
/// Deserialization is strict about the format and treats both `null` and the
/// sentinel as unset.
pub mod date {
    use super::*;
    use serde::Serializer;

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => serializer.collect_str(&d.format(DATE_FORMAT)),
            None => serializer.serialize_str(UNSET_DATE),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some(UNSET_DATE) => Ok(None),
            Some(s) => parse_date(s).map(Some).map_err(|e| {
                de::Error::custom(format!("invalid date {s:?}, expected YYYY-MM-DD: {e}"))
            }),
        }
    }

    /// Patch form: absent keeps the stored date, `null` clears it.
    pub fn deserialize_patch<'de, D>(deserializer: D) -> Result<Option<Option<NaiveDate>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserialize(deserializer).map(Some)
    }
}

/// Lets a patch tell an absent key (`None`) from an explicit `null`
/// (`Some(None)`). Pair with `#[serde(default)]`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Dated {
        #[serde(with = "date")]
        on: Option<NaiveDate>,
    }

    #[test]
    fn renders_set_and_unset_dates() {
        let set = Dated {
            on: NaiveDate::from_ymd_opt(2024, 1, 10),
        };
        assert_eq!(
            serde_json::to_value(&set).unwrap(),
            serde_json::json!({ "on": "2024-01-10" })
        );

        let unset = Dated { on: None };
        assert_eq!(
            serde_json::to_value(&unset).unwrap(),
            serde_json::json!({ "on": "None" })
        );
    }

    #[test]
    fn sentinel_and_null_read_back_as_unset() {
        let a: Dated = serde_json::from_str(r#"{"on":"None"}"#).unwrap();
        let b: Dated = serde_json::from_str(r#"{"on":null}"#).unwrap();
        assert_eq!(a.on, None);
        assert_eq!(b.on, None);
    }

    #[test]
    fn rejects_other_date_formats() {
        assert!(serde_json::from_str::<Dated>(r#"{"on":"01/10/2024"}"#).is_err());
        assert!(serde_json::from_str::<Dated>(r#"{"on":"2024-13-01"}"#).is_err());
        assert!(serde_json::from_str::<Dated>(r#"{"on":20240110}"#).is_err());
    }

    #[derive(Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "nullable")]
        phone: Option<Option<String>>,
    }

    #[test]
    fn nullable_distinguishes_absent_from_null() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        let cleared: Patch = serde_json::from_str(r#"{"phone":null}"#).unwrap();
        let set: Patch = serde_json::from_str(r#"{"phone":"555"}"#).unwrap();
        assert_eq!(absent.phone, None);
        assert_eq!(cleared.phone, Some(None));
        assert_eq!(set.phone, Some(Some("555".into())));
    }
}
