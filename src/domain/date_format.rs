//! Serde support for calendar dates on the wire as `YYYY-MM-DD`.

use serde::{de, Deserialize, Deserializer, Serializer};
use time::{format_description::FormatItem, macros::format_description, Date};

const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let formatted = date.format(DATE_FORMAT).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&formatted)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Date::parse(&s, DATE_FORMAT)
        .map_err(|_| de::Error::custom(format!("`{s}` is not a valid date; expected YYYY-MM-DD")))
}

pub mod option {
    use super::DATE_FORMAT;
    use serde::{de, Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => super::serialize(date, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) => Date::parse(&s, DATE_FORMAT)
                .map(Some)
                .map_err(|_| {
                    de::Error::custom(format!("`{s}` is not a valid date; expected YYYY-MM-DD"))
                }),
            None => Ok(None),
        }
    }
}
