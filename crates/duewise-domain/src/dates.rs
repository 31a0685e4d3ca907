//! Serde helpers for the epoch-day date encoding used in stored snapshots.

use chrono::{Datelike, NaiveDate};

const UNIX_EPOCH_DAYS_FROM_CE: i64 = 719_163;

/// Returns the number of days between `date` and 1970-01-01.
pub fn to_epoch_day(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) - UNIX_EPOCH_DAYS_FROM_CE
}

/// Converts a day count relative to 1970-01-01 back into a date.
pub fn from_epoch_day(days: i64) -> Option<NaiveDate> {
    let from_ce = days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?;
    NaiveDate::from_num_days_from_ce_opt(i32::try_from(from_ce).ok()?)
}

/// Encodes a `NaiveDate` as an epoch-day integer.
pub mod epoch_day {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(super::to_epoch_day(*date))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let days = i64::deserialize(deserializer)?;
        super::from_epoch_day(days)
            .ok_or_else(|| D::Error::custom(format!("epoch day out of range: {days}")))
    }
}

/// Optional variant of [`epoch_day`].
pub mod epoch_day_opt {
    use chrono::NaiveDate;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(date) => serializer.serialize_some(&super::to_epoch_day(*date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<i64>::deserialize(deserializer)? {
            Some(days) => super::from_epoch_day(days)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("epoch day out of range: {days}"))),
            None => Ok(None),
        }
    }
}
