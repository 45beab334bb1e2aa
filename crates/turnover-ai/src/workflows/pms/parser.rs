use super::normalizer::{clean_property, normalize_property};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug)]
pub(crate) struct PmsRecord {
    pub(crate) reservation_id: String,
    pub(crate) property_display: String,
    pub(crate) property_key: String,
    pub(crate) check_in: Option<NaiveDateTime>,
    pub(crate) check_out: Option<NaiveDateTime>,
    pub(crate) housekeeping_status: Option<String>,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<PmsRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<PmsRow>() {
        let row = record?;
        let property_display = clean_property(&row.property);
        let property_key = normalize_property(&row.property);
        let check_in = row.check_in.as_deref().and_then(parse_datetime);
        let check_out = row.check_out.as_deref().and_then(parse_datetime);

        records.push(PmsRecord {
            reservation_id: row.reservation_id,
            property_display,
            property_key,
            check_in,
            check_out,
            housekeeping_status: row.housekeeping_status,
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct PmsRow {
    #[serde(rename = "Reservation ID")]
    reservation_id: String,
    #[serde(rename = "Property")]
    property: String,
    #[serde(
        rename = "Check-In",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    check_in: Option<String>,
    #[serde(
        rename = "Check-Out",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    check_out: Option<String>,
    #[serde(
        rename = "Housekeeping Status",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    housekeeping_status: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Feeds export either RFC 3339 instants, local wall-clock stamps, or
/// bare dates depending on the channel; a bare date counts as midnight.
fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M") {
        return Some(dt);
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }

    None
}

#[cfg(test)]
pub(crate) fn parse_datetime_for_tests(value: &str) -> Option<NaiveDateTime> {
    parse_datetime(value)
}
