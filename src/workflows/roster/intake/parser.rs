use crate::workflows::roster::domain::{
    ConfigurationError, PreferenceList, Volunteer, VolunteerGroup, VolunteerId,
};
use serde::{Deserialize, Deserializer};
use std::io::Read;

pub(crate) const INDIVIDUAL_TABLE: &str = "individual preferences table";
pub(crate) const GROUP_TABLE: &str = "group bookings table";

const FIRST_NAME: &str = "First Name";
const LAST_NAME: &str = "Last Name";
const PREFERRED: &str = "Preferred Applicants";

/// Header of the `rank`-th (1-based) preference column, e.g. `2nd Preference`.
pub(crate) fn preference_header(rank: usize) -> String {
    let suffix = match (rank % 10, rank % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{rank}{suffix} Preference")
}

pub(crate) fn parse_individuals<R: Read>(
    reader: R,
    preference_slots: usize,
) -> Result<Vec<Volunteer>, super::IntakeError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();

    let column = |name: &str| -> Result<usize, ConfigurationError> {
        headers
            .iter()
            .position(|header| header == name)
            .ok_or_else(|| ConfigurationError::MissingColumn {
                table: INDIVIDUAL_TABLE,
                column: name.to_string(),
            })
    };

    let first_name_col = column(FIRST_NAME)?;
    let last_name_col = column(LAST_NAME)?;
    let preferred_col = column(PREFERRED)?;
    let preference_cols = (1..=preference_slots)
        .map(|rank| column(&preference_header(rank)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut volunteers = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let cell = |col: usize| record.get(col).unwrap_or("");

        let raw_preferred = cell(preferred_col);
        let is_preferred =
            parse_bool(raw_preferred).ok_or_else(|| ConfigurationError::InvalidValue {
                table: INDIVIDUAL_TABLE,
                row: index + 1,
                column: PREFERRED.to_string(),
                value: raw_preferred.to_string(),
            })?;

        volunteers.push(Volunteer {
            id: VolunteerId(volunteers.len()),
            first_name: cell(first_name_col).to_string(),
            last_name: cell(last_name_col).to_string(),
            is_preferred,
            preferences: PreferenceList::new(preference_cols.iter().map(|col| cell(*col))),
        });
    }

    Ok(volunteers)
}

pub(crate) fn parse_groups<R: Read>(reader: R) -> Result<Vec<VolunteerGroup>, super::IntakeError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?;
    for required in ["Group", "Shift", "Volunteers"] {
        if !headers.iter().any(|header| header == required) {
            return Err(ConfigurationError::MissingColumn {
                table: GROUP_TABLE,
                column: required.to_string(),
            }
            .into());
        }
    }

    let mut groups = Vec::new();
    for (index, row) in csv_reader.deserialize::<GroupRow>().enumerate() {
        let row = row?;
        let headcount = row
            .volunteers
            .as_deref()
            .map(parse_headcount)
            .unwrap_or(Some(0))
            .ok_or_else(|| ConfigurationError::InvalidValue {
                table: GROUP_TABLE,
                row: index + 1,
                column: "Volunteers".to_string(),
                value: row.volunteers.clone().unwrap_or_default(),
            })?;

        groups.push(VolunteerGroup {
            name: row.group,
            shift: row.shift,
            headcount,
        });
    }

    Ok(groups)
}

#[derive(Debug, Deserialize)]
struct GroupRow {
    #[serde(rename = "Group")]
    group: String,
    #[serde(rename = "Shift")]
    shift: String,
    #[serde(rename = "Volunteers", default, deserialize_with = "empty_string_as_none")]
    volunteers: Option<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Blank cells read as `false`.
fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Some(true),
        "false" | "no" | "n" | "0" | "" => Some(false),
        _ => None,
    }
}

/// Accepts whole numbers written as floats (`4.0`), as spreadsheet exports do.
fn parse_headcount(value: &str) -> Option<u32> {
    let trimmed = value.trim();
    if let Ok(count) = trimmed.parse::<u32>() {
        return Some(count);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|count| count.fract() == 0.0 && *count >= 0.0 && *count <= f64::from(u32::MAX))
        .map(|count| count as u32)
}
