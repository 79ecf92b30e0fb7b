use serde::Serialize;
use std::fmt;

/// Dense zero-based identifier assigned in ingestion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct VolunteerId(pub usize);

impl VolunteerId {
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VolunteerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ranked shift choices, most preferred first.
///
/// Blank slots are retained so the list length, and with it the score of the
/// top choice, stays fixed across volunteers filling in different numbers of
/// choices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceList {
    slots: Vec<Option<String>>,
}

impl PreferenceList {
    pub fn new<I, S>(slots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let slots = slots
            .into_iter()
            .map(|slot| {
                let trimmed = slot.as_ref().trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .collect();
        Self { slots }
    }

    /// Builds a list holding `choices` followed by blank slots up to `len`.
    pub fn padded<I, S>(choices: I, len: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new(choices);
        if list.slots.len() < len {
            list.slots.resize(len, None);
        }
        list
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Position of the first slot naming `shift`. Blank slots never match.
    pub fn position(&self, shift: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot.as_deref() == Some(shift))
    }

    pub fn contains(&self, shift: &str) -> bool {
        self.position(shift).is_some()
    }

    /// Non-blank choices in rank order.
    pub fn choices(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().filter_map(|slot| slot.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volunteer {
    pub id: VolunteerId,
    pub first_name: String,
    pub last_name: String,
    pub is_preferred: bool,
    pub preferences: PreferenceList,
}

impl Volunteer {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// Block booking of several seats on one shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolunteerGroup {
    pub name: String,
    pub shift: String,
    pub headcount: u32,
}

/// Fatal problems with the inputs that no solve can recover from.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("volunteer {volunteer} ({name}) lists shift '{shift}' which is not in the catalog")]
    UnknownVolunteerShift {
        volunteer: VolunteerId,
        name: String,
        shift: String,
    },
    #[error("group '{group}' is booked on shift '{shift}' which is not in the catalog")]
    UnknownGroupShift { group: String, shift: String },
    #[error("{table} is missing required column '{column}'")]
    MissingColumn { table: &'static str, column: String },
    #[error("{table} row {row}: column '{column}' holds invalid value '{value}'")]
    InvalidValue {
        table: &'static str,
        row: usize,
        column: String,
        value: String,
    },
    #[error("objective coefficients overflow 64-bit integers")]
    ObjectiveOverflow,
}
