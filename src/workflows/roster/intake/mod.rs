mod parser;

use super::domain::{ConfigurationError, Volunteer, VolunteerGroup};
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("failed to read intake table: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid intake CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Reads the individual-preferences table, one volunteer per row in file
/// order. `preference_slots` fixes how many `Nth Preference` columns are
/// required and how long every preference list is.
pub struct IndividualIntake;

impl IndividualIntake {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        preference_slots: usize,
    ) -> Result<Vec<Volunteer>, IntakeError> {
        let file = std::fs::File::open(path.as_ref())?;
        let volunteers = Self::from_reader(file, preference_slots)?;
        debug!(
            path = %path.as_ref().display(),
            volunteers = volunteers.len(),
            "loaded individual preferences"
        );
        Ok(volunteers)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        preference_slots: usize,
    ) -> Result<Vec<Volunteer>, IntakeError> {
        parser::parse_individuals(reader, preference_slots)
    }
}

/// Reads the group-bookings table (`Group`, `Shift`, `Volunteers`).
pub struct GroupIntake;

impl GroupIntake {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<VolunteerGroup>, IntakeError> {
        let file = std::fs::File::open(path.as_ref())?;
        let groups = Self::from_reader(file)?;
        debug!(
            path = %path.as_ref().display(),
            groups = groups.len(),
            "loaded group bookings"
        );
        Ok(groups)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<VolunteerGroup>, IntakeError> {
        parser::parse_groups(reader)
    }
}
