mod export;
mod statistics;
mod views;

pub use export::{
    export_schedules, write_shift_schedule, write_volunteer_schedule, SHIFT_SCHEDULE_FILE,
    UNDER_STAFFED_NOTE, VOLUNTEER_SCHEDULE_FILE,
};
pub use statistics::{Ratio, ScheduleStatistics};
pub use views::{ScheduleSummary, ShiftAssignmentView, VolunteerAssignmentView, UNASSIGNED};

use super::catalog::ShiftCatalog;
use super::preferences::ScoredRoster;
use super::solver::{IncompleteReason, Schedule};
use std::path::{Path, PathBuf};

/// Shift- and volunteer-centric views over a resolved schedule.
#[derive(Debug, Clone)]
pub struct ScheduleReport {
    pub shifts: Vec<ShiftAssignmentView>,
    pub volunteers: Vec<VolunteerAssignmentView>,
    pub statistics: ScheduleStatistics,
    pub seat_columns: usize,
    pub objective_value: i64,
    pub incomplete: Option<IncompleteReason>,
}

impl ScheduleReport {
    pub fn new(
        catalog: &ShiftCatalog,
        roster: &ScoredRoster,
        schedule: &Schedule,
        incomplete: Option<IncompleteReason>,
    ) -> Self {
        let volunteers_list = roster.volunteers();

        let shifts = catalog
            .shifts()
            .iter()
            .enumerate()
            .map(|(column, shift)| {
                let volunteers: Vec<String> = schedule
                    .volunteers_on(column)
                    .filter_map(|row| volunteers_list.get(row))
                    .map(|volunteer| volunteer.display_name())
                    .collect();
                ShiftAssignmentView {
                    shift: shift.name.clone(),
                    capacity: shift.capacity,
                    under_staffed: (volunteers.len() as u64) < u64::from(shift.capacity),
                    volunteers,
                }
            })
            .collect();

        let volunteers = roster
            .iter()
            .enumerate()
            .map(|(row, (volunteer, scores))| {
                let column = schedule.assigned_shift(row);
                VolunteerAssignmentView {
                    volunteer_id: volunteer.id.index(),
                    name: volunteer.display_name(),
                    is_preferred: volunteer.is_preferred,
                    shift: column
                        .and_then(|column| catalog.get(column))
                        .map(|shift| shift.name.clone()),
                    preference_score: column.map(|column| scores.get(column)).unwrap_or(0),
                }
            })
            .collect();

        Self {
            shifts,
            volunteers,
            statistics: ScheduleStatistics::compute(catalog, roster, schedule),
            seat_columns: catalog.max_capacity() as usize,
            objective_value: schedule.objective_value(),
            incomplete,
        }
    }

    pub fn under_staffed(&self) -> impl Iterator<Item = &ShiftAssignmentView> {
        self.shifts.iter().filter(|shift| shift.under_staffed)
    }

    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary {
            complete: self.incomplete.is_none(),
            incomplete_reason: self.incomplete.as_ref().map(ToString::to_string),
            objective_value: self.objective_value,
            statistics: self.statistics,
            shifts: self.shifts.clone(),
            volunteers: self.volunteers.clone(),
        }
    }

    /// Writes the shift- and volunteer-focused CSV tables into `dir`.
    pub fn export(&self, dir: &Path) -> Result<Vec<PathBuf>, csv::Error> {
        export_schedules(dir, &self.shifts, &self.volunteers, self.seat_columns)
    }
}
