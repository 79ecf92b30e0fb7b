use super::super::catalog::ShiftCatalog;
use super::super::preferences::ScoredRoster;
use super::super::solver::Schedule;
use serde::Serialize;
use std::fmt;

/// Numerator over denominator; `None` percentage when the denominator is zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ratio {
    pub numerator: u64,
    pub denominator: u64,
}

impl Ratio {
    pub fn new(numerator: u64, denominator: u64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    pub fn fraction(&self) -> Option<f64> {
        (self.denominator != 0).then(|| self.numerator as f64 / self.denominator as f64)
    }

    pub fn percent(&self) -> Option<f64> {
        self.fraction().map(|fraction| fraction * 100.0)
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.percent() {
            Some(percent) => write!(f, "{percent:.1}%"),
            None => write!(f, "n/a"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScheduleStatistics {
    /// Filled seats over required seats.
    pub staffing_coverage: Ratio,
    /// Shifts with every seat filled over all shifts.
    pub shifts_fully_staffed: Ratio,
    pub volunteers_assigned: Ratio,
    pub preferred_volunteers_assigned: Ratio,
}

impl ScheduleStatistics {
    pub fn compute(catalog: &ShiftCatalog, roster: &ScoredRoster, schedule: &Schedule) -> Self {
        let mut filled_seats = 0u64;
        let mut fully_staffed = 0u64;
        for (column, shift) in catalog.shifts().iter().enumerate() {
            let load = schedule.shift_load(column);
            filled_seats += u64::from(load);
            if load >= shift.capacity {
                fully_staffed += 1;
            }
        }

        let mut assigned = 0u64;
        let mut preferred_assigned = 0u64;
        for (row, volunteer) in roster.volunteers().iter().enumerate() {
            if schedule.assigned_shift(row).is_some() {
                assigned += 1;
                if volunteer.is_preferred {
                    preferred_assigned += 1;
                }
            }
        }

        Self {
            staffing_coverage: Ratio::new(filled_seats, catalog.required_seats()),
            shifts_fully_staffed: Ratio::new(fully_staffed, catalog.len() as u64),
            volunteers_assigned: Ratio::new(assigned, roster.len() as u64),
            preferred_volunteers_assigned: Ratio::new(
                preferred_assigned,
                roster.preferred_count() as u64,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::roster::model::{AssignmentModel, ObjectiveWeights};

    #[test]
    fn ratio_guards_zero_denominators() {
        assert_eq!(Ratio::new(0, 0).percent(), None);
        assert_eq!(Ratio::new(0, 0).to_string(), "n/a");
        assert_eq!(Ratio::new(2, 3).to_string(), "66.7%");
        assert_eq!(Ratio::new(1, 1).fraction(), Some(1.0));
    }

    #[test]
    fn empty_inputs_are_not_applicable() {
        let catalog = ShiftCatalog::from_shifts(Vec::<(String, u32)>::new());
        let roster = ScoredRoster::new(Vec::new(), &catalog);
        let model =
            AssignmentModel::build(&catalog, &roster, ObjectiveWeights::default()).expect("model");
        let stats = ScheduleStatistics::compute(&catalog, &roster, &Schedule::unassigned(&model));

        assert_eq!(stats.staffing_coverage.percent(), None);
        assert_eq!(stats.shifts_fully_staffed.percent(), None);
        assert_eq!(stats.volunteers_assigned.percent(), None);
        assert_eq!(stats.preferred_volunteers_assigned.percent(), None);
    }

    #[test]
    fn zero_capacity_shifts_count_as_fully_staffed() {
        let catalog = ShiftCatalog::from_shifts([("Closed", 0), ("Open", 2)]);
        let roster = ScoredRoster::new(Vec::new(), &catalog);
        let model =
            AssignmentModel::build(&catalog, &roster, ObjectiveWeights::default()).expect("model");
        let stats = ScheduleStatistics::compute(&catalog, &roster, &Schedule::unassigned(&model));

        assert_eq!(stats.shifts_fully_staffed, Ratio::new(1, 2));
        assert_eq!(stats.staffing_coverage, Ratio::new(0, 2));
    }
}
