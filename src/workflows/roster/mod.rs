pub mod catalog;
pub mod domain;
mod engine;
mod groups;
pub mod intake;
pub mod model;
mod preferences;
pub mod report;
pub mod solver;

pub use catalog::{standard_weekdays, Period, Shift, ShiftCatalog};
pub use domain::{ConfigurationError, PreferenceList, Volunteer, VolunteerGroup, VolunteerId};
pub use engine::GoodLpEngine;
pub use groups::disaggregate_groups;
pub use intake::{GroupIntake, IndividualIntake, IntakeError};
pub use model::{AssignmentModel, ObjectiveWeights};
pub use preferences::{preference_scores, PreferenceScores, ScoredRoster};
pub use report::{ScheduleReport, ScheduleStatistics};
pub use solver::{
    AssignmentEngine, EngineBudget, EngineError, EngineSolution, EngineStatus, IncompleteReason,
    Schedule, SolveBudget, SolveIncomplete, Solver,
};

use tracing::info;

pub const DEFAULT_PREFERENCE_SLOTS: usize = 6;

/// Tunables of one planning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerSettings {
    /// Length of every ingested or synthesized preference list.
    pub preference_slots: usize,
    pub weights: ObjectiveWeights,
    pub budget: SolveBudget,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            preference_slots: DEFAULT_PREFERENCE_SLOTS,
            weights: ObjectiveWeights::default(),
            budget: SolveBudget::unlimited(),
        }
    }
}

/// Result of a planning run. `incomplete` is set when the solve fell short;
/// `schedule` then holds whatever could be resolved.
#[derive(Debug, Clone)]
pub struct RosterPlan {
    pub catalog: ShiftCatalog,
    pub roster: ScoredRoster,
    pub schedule: Schedule,
    pub incomplete: Option<IncompleteReason>,
}

impl RosterPlan {
    pub fn is_complete(&self) -> bool {
        self.incomplete.is_none()
    }

    pub fn statistics(&self) -> ScheduleStatistics {
        ScheduleStatistics::compute(&self.catalog, &self.roster, &self.schedule)
    }

    pub fn report(&self) -> ScheduleReport {
        ScheduleReport::new(
            &self.catalog,
            &self.roster,
            &self.schedule,
            self.incomplete.clone(),
        )
    }
}

/// Catalog → roster → model → solution pipeline.
pub struct RosterPlanner<E = GoodLpEngine> {
    catalog: ShiftCatalog,
    settings: PlannerSettings,
    solver: Solver<E>,
}

impl RosterPlanner<GoodLpEngine> {
    pub fn new(catalog: ShiftCatalog, settings: PlannerSettings) -> Self {
        Self::with_engine(catalog, settings, GoodLpEngine)
    }
}

impl<E: AssignmentEngine> RosterPlanner<E> {
    pub fn with_engine(catalog: ShiftCatalog, settings: PlannerSettings, engine: E) -> Self {
        Self {
            catalog,
            settings,
            solver: Solver::new(engine),
        }
    }

    /// Disaggregates `groups` after `individuals`, scores everyone, builds the
    /// model and solves it.
    ///
    /// Only configuration problems are errors; an incomplete solve is
    /// reported through [`RosterPlan::incomplete`].
    pub fn plan(
        &self,
        individuals: Vec<Volunteer>,
        groups: &[VolunteerGroup],
    ) -> Result<RosterPlan, ConfigurationError> {
        let individual_count = individuals.len();
        let volunteers = disaggregate_groups(
            individuals,
            groups,
            &self.catalog,
            self.settings.preference_slots,
        )?;
        info!(
            individuals = individual_count,
            synthetic = volunteers.len() - individual_count,
            shifts = self.catalog.len(),
            "roster assembled"
        );

        let roster = ScoredRoster::new(volunteers, &self.catalog);
        let model = AssignmentModel::build(&self.catalog, &roster, self.settings.weights)?;
        info!(
            variables = model.variable_count(),
            constraints = model.constraint_count(),
            scalar = model.scalar(),
            "assignment model built"
        );

        let (schedule, incomplete) = match self.solver.solve(&model, self.settings.budget) {
            Ok(schedule) => (schedule, None),
            Err(err) => {
                let reason = err.reason.clone();
                (err.into_partial(), Some(reason))
            }
        };

        Ok(RosterPlan {
            catalog: self.catalog.clone(),
            roster,
            schedule,
            incomplete,
        })
    }
}
