use super::model::{AssignmentModel, DecisionCell};
use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How long the orchestrator keeps listening after raising the stop flag.
pub const DEFAULT_STOP_GRACE: Duration = Duration::from_millis(500);

/// Resource budget handed to the solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolveBudget {
    pub time_limit: Option<Duration>,
}

impl SolveBudget {
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn with_time_limit(limit: Duration) -> Self {
        Self {
            time_limit: Some(limit),
        }
    }
}

/// Running budget seen by an engine: the deadline of the solve plus a stop
/// flag the orchestrator raises once it stops waiting.
///
/// Engines with a native limit should apply [`EngineBudget::remaining`];
/// engines that iterate should poll [`EngineBudget::should_stop`] and hand
/// back their best assignment marked [`EngineStatus::Interrupted`].
#[derive(Debug, Clone)]
pub struct EngineBudget {
    time_limit: Option<Duration>,
    deadline: Option<Instant>,
    stop: Arc<AtomicBool>,
}

impl EngineBudget {
    pub fn start(budget: SolveBudget) -> Self {
        Self {
            time_limit: budget.time_limit,
            deadline: budget.time_limit.map(|limit| Instant::now() + limit),
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    /// Time left before the deadline; `None` when unlimited.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    pub fn should_stop(&self) -> bool {
        self.stop.load(Ordering::Acquire) || self.remaining() == Some(Duration::ZERO)
    }

    fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    /// The engine proved its assignment optimal.
    Optimal,
    /// The engine stopped on the budget; the values are its best incumbent.
    Interrupted,
}

/// One resolved boolean per model variable, in variable order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSolution {
    pub values: Vec<bool>,
    pub status: EngineStatus,
}

impl EngineSolution {
    pub fn optimal(values: Vec<bool>) -> Self {
        Self {
            values,
            status: EngineStatus::Optimal,
        }
    }

    pub fn interrupted(values: Vec<bool>) -> Self {
        Self {
            values,
            status: EngineStatus::Interrupted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("model is infeasible")]
    Infeasible,
    #[error("{0}")]
    Failed(String),
}

/// Exact boolean-linear optimization engine.
///
/// Implementations maximize the model objective subject to its `<=`
/// constraints and report a value for every variable. They receive the
/// running budget; the orchestrator still validates whatever they return.
pub trait AssignmentEngine: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    fn solve(
        &self,
        model: &AssignmentModel,
        budget: &EngineBudget,
    ) -> Result<EngineSolution, EngineError>;
}

/// Why a solve did not yield a complete, validated assignment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IncompleteReason {
    #[error("time budget of {0:?} exhausted before the engine finished")]
    BudgetExhausted(Duration),
    #[error("engine reported the model infeasible")]
    Infeasible,
    #[error("engine failure: {0}")]
    EngineFailure(String),
    #[error("engine resolved {resolved} of {expected} decision values")]
    PartialSolution { resolved: usize, expected: usize },
    #[error("engine solution violates {0}")]
    InvalidSolution(String),
}

/// Recoverable solve failure. The partial schedule leaves every unresolved
/// volunteer unassigned and is always safe to report on.
#[derive(Debug, Clone, thiserror::Error)]
#[error("solve incomplete: {reason}")]
pub struct SolveIncomplete {
    pub reason: IncompleteReason,
    partial: Schedule,
}

impl SolveIncomplete {
    pub fn partial(&self) -> &Schedule {
        &self.partial
    }

    pub fn into_partial(self) -> Schedule {
        self.partial
    }
}

/// Resolved assignment: at most one shift column per roster row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule {
    assignments: Vec<Option<usize>>,
    shift_loads: Vec<u32>,
    objective_value: i64,
}

impl Schedule {
    /// Everybody unassigned.
    pub fn unassigned(model: &AssignmentModel) -> Self {
        Self {
            assignments: vec![None; model.grid().rows()],
            shift_loads: vec![0; model.grid().columns()],
            objective_value: 0,
        }
    }

    /// Validates engine values against the model and resolves them.
    ///
    /// Values beyond the provided slice count as false.
    pub fn from_values(model: &AssignmentModel, values: &[bool]) -> Result<Self, IncompleteReason> {
        let mut schedule = Self::unassigned(model);

        for (index, variable) in model.variables().iter().enumerate() {
            if !values.get(index).copied().unwrap_or(false) {
                continue;
            }

            if model.grid().cell(variable.row, variable.column) != Some(DecisionCell::Free(index)) {
                return Err(IncompleteReason::InvalidSolution(format!(
                    "preference pinning for row {} column {}",
                    variable.row, variable.column
                )));
            }

            let slot = &mut schedule.assignments[variable.row];
            if slot.is_some() {
                return Err(IncompleteReason::InvalidSolution(format!(
                    "the single-shift limit for row {}",
                    variable.row
                )));
            }
            *slot = Some(variable.column);

            let load = &mut schedule.shift_loads[variable.column];
            *load += 1;
            if *load > model.capacity(variable.column) {
                return Err(IncompleteReason::InvalidSolution(format!(
                    "the capacity of column {}",
                    variable.column
                )));
            }
        }

        schedule.objective_value = model.objective_value(values);
        Ok(schedule)
    }

    /// Shift column assigned to a roster row.
    pub fn assigned_shift(&self, row: usize) -> Option<usize> {
        self.assignments.get(row).copied().flatten()
    }

    /// Roster rows assigned to `column`, in roster order.
    pub fn volunteers_on(&self, column: usize) -> impl Iterator<Item = usize> + '_ {
        self.assignments
            .iter()
            .enumerate()
            .filter(move |(_, assigned)| **assigned == Some(column))
            .map(|(row, _)| row)
    }

    pub fn shift_load(&self, column: usize) -> u32 {
        self.shift_loads.get(column).copied().unwrap_or(0)
    }

    pub fn assigned_count(&self) -> usize {
        self.assignments.iter().filter(|a| a.is_some()).count()
    }

    pub fn objective_value(&self) -> i64 {
        self.objective_value
    }
}

/// Runs an engine on a worker thread under a budget and validates its answer.
///
/// Once the time limit passes the engine is asked to stop and given
/// `stop_grace` to hand back its incumbent. An engine that ignores the request
/// is abandoned: its thread runs to completion in the background and its
/// answer is dropped.
#[derive(Debug)]
pub struct Solver<E> {
    engine: Arc<E>,
    stop_grace: Duration,
}

impl<E> Clone for Solver<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            stop_grace: self.stop_grace,
        }
    }
}

impl<E: AssignmentEngine> Solver<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine: Arc::new(engine),
            stop_grace: DEFAULT_STOP_GRACE,
        }
    }

    pub fn with_stop_grace(mut self, grace: Duration) -> Self {
        self.stop_grace = grace;
        self
    }

    pub fn solve(
        &self,
        model: &AssignmentModel,
        budget: SolveBudget,
    ) -> Result<Schedule, SolveIncomplete> {
        if model.variable_count() == 0 {
            debug!("no free decision variables; skipping engine");
            return Ok(Schedule::unassigned(model));
        }

        info!(
            engine = self.engine.name(),
            variables = model.variable_count(),
            constraints = model.constraint_count(),
            time_limit = ?budget.time_limit,
            "starting solve"
        );
        let started = Instant::now();
        let budget = EngineBudget::start(budget);

        let solution = self
            .run_engine(model, &budget)
            .map_err(|reason| incomplete(model, reason))?;

        if solution.status == EngineStatus::Interrupted {
            let reason =
                IncompleteReason::BudgetExhausted(budget.time_limit().unwrap_or_else(|| started.elapsed()));
            let partial =
                Schedule::from_values(model, &solution.values).unwrap_or_else(|_| Schedule::unassigned(model));
            warn!(
                %reason,
                assigned = partial.assigned_count(),
                objective = partial.objective_value(),
                "keeping the engine's best assignment"
            );
            return Err(SolveIncomplete { reason, partial });
        }

        let expected = model.variable_count();
        if solution.values.len() < expected {
            let reason = IncompleteReason::PartialSolution {
                resolved: solution.values.len(),
                expected,
            };
            let partial =
                Schedule::from_values(model, &solution.values).unwrap_or_else(|_| Schedule::unassigned(model));
            warn!(%reason, "engine returned a partial solution");
            return Err(SolveIncomplete { reason, partial });
        }

        let schedule =
            Schedule::from_values(model, &solution.values).map_err(|reason| incomplete(model, reason))?;

        info!(
            elapsed = ?started.elapsed(),
            objective = schedule.objective_value(),
            assigned = schedule.assigned_count(),
            "solve finished"
        );
        Ok(schedule)
    }

    fn run_engine(
        &self,
        model: &AssignmentModel,
        budget: &EngineBudget,
    ) -> Result<EngineSolution, IncompleteReason> {
        let (tx, rx) = mpsc::channel();
        let engine = Arc::clone(&self.engine);
        let job = model.clone();
        let job_budget = budget.clone();

        thread::Builder::new()
            .name("roster-engine".into())
            .spawn(move || {
                let result = catch_unwind(AssertUnwindSafe(|| engine.solve(&job, &job_budget)));
                // The receiver is gone if the worker was abandoned.
                let _ = tx.send(result);
            })
            .map_err(|err| IncompleteReason::EngineFailure(err.to_string()))?;

        let worker_exited = || IncompleteReason::EngineFailure("engine worker exited".into());
        let received = match budget.time_limit() {
            None => rx.recv().map_err(|_| worker_exited())?,
            Some(limit) => match rx.recv_timeout(limit) {
                Ok(received) => received,
                Err(RecvTimeoutError::Disconnected) => return Err(worker_exited()),
                Err(RecvTimeoutError::Timeout) => {
                    budget.request_stop();
                    debug!(grace = ?self.stop_grace, "time limit reached; asked the engine to stop");
                    match rx.recv_timeout(self.stop_grace) {
                        Ok(received) => received,
                        Err(RecvTimeoutError::Disconnected) => return Err(worker_exited()),
                        Err(RecvTimeoutError::Timeout) => {
                            warn!(
                                engine = self.engine.name(),
                                grace = ?self.stop_grace,
                                "engine ignored the stop request; abandoning its worker thread"
                            );
                            return Err(IncompleteReason::BudgetExhausted(limit));
                        }
                    }
                }
            },
        };

        match received {
            Ok(Ok(solution)) => Ok(solution),
            Ok(Err(EngineError::Infeasible)) => Err(IncompleteReason::Infeasible),
            Ok(Err(EngineError::Failed(message))) => Err(IncompleteReason::EngineFailure(message)),
            Err(_) => Err(IncompleteReason::EngineFailure("engine panicked".into())),
        }
    }
}

fn incomplete(model: &AssignmentModel, reason: IncompleteReason) -> SolveIncomplete {
    warn!(%reason, "solve incomplete; treating unresolved volunteers as unassigned");
    SolveIncomplete {
        reason,
        partial: Schedule::unassigned(model),
    }
}
