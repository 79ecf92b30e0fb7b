use super::model::AssignmentModel;
use super::solver::{AssignmentEngine, EngineBudget, EngineError, EngineSolution};
use good_lp::{
    variable, variables, Expression, ResolutionError, Solution, SolverModel, Variable,
};

#[cfg(not(feature = "highs"))]
const BACKEND: &str = "good_lp/microlp";
#[cfg(feature = "highs")]
const BACKEND: &str = "good_lp/highs";

/// `good_lp` adapter.
///
/// The default backend is the pure-Rust `microlp` branch-and-bound solver,
/// which has no time limit of its own; the orchestrator's deadline covers it.
/// With the `highs` feature the remaining budget is handed to HiGHS, which
/// returns its incumbent when the limit is reached.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodLpEngine;

impl AssignmentEngine for GoodLpEngine {
    fn name(&self) -> &'static str {
        BACKEND
    }

    fn solve(
        &self,
        model: &AssignmentModel,
        budget: &EngineBudget,
    ) -> Result<EngineSolution, EngineError> {
        if budget.should_stop() {
            return Ok(EngineSolution::interrupted(vec![false; model.variable_count()]));
        }

        let mut vars = variables!();
        let xs: Vec<Variable> = model
            .variables()
            .iter()
            .map(|_| vars.add(variable().binary()))
            .collect();

        let objective = model
            .variables()
            .iter()
            .zip(&xs)
            .fold(Expression::from(0.0), |acc, (decision, x)| {
                acc + decision.coefficient as f64 * *x
            });

        let unsolved = vars.maximise(objective);
        #[cfg(not(feature = "highs"))]
        let problem = unsolved.using(good_lp::default_solver);
        #[cfg(feature = "highs")]
        let problem = highs_with_budget(unsolved.using(good_lp::solvers::highs::highs), budget);

        let values = solve_constrained(problem, model, &xs)?;
        // Only a backend with a native limit can stop short of optimal.
        if cfg!(feature = "highs") && budget.should_stop() {
            Ok(EngineSolution::interrupted(values))
        } else {
            Ok(EngineSolution::optimal(values))
        }
    }
}

#[cfg(feature = "highs")]
fn highs_with_budget(
    problem: good_lp::solvers::highs::HighsProblem,
    budget: &EngineBudget,
) -> good_lp::solvers::highs::HighsProblem {
    match budget.remaining() {
        Some(left) => problem.set_time_limit(left.as_secs_f64()),
        None => problem,
    }
}

fn solve_constrained<P>(
    mut problem: P,
    model: &AssignmentModel,
    xs: &[Variable],
) -> Result<Vec<bool>, EngineError>
where
    P: SolverModel<Error = ResolutionError>,
{
    for constraint in model.constraints() {
        // Empty sums are trivially satisfied.
        if constraint.variables.is_empty() {
            continue;
        }
        let sum = constraint
            .variables
            .iter()
            .fold(Expression::from(0.0), |acc, &index| acc + xs[index]);
        problem.add_constraint(sum.leq(f64::from(constraint.upper_bound)));
    }

    let solution = problem.solve().map_err(|err| match err {
        ResolutionError::Infeasible => EngineError::Infeasible,
        other => EngineError::Failed(other.to_string()),
    })?;

    Ok(xs.iter().map(|x| solution.value(*x) > 0.5).collect())
}
