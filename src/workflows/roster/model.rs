//! Boolean-linear assignment model.
//!
//! The model is engine-agnostic data: a dense volunteer × shift decision grid,
//! the free decision variables with their integer objective coefficients, and
//! the `<=` constraints over them. Engines translate it into their own API.

use super::catalog::ShiftCatalog;
use super::domain::{ConfigurationError, VolunteerId};
use super::preferences::ScoredRoster;
use std::collections::HashMap;

/// Relative weights of the two scalarized objectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectiveWeights {
    /// Weight of capacity-normalized shift coverage.
    pub coverage: i64,
    /// Weight of realized preference score.
    pub preference: i64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            coverage: 10,
            preference: 1,
        }
    }
}

/// Largest coefficient magnitude engines can represent exactly as an `f64`.
pub const MAX_EXACT_COEFFICIENT: i64 = 1 << 53;

/// Product of the distinct nonzero capacities, in first-occurrence order.
///
/// Multiplying both objectives by this value turns the per-seat coverage
/// weight `1 / capacity` into an integer for every shift.
pub fn objective_scalar(catalog: &ShiftCatalog) -> Result<i64, ConfigurationError> {
    catalog
        .distinct_capacities()
        .into_iter()
        .filter(|capacity| *capacity > 0)
        .try_fold(1i64, |product, capacity| {
            product.checked_mul(i64::from(capacity))
        })
        .ok_or(ConfigurationError::ObjectiveOverflow)
}

/// Integer per-seat coverage weight of a shift; zero-capacity shifts weigh nothing.
pub fn coverage_weight(scalar: i64, capacity: u32) -> i64 {
    if capacity == 0 {
        0
    } else {
        scalar / i64::from(capacity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionCell {
    /// Shift is not on the volunteer's list; the pair can never be assigned.
    Pinned,
    /// Index into [`AssignmentModel::variables`].
    Free(usize),
}

/// Dense row-major (volunteer, shift) grid with side lookups.
#[derive(Debug, Clone)]
pub struct DecisionGrid {
    columns: usize,
    cells: Vec<DecisionCell>,
    rows: HashMap<VolunteerId, usize>,
    column_names: HashMap<String, usize>,
}

impl DecisionGrid {
    pub fn rows(&self) -> usize {
        if self.columns == 0 {
            self.rows.len()
        } else {
            self.cells.len() / self.columns
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<DecisionCell> {
        if column >= self.columns {
            return None;
        }
        self.cells.get(row * self.columns + column).copied()
    }

    pub fn row_of(&self, volunteer: VolunteerId) -> Option<usize> {
        self.rows.get(&volunteer).copied()
    }

    pub fn column_of(&self, shift: &str) -> Option<usize> {
        self.column_names.get(shift).copied()
    }

    /// Looks up the decision for a volunteer and shift by identity.
    pub fn decision(&self, volunteer: VolunteerId, shift: &str) -> Option<DecisionCell> {
        self.cell(self.row_of(volunteer)?, self.column_of(shift)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionVariable {
    pub row: usize,
    pub column: usize,
    pub coefficient: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// Seats on one shift.
    Capacity { column: usize },
    /// At most one shift per volunteer.
    SingleShift { row: usize },
}

/// `sum(variables) <= upper_bound`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearConstraint {
    pub kind: ConstraintKind,
    pub variables: Vec<usize>,
    pub upper_bound: u32,
}

#[derive(Debug, Clone)]
pub struct AssignmentModel {
    grid: DecisionGrid,
    variables: Vec<DecisionVariable>,
    constraints: Vec<LinearConstraint>,
    capacities: Vec<u32>,
    scalar: i64,
}

impl AssignmentModel {
    /// Builds the model for `roster` over `catalog`.
    ///
    /// Every volunteer choice must name a catalog shift. Pairs outside a
    /// volunteer's list are pinned to false and produce no variable.
    pub fn build(
        catalog: &ShiftCatalog,
        roster: &ScoredRoster,
        weights: ObjectiveWeights,
    ) -> Result<Self, ConfigurationError> {
        for volunteer in roster.volunteers() {
            if let Some(unknown) = volunteer
                .preferences
                .choices()
                .find(|choice| !catalog.contains(choice))
            {
                return Err(ConfigurationError::UnknownVolunteerShift {
                    volunteer: volunteer.id,
                    name: volunteer.display_name(),
                    shift: unknown.to_string(),
                });
            }
        }

        let scalar = objective_scalar(catalog)?;
        let shift_weights: Vec<i64> = catalog
            .shifts()
            .iter()
            .map(|shift| {
                weights
                    .coverage
                    .checked_mul(coverage_weight(scalar, shift.capacity))
                    .ok_or(ConfigurationError::ObjectiveOverflow)
            })
            .collect::<Result<_, _>>()?;
        let preference_unit = weights
            .preference
            .checked_mul(scalar)
            .ok_or(ConfigurationError::ObjectiveOverflow)?;

        let columns = catalog.len();
        let mut cells = Vec::with_capacity(roster.len() * columns);
        let mut rows = HashMap::with_capacity(roster.len());
        let mut variables = Vec::new();

        for (row, (volunteer, scores)) in roster.iter().enumerate() {
            rows.insert(volunteer.id, row);
            for (column, shift) in catalog.shifts().iter().enumerate() {
                if !volunteer.preferences.contains(&shift.name) {
                    cells.push(DecisionCell::Pinned);
                    continue;
                }

                let coefficient = preference_unit
                    .checked_mul(i64::from(scores.get(column)))
                    .and_then(|preference| preference.checked_add(shift_weights[column]))
                    .filter(|coefficient| coefficient.unsigned_abs() <= MAX_EXACT_COEFFICIENT.unsigned_abs())
                    .ok_or(ConfigurationError::ObjectiveOverflow)?;

                cells.push(DecisionCell::Free(variables.len()));
                variables.push(DecisionVariable {
                    row,
                    column,
                    coefficient,
                });
            }
        }

        let mut by_column: Vec<Vec<usize>> = vec![Vec::new(); columns];
        let mut by_row: Vec<Vec<usize>> = vec![Vec::new(); roster.len()];
        for (index, variable) in variables.iter().enumerate() {
            by_column[variable.column].push(index);
            by_row[variable.row].push(index);
        }

        let capacities: Vec<u32> = catalog.shifts().iter().map(|s| s.capacity).collect();
        let mut constraints = Vec::with_capacity(columns + roster.len());
        for (column, members) in by_column.into_iter().enumerate() {
            constraints.push(LinearConstraint {
                kind: ConstraintKind::Capacity { column },
                variables: members,
                upper_bound: capacities[column],
            });
        }
        for (row, members) in by_row.into_iter().enumerate() {
            constraints.push(LinearConstraint {
                kind: ConstraintKind::SingleShift { row },
                variables: members,
                upper_bound: 1,
            });
        }

        let column_names = catalog
            .shifts()
            .iter()
            .enumerate()
            .map(|(column, shift)| (shift.name.clone(), column))
            .collect();

        Ok(Self {
            grid: DecisionGrid {
                columns,
                cells,
                rows,
                column_names,
            },
            variables,
            constraints,
            capacities,
            scalar,
        })
    }

    pub fn grid(&self) -> &DecisionGrid {
        &self.grid
    }

    pub fn variables(&self) -> &[DecisionVariable] {
        &self.variables
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn scalar(&self) -> i64 {
        self.scalar
    }

    pub fn capacity(&self, column: usize) -> u32 {
        self.capacities.get(column).copied().unwrap_or(0)
    }

    /// Objective of a candidate assignment given one value per variable.
    /// Missing values count as false; the total saturates at the `i64` range.
    pub fn objective_value(&self, values: &[bool]) -> i64 {
        self.variables
            .iter()
            .zip(values)
            .filter(|(_, value)| **value)
            .fold(0i64, |total, (variable, _)| total.saturating_add(variable.coefficient))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::roster::domain::{PreferenceList, Volunteer};

    fn volunteer(id: usize, preferred: bool, choices: &[&str]) -> Volunteer {
        Volunteer {
            id: VolunteerId(id),
            first_name: format!("V{}", id + 1),
            last_name: String::new(),
            is_preferred: preferred,
            preferences: PreferenceList::new(choices.iter().copied()),
        }
    }

    #[test]
    fn scalar_is_product_of_distinct_capacities() {
        let catalog = ShiftCatalog::standard();
        let scalar = objective_scalar(&catalog).expect("fits");
        assert_eq!(scalar, 960);
        assert_eq!(coverage_weight(scalar, 8), 120);
        assert_eq!(coverage_weight(scalar, 4), 240);
        assert_eq!(coverage_weight(scalar, 0), 0);
    }

    #[test]
    fn scalar_skips_zero_capacity_and_defaults_to_one() {
        let catalog = ShiftCatalog::from_shifts([("a", 0), ("b", 3)]);
        assert_eq!(objective_scalar(&catalog), Ok(3));

        let empty = ShiftCatalog::from_shifts(Vec::<(String, u32)>::new());
        assert_eq!(objective_scalar(&empty), Ok(1));
    }

    #[test]
    fn scalar_overflow_is_reported() {
        let catalog = ShiftCatalog::from_shifts(
            (0..40u32).map(|i| (format!("s{i}"), 1000 + i)),
        );
        assert_eq!(
            objective_scalar(&catalog),
            Err(ConfigurationError::ObjectiveOverflow)
        );
    }

    #[test]
    fn grid_pins_unlisted_pairs_and_counts_constraints() {
        let catalog = ShiftCatalog::from_shifts([("Mon", 1), ("Tue", 1), ("Wed", 1)]);
        let roster = ScoredRoster::new(
            vec![
                volunteer(0, false, &["Mon", "Tue"]),
                volunteer(1, true, &["Mon"]),
            ],
            &catalog,
        );
        let model = AssignmentModel::build(&catalog, &roster, ObjectiveWeights::default())
            .expect("model builds");

        assert_eq!(model.grid().rows(), 2);
        assert_eq!(model.grid().columns(), 3);
        assert_eq!(model.variable_count(), 3);
        assert_eq!(model.constraint_count(), 3 + 2);
        assert_eq!(model.grid().decision(VolunteerId(1), "Tue"), Some(DecisionCell::Pinned));
        assert_eq!(model.grid().decision(VolunteerId(0), "Wed"), Some(DecisionCell::Pinned));
        assert!(matches!(
            model.grid().decision(VolunteerId(0), "Tue"),
            Some(DecisionCell::Free(_))
        ));
        assert_eq!(model.grid().decision(VolunteerId(7), "Mon"), None);
        assert_eq!(model.grid().decision(VolunteerId(0), "Sun"), None);
    }

    #[test]
    fn coefficients_combine_coverage_and_scaled_preference() {
        let catalog = ShiftCatalog::standard();
        let roster = ScoredRoster::new(
            vec![volunteer(
                0,
                false,
                &["Monday Breakfast", "Monday Overnight"],
            )],
            &catalog,
        );
        let model = AssignmentModel::build(&catalog, &roster, ObjectiveWeights::default())
            .expect("model builds");

        let coefficient = |shift: &str| match model.grid().decision(VolunteerId(0), shift) {
            Some(DecisionCell::Free(index)) => model.variables()[index].coefficient,
            other => panic!("expected free cell, got {other:?}"),
        };
        assert_eq!(coefficient("Monday Breakfast"), 10 * 120 + 960 * 2);
        assert_eq!(coefficient("Monday Overnight"), 10 * 240 + 960);
    }

    #[test]
    fn objective_value_sums_selected_coefficients() {
        let catalog = ShiftCatalog::from_shifts([("Mon", 1), ("Tue", 1), ("Wed", 1)]);
        let roster = ScoredRoster::new(
            vec![
                volunteer(0, false, &["Mon", "Tue"]),
                volunteer(1, true, &["Mon"]),
            ],
            &catalog,
        );
        let model = AssignmentModel::build(&catalog, &roster, ObjectiveWeights::default())
            .expect("model builds");

        let mut values = vec![false; model.variable_count()];
        for (index, variable) in model.variables().iter().enumerate() {
            let pick = (variable.row, variable.column) == (0, 1)
                || (variable.row, variable.column) == (1, 0);
            values[index] = pick;
        }
        assert_eq!(model.objective_value(&values), (10 + 1) + (10 + 2));
        assert_eq!(model.objective_value(&[]), 0);
    }

    #[test]
    fn coefficients_beyond_exact_float_range_are_rejected() {
        let catalog = ShiftCatalog::from_shifts([("Mon", 1)]);
        let roster = ScoredRoster::new(vec![volunteer(0, false, &["Mon"])], &catalog);

        // Coverage 2^53 - 1 plus a preference score of 1 lands exactly on the limit.
        let at_limit = ObjectiveWeights {
            coverage: MAX_EXACT_COEFFICIENT - 1,
            preference: 1,
        };
        let model = AssignmentModel::build(&catalog, &roster, at_limit).expect("exact");
        assert_eq!(model.variables()[0].coefficient, MAX_EXACT_COEFFICIENT);

        let beyond = ObjectiveWeights {
            coverage: MAX_EXACT_COEFFICIENT,
            preference: 1,
        };
        assert_eq!(
            AssignmentModel::build(&catalog, &roster, beyond).map(|_| ()),
            Err(ConfigurationError::ObjectiveOverflow)
        );
        let negative = ObjectiveWeights {
            coverage: -MAX_EXACT_COEFFICIENT,
            preference: -1,
        };
        assert_eq!(
            AssignmentModel::build(&catalog, &roster, negative).map(|_| ()),
            Err(ConfigurationError::ObjectiveOverflow)
        );
    }

    #[test]
    fn objective_value_saturates_instead_of_wrapping() {
        let catalog = ShiftCatalog::from_shifts([("Mon", 1)]);
        let roster = ScoredRoster::new(
            (0..1100).map(|id| volunteer(id, false, &["Mon"])).collect(),
            &catalog,
        );
        let weights = ObjectiveWeights {
            coverage: MAX_EXACT_COEFFICIENT - 1,
            preference: 1,
        };
        let model = AssignmentModel::build(&catalog, &roster, weights).expect("model builds");

        let everyone = vec![true; model.variable_count()];
        assert_eq!(model.objective_value(&everyone), i64::MAX);
    }

    #[test]
    fn unknown_volunteer_shift_is_rejected() {
        let catalog = ShiftCatalog::from_shifts([("Mon", 1)]);
        let roster = ScoredRoster::new(vec![volunteer(0, false, &["Mon", "Thu"])], &catalog);
        let err = AssignmentModel::build(&catalog, &roster, ObjectiveWeights::default())
            .expect_err("Thu is not a shift");
        assert_eq!(
            err,
            ConfigurationError::UnknownVolunteerShift {
                volunteer: VolunteerId(0),
                name: "V1".into(),
                shift: "Thu".into(),
            }
        );
    }
}
