use serde::Serialize;
use std::collections::HashMap;

/// Time-of-day template used to stamp out one shift per weekday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    pub name: String,
    pub capacity: u32,
}

impl Period {
    pub fn new(name: impl Into<String>, capacity: u32) -> Self {
        Self {
            name: name.into(),
            capacity,
        }
    }

    pub fn standard() -> Vec<Period> {
        vec![
            Period::new("Breakfast", 8),
            Period::new("Dinner", 6),
            Period::new("Evening", 5),
            Period::new("Overnight", 4),
        ]
    }
}

pub fn standard_weekdays() -> Vec<String> {
    [
        "Sunday",
        "Monday",
        "Tuesday",
        "Wednesday",
        "Thursday",
        "Friday",
        "Saturday",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shift {
    pub name: String,
    pub capacity: u32,
}

/// Ordered, read-only universe of schedulable shifts.
///
/// Shift ordinals (positions in catalog order) double as the column index of
/// the decision grid.
#[derive(Debug, Clone, Default)]
pub struct ShiftCatalog {
    shifts: Vec<Shift>,
    by_name: HashMap<String, usize>,
}

impl ShiftCatalog {
    /// One shift per (weekday, period), weekday-major.
    pub fn from_templates<S: AsRef<str>>(weekdays: &[S], periods: &[Period]) -> Self {
        Self::from_shifts(weekdays.iter().flat_map(|weekday| {
            periods.iter().map(move |period| {
                (
                    format!("{} {}", weekday.as_ref(), period.name),
                    period.capacity,
                )
            })
        }))
    }

    /// Catalog from explicit shifts in the given order. A repeated name keeps
    /// its first definition.
    pub fn from_shifts<I, S>(shifts: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let mut catalog = Self::default();
        for (name, capacity) in shifts {
            let name = name.into();
            if catalog.by_name.contains_key(&name) {
                continue;
            }
            catalog.by_name.insert(name.clone(), catalog.shifts.len());
            catalog.shifts.push(Shift { name, capacity });
        }
        catalog
    }

    pub fn standard() -> Self {
        Self::from_templates(&standard_weekdays(), &Period::standard())
    }

    pub fn len(&self) -> usize {
        self.shifts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shifts.is_empty()
    }

    pub fn shifts(&self) -> &[Shift] {
        &self.shifts
    }

    pub fn get(&self, ordinal: usize) -> Option<&Shift> {
        self.shifts.get(ordinal)
    }

    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn shift(&self, name: &str) -> Option<&Shift> {
        self.ordinal(name).map(|ordinal| &self.shifts[ordinal])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn max_capacity(&self) -> u32 {
        self.shifts
            .iter()
            .map(|shift| shift.capacity)
            .max()
            .unwrap_or(0)
    }

    /// Total seats across all shifts.
    pub fn required_seats(&self) -> u64 {
        self.shifts.iter().map(|shift| u64::from(shift.capacity)).sum()
    }

    /// Capacities in order of first occurrence, duplicates removed.
    pub fn distinct_capacities(&self) -> Vec<u32> {
        let mut distinct = Vec::new();
        for shift in &self.shifts {
            if !distinct.contains(&shift.capacity) {
                distinct.push(shift.capacity);
            }
        }
        distinct
    }
}
