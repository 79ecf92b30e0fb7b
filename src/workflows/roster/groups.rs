use super::catalog::ShiftCatalog;
use super::domain::{ConfigurationError, PreferenceList, Volunteer, VolunteerGroup, VolunteerId};
use tracing::debug;

/// Expands group bookings into synthetic preferred volunteers appended to
/// `roster`.
///
/// Each group contributes at most as many volunteers as its shift has seats.
/// Every synthetic volunteer lists only the group's shift, padded with blank
/// slots to `preference_slots`, so it scores `preference_slots * 2` there and
/// nothing anywhere else.
pub fn disaggregate_groups(
    mut roster: Vec<Volunteer>,
    groups: &[VolunteerGroup],
    catalog: &ShiftCatalog,
    preference_slots: usize,
) -> Result<Vec<Volunteer>, ConfigurationError> {
    for group in groups {
        let shift = catalog
            .shift(&group.shift)
            .ok_or_else(|| ConfigurationError::UnknownGroupShift {
                group: group.name.clone(),
                shift: group.shift.clone(),
            })?;

        let seats = group.headcount.min(shift.capacity);
        if seats < group.headcount {
            debug!(
                group = %group.name,
                shift = %shift.name,
                requested = group.headcount,
                capacity = shift.capacity,
                "group booking capped at shift capacity"
            );
        }

        for seat in 1..=seats {
            roster.push(Volunteer {
                id: VolunteerId(roster.len()),
                first_name: group.name.clone(),
                last_name: format!("Volunteer {seat}"),
                is_preferred: true,
                preferences: PreferenceList::padded([group.shift.as_str()], preference_slots),
            });
        }
    }

    Ok(roster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::roster::preferences::preference_scores;

    fn individual(id: usize, choices: &[&str]) -> Volunteer {
        Volunteer {
            id: VolunteerId(id),
            first_name: format!("Person{id}"),
            last_name: "Individual".into(),
            is_preferred: false,
            preferences: PreferenceList::new(choices.iter().copied()),
        }
    }

    fn group(name: &str, shift: &str, headcount: u32) -> VolunteerGroup {
        VolunteerGroup {
            name: name.into(),
            shift: shift.into(),
            headcount,
        }
    }

    #[test]
    fn caps_group_at_shift_capacity() {
        let catalog = ShiftCatalog::standard();
        let roster = disaggregate_groups(
            Vec::new(),
            &[group("Rotary", "Monday Dinner", 10)],
            &catalog,
            6,
        )
        .expect("known shift");

        assert_eq!(roster.len(), 6);
        for (seat, volunteer) in roster.iter().enumerate() {
            assert!(volunteer.is_preferred);
            assert_eq!(volunteer.first_name, "Rotary");
            assert_eq!(volunteer.last_name, format!("Volunteer {}", seat + 1));
            assert_eq!(volunteer.preferences.len(), 6);
            assert_eq!(
                volunteer.preferences.choices().collect::<Vec<_>>(),
                vec!["Monday Dinner"]
            );

            let scores = preference_scores(&volunteer.preferences, true, &catalog);
            assert_eq!(scores.for_shift(&catalog, "Monday Dinner"), 12);
            assert_eq!(scores.as_slice().iter().filter(|s| **s > 0).count(), 1);
        }
    }

    #[test]
    fn ids_continue_from_existing_roster() {
        let catalog = ShiftCatalog::standard();
        let existing = vec![
            individual(0, &["Sunday Breakfast"]),
            individual(1, &["Sunday Dinner"]),
        ];
        let roster = disaggregate_groups(
            existing,
            &[
                group("Choir", "Friday Overnight", 2),
                group("Scouts", "Friday Evening", 1),
            ],
            &catalog,
            5,
        )
        .expect("known shifts");

        let ids: Vec<usize> = roster.iter().map(|v| v.id.index()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        assert_eq!(roster[4].first_name, "Scouts");
    }

    #[test]
    fn unknown_group_shift_is_a_configuration_error() {
        let catalog = ShiftCatalog::standard();
        let err = disaggregate_groups(
            Vec::new(),
            &[group("Choir", "Funday Brunch", 3)],
            &catalog,
            6,
        )
        .expect_err("unknown shift");

        assert_eq!(
            err,
            ConfigurationError::UnknownGroupShift {
                group: "Choir".into(),
                shift: "Funday Brunch".into(),
            }
        );
    }

    #[test]
    fn zero_headcount_adds_nobody() {
        let catalog = ShiftCatalog::standard();
        let roster = disaggregate_groups(
            Vec::new(),
            &[group("Ghosts", "Monday Dinner", 0)],
            &catalog,
            6,
        )
        .expect("known shift");
        assert!(roster.is_empty());
    }
}
