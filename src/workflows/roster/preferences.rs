use super::catalog::ShiftCatalog;
use super::domain::{PreferenceList, Volunteer};

/// Per-shift preference scores, indexed by catalog ordinal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceScores(Vec<u32>);

impl PreferenceScores {
    pub fn get(&self, ordinal: usize) -> u32 {
        self.0.get(ordinal).copied().unwrap_or(0)
    }

    pub fn for_shift(&self, catalog: &ShiftCatalog, name: &str) -> u32 {
        catalog
            .ordinal(name)
            .map(|ordinal| self.get(ordinal))
            .unwrap_or(0)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

/// Scores every catalog shift for one preference list.
///
/// A shift at rank `i` of a list of length `L` scores `L - i`; unlisted
/// shifts score zero. Preferred volunteers have every nonzero score doubled.
pub fn preference_scores(
    preferences: &PreferenceList,
    is_preferred: bool,
    catalog: &ShiftCatalog,
) -> PreferenceScores {
    let length = preferences.len() as u32;
    let multiplier = if is_preferred { 2 } else { 1 };

    let scores = catalog
        .shifts()
        .iter()
        .map(|shift| match preferences.position(&shift.name) {
            Some(rank) => (length - rank as u32) * multiplier,
            None => 0,
        })
        .collect();

    PreferenceScores(scores)
}

/// Volunteers paired with their precomputed scores, in roster order.
#[derive(Debug, Clone, Default)]
pub struct ScoredRoster {
    volunteers: Vec<Volunteer>,
    scores: Vec<PreferenceScores>,
}

impl ScoredRoster {
    pub fn new(volunteers: Vec<Volunteer>, catalog: &ShiftCatalog) -> Self {
        let scores = volunteers
            .iter()
            .map(|volunteer| {
                preference_scores(&volunteer.preferences, volunteer.is_preferred, catalog)
            })
            .collect();

        Self { volunteers, scores }
    }

    pub fn len(&self) -> usize {
        self.volunteers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volunteers.is_empty()
    }

    pub fn volunteers(&self) -> &[Volunteer] {
        &self.volunteers
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Volunteer, &PreferenceScores)> {
        self.volunteers.iter().zip(self.scores.iter())
    }

    pub fn preferred_count(&self) -> usize {
        self.volunteers.iter().filter(|v| v.is_preferred).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abcd_catalog() -> ShiftCatalog {
        ShiftCatalog::from_shifts([("A", 2), ("B", 2), ("C", 2), ("D", 2)])
    }

    #[test]
    fn ranks_score_from_list_length_down_to_one() {
        let catalog = abcd_catalog();
        let scores = preference_scores(&PreferenceList::new(["A", "B", "C"]), false, &catalog);
        assert_eq!(scores.as_slice(), &[3, 2, 1, 0]);
    }

    #[test]
    fn preferred_status_doubles_nonzero_scores() {
        let catalog = abcd_catalog();
        let scores = preference_scores(&PreferenceList::new(["A", "B", "C"]), true, &catalog);
        assert_eq!(scores.as_slice(), &[6, 4, 2, 0]);
        assert_eq!(scores.for_shift(&catalog, "D"), 0);
        assert_eq!(scores.for_shift(&catalog, "missing"), 0);
    }

    #[test]
    fn blank_slots_count_toward_length() {
        let catalog = abcd_catalog();
        let list = PreferenceList::new(["", "C", "", "", ""]);
        let scores = preference_scores(&list, false, &catalog);
        assert_eq!(scores.for_shift(&catalog, "C"), 4);
        assert_eq!(scores.as_slice().iter().filter(|s| **s > 0).count(), 1);
    }

    #[test]
    fn preferred_low_rank_can_trail_regular_top_rank() {
        let catalog = abcd_catalog();
        let regular = preference_scores(&PreferenceList::new(["A", "B", "C", "D"]), false, &catalog);
        let preferred = preference_scores(&PreferenceList::new(["B", "C", "D", "A"]), true, &catalog);
        assert_eq!(regular.for_shift(&catalog, "A"), 4);
        assert_eq!(preferred.for_shift(&catalog, "A"), 2);
        assert_eq!(preferred.for_shift(&catalog, "C"), 6);
    }
}
