use super::statistics::ScheduleStatistics;
use serde::Serialize;

pub const UNASSIGNED: &str = "Unassigned";

#[derive(Debug, Clone, Serialize)]
pub struct ShiftAssignmentView {
    pub shift: String,
    pub capacity: u32,
    pub volunteers: Vec<String>,
    pub under_staffed: bool,
}

impl ShiftAssignmentView {
    pub fn open_seats(&self) -> usize {
        (self.capacity as usize).saturating_sub(self.volunteers.len())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VolunteerAssignmentView {
    pub volunteer_id: usize,
    pub name: String,
    pub is_preferred: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift: Option<String>,
    /// Score the volunteer gave the assigned shift, zero when unassigned.
    pub preference_score: u32,
}

impl VolunteerAssignmentView {
    pub fn assignment_label(&self) -> &str {
        self.shift.as_deref().unwrap_or(UNASSIGNED)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleSummary {
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incomplete_reason: Option<String>,
    pub objective_value: i64,
    pub statistics: ScheduleStatistics,
    pub shifts: Vec<ShiftAssignmentView>,
    pub volunteers: Vec<VolunteerAssignmentView>,
}
