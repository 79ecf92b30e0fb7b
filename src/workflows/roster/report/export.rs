use super::views::{ShiftAssignmentView, VolunteerAssignmentView};
use std::io::Write;
use std::path::{Path, PathBuf};

pub const VOLUNTEER_SCHEDULE_FILE: &str = "Volunteer-Focused Schedule.csv";
pub const SHIFT_SCHEDULE_FILE: &str = "Shift-Focused Schedule.csv";
pub const UNDER_STAFFED_NOTE: &str = "Warning: this shift is under-staffed.";

/// `Volunteer,Assignment`, one row per volunteer in roster order.
pub fn write_volunteer_schedule<W: Write>(
    writer: W,
    volunteers: &[VolunteerAssignmentView],
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(["Volunteer", "Assignment"])?;
    for volunteer in volunteers {
        csv_writer.write_record([volunteer.name.as_str(), volunteer.assignment_label()])?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// `Shift,Volunteer 1..Volunteer N,Notes` where `N` is `seat_columns`.
/// Unfilled seats are blank; under-staffed shifts carry a warning note.
pub fn write_shift_schedule<W: Write>(
    writer: W,
    shifts: &[ShiftAssignmentView],
    seat_columns: usize,
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header = Vec::with_capacity(seat_columns + 2);
    header.push("Shift".to_string());
    header.extend((1..=seat_columns).map(|seat| format!("Volunteer {seat}")));
    header.push("Notes".to_string());
    csv_writer.write_record(&header)?;

    for shift in shifts {
        let mut row = Vec::with_capacity(seat_columns + 2);
        row.push(shift.shift.as_str());
        row.extend(shift.volunteers.iter().map(String::as_str));
        if row.len() < seat_columns + 1 {
            row.resize(seat_columns + 1, "");
        }
        row.push(if shift.under_staffed {
            UNDER_STAFFED_NOTE
        } else {
            ""
        });
        csv_writer.write_record(&row)?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes both schedule files into `dir` and returns their paths.
pub fn export_schedules(
    dir: &Path,
    shifts: &[ShiftAssignmentView],
    volunteers: &[VolunteerAssignmentView],
    seat_columns: usize,
) -> Result<Vec<PathBuf>, csv::Error> {
    std::fs::create_dir_all(dir)?;

    let shift_path = dir.join(SHIFT_SCHEDULE_FILE);
    write_shift_schedule(std::fs::File::create(&shift_path)?, shifts, seat_columns)?;

    let volunteer_path = dir.join(VOLUNTEER_SCHEDULE_FILE);
    write_volunteer_schedule(std::fs::File::create(&volunteer_path)?, volunteers)?;

    Ok(vec![shift_path, volunteer_path])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift(name: &str, capacity: u32, volunteers: &[&str]) -> ShiftAssignmentView {
        ShiftAssignmentView {
            shift: name.into(),
            capacity,
            volunteers: volunteers.iter().map(|v| v.to_string()).collect(),
            under_staffed: (volunteers.len() as u32) < capacity,
        }
    }

    #[test]
    fn shift_schedule_pads_seats_and_flags_under_staffing() {
        let mut buffer = Vec::new();
        write_shift_schedule(
            &mut buffer,
            &[shift("Mon", 2, &["Ada Lovelace", "Alan Turing"]), shift("Tue", 3, &["Grace Hopper"])],
            3,
        )
        .expect("writes");

        let text = String::from_utf8(buffer).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Shift,Volunteer 1,Volunteer 2,Volunteer 3,Notes");
        assert_eq!(lines[1], "Mon,Ada Lovelace,Alan Turing,,");
        assert_eq!(lines[2], "Tue,Grace Hopper,,,Warning: this shift is under-staffed.");
    }

    #[test]
    fn volunteer_schedule_labels_unassigned() {
        let volunteers = vec![
            VolunteerAssignmentView {
                volunteer_id: 0,
                name: "Ada Lovelace".into(),
                is_preferred: false,
                shift: Some("Mon".into()),
                preference_score: 2,
            },
            VolunteerAssignmentView {
                volunteer_id: 1,
                name: "Alan Turing".into(),
                is_preferred: true,
                shift: None,
                preference_score: 0,
            },
        ];

        let mut buffer = Vec::new();
        write_volunteer_schedule(&mut buffer, &volunteers).expect("writes");
        let text = String::from_utf8(buffer).expect("utf8");
        assert_eq!(
            text,
            "Volunteer,Assignment\nAda Lovelace,Mon\nAlan Turing,Unassigned\n"
        );
    }

    #[test]
    fn export_writes_both_files() {
        let dir = std::env::temp_dir().join(format!("shift-roster-export-{}", std::process::id()));
        let paths = export_schedules(&dir, &[shift("Mon", 1, &[])], &[], 1).expect("exports");

        assert_eq!(paths.len(), 2);
        let shift_csv = std::fs::read_to_string(&paths[0]).expect("shift file");
        assert!(shift_csv.starts_with("Shift,Volunteer 1,Notes\n"));
        let volunteer_csv = std::fs::read_to_string(&paths[1]).expect("volunteer file");
        assert_eq!(volunteer_csv, "Volunteer,Assignment\n");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
