use clap::{Args, Parser, Subcommand};
use shift_roster::config::AppConfig;
use shift_roster::error::AppError;
use shift_roster::telemetry;
use shift_roster::workflows::roster::{
    GroupIntake, IndividualIntake, RosterPlanner, ScheduleReport, ShiftCatalog,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "shift-roster",
    about = "Assign volunteers to weekly shifts, balancing coverage against their preferences",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Solve a roster from the intake tables and print or export it
    Plan(PlanArgs),
    /// List the configured shift catalog
    Catalog,
}

#[derive(Args, Debug)]
struct PlanArgs {
    /// Individual preferences CSV (First Name, Last Name, Preferred Applicants, 1st..Nth Preference)
    #[arg(long)]
    individuals: PathBuf,
    /// Optional group bookings CSV (Group, Shift, Volunteers)
    #[arg(long)]
    groups: Option<PathBuf>,
    /// Directory receiving the shift- and volunteer-focused CSV schedules
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Solver time budget in seconds, overriding ROSTER_TIME_LIMIT_SECS
    #[arg(long)]
    time_limit_secs: Option<u64>,
    /// Number of preference columns, overriding ROSTER_PREFERENCE_SLOTS
    #[arg(long, value_parser = parse_preference_slots)]
    preference_slots: Option<usize>,
    /// Print the summary as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn parse_preference_slots(raw: &str) -> Result<usize, String> {
    match raw.trim().parse::<usize>() {
        Ok(slots) if slots > 0 => Ok(slots),
        _ => Err(format!("'{raw}' must be a whole number of at least 1")),
    }
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    match cli.command {
        Command::Plan(mut args) => {
            if let Some(secs) = args.time_limit_secs.take() {
                config.planner.time_limit = Some(Duration::from_secs(secs));
            }
            if let Some(slots) = args.preference_slots.take() {
                config.planner.preference_slots = slots;
            }
            run_plan(&config, args)
        }
        Command::Catalog => {
            render_catalog(&config.planner.catalog());
            Ok(())
        }
    }
}

fn run_plan(config: &AppConfig, args: PlanArgs) -> Result<(), AppError> {
    let PlanArgs {
        individuals,
        groups,
        output_dir,
        json,
        ..
    } = args;

    let settings = config.planner.settings();
    let volunteers = IndividualIntake::from_path(&individuals, settings.preference_slots)?;
    let groups = match groups {
        Some(path) => GroupIntake::from_path(path)?,
        None => Vec::new(),
    };

    let planner = RosterPlanner::new(config.planner.catalog(), settings);
    let plan = planner.plan(volunteers, &groups)?;
    if let Some(reason) = &plan.incomplete {
        warn!(%reason, "reporting on a partial schedule");
    }

    let report = plan.report();
    if json {
        println!("{}", serde_json::to_string_pretty(&report.summary())?);
    } else {
        render_report(&report);
    }

    if let Some(dir) = output_dir {
        for path in report.export(&dir)? {
            info!(path = %path.display(), "schedule exported");
        }
    }

    Ok(())
}

fn render_catalog(catalog: &ShiftCatalog) {
    println!("Shift catalog ({} shifts, {} seats)", catalog.len(), catalog.required_seats());
    for shift in catalog.shifts() {
        println!("- {}: {} seats", shift.name, shift.capacity);
    }
}

fn render_report(report: &ScheduleReport) {
    if let Some(reason) = &report.incomplete {
        println!("Warning: solve incomplete ({reason}); unresolved volunteers are unassigned.");
    }

    println!("Shift assignments");
    for shift in &report.shifts {
        println!("{} ({}/{})", shift.shift, shift.volunteers.len(), shift.capacity);
        for name in &shift.volunteers {
            println!("\t{name}");
        }
    }

    let stats = &report.statistics;
    println!();
    println!("Staffing requirements covered: {}.", stats.staffing_coverage);
    println!("Shifts fully covered: {}.", stats.shifts_fully_staffed);
    println!("Volunteers assigned to a shift: {}.", stats.volunteers_assigned);
    println!(
        "Preferred volunteers assigned to a shift: {}.",
        stats.preferred_volunteers_assigned
    );

    let under_staffed: Vec<&str> = report
        .under_staffed()
        .map(|shift| shift.shift.as_str())
        .collect();
    if under_staffed.is_empty() {
        println!("\nUnder-staffed shifts: none");
    } else {
        println!("\nUnder-staffed shifts: {}", under_staffed.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn plan_arguments_parse() {
        let cli = Cli::try_parse_from([
            "shift-roster",
            "plan",
            "--individuals",
            "Individual Preferences.csv",
            "--groups",
            "Group Volunteers.csv",
            "--time-limit-secs",
            "60",
            "--json",
        ])
        .expect("arguments parse");

        match cli.command {
            Command::Plan(args) => {
                assert_eq!(args.individuals, PathBuf::from("Individual Preferences.csv"));
                assert_eq!(args.time_limit_secs, Some(60));
                assert!(args.json);
                assert!(args.output_dir.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn zero_preference_slots_are_rejected() {
        let parse = |slots: &str| {
            Cli::try_parse_from([
                "shift-roster",
                "plan",
                "--individuals",
                "Individual Preferences.csv",
                "--preference-slots",
                slots,
            ])
        };

        let err = parse("0").expect_err("zero slots");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(parse("-2").is_err());

        match parse("5").expect("five slots").command {
            Command::Plan(args) => assert_eq!(args.preference_slots, Some(5)),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
