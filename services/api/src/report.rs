use clap::Args;
use seatcheck::assignments::{
    AssignmentImporter, CheckStatus, RosterImporter, ValidationEngine, ValidationResult,
};
use seatcheck::config::AppConfig;
use seatcheck::error::AppError;
use std::fmt;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ValidateArgs {
    /// Seating plan JSON produced by the solver
    #[arg(long)]
    pub(crate) plan: PathBuf,
    /// Roster CSV; replaces any roster embedded in the plan
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
    /// Print the raw result as JSON instead of the text report
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_validate(args: ValidateArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let mut plan = AssignmentImporter::from_path(&args.plan)?;
    if let Some(path) = &args.roster {
        plan.roster = Some(RosterImporter::from_path(path)?);
    }

    let result = ValidationEngine::new(config.validation).validate_plan(&plan);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", TextReport(&result));
    }

    Ok(())
}

/// Plain-text rendering of a result for terminal output.
pub(crate) struct TextReport<'a>(pub(crate) &'a ValidationResult);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;

        let verdict = if result.all_constraints_satisfied {
            "all hard constraints satisfied"
        } else {
            "hard constraint violations found"
        };
        writeln!(f, "Seating plan check: {verdict}")?;
        writeln!(
            f,
            "{} participants across {} tables",
            result.total_participants, result.num_tables
        )?;

        writeln!(f, "\nChecks")?;
        for check in result.checks() {
            if check.status == CheckStatus::NotApplicable || check.offending_tables.is_empty() {
                writeln!(f, "- {}: {}", check.name, check.status_label)?;
            } else {
                writeln!(
                    f,
                    "- {}: {} ({})",
                    check.name,
                    check.status_label,
                    check.offending_tables.join(", ")
                )?;
            }
        }

        writeln!(f, "\nMixing")?;
        writeln!(f, "- Repeat pairings: {}", result.repeat_pairings)?;
        writeln!(f, "- Average new people met: {:.1}", result.avg_new_people_met)?;
        for pair in &result.repeated_pairs {
            writeln!(
                f,
                "  {} & {} shared a table in {} sessions",
                pair.first, pair.second, pair.sessions
            )?;
        }

        if !result.sessions.is_empty() {
            writeln!(f, "\nSessions")?;
            for summary in &result.sessions {
                writeln!(
                    f,
                    "- Session {}: {} tables, {} seated, {} empty seats, {} absent",
                    summary.session,
                    summary.tables,
                    summary.seated,
                    summary.empty_seats,
                    summary.absent
                )?;
            }
        }

        Ok(())
    }
}
