mod tui;

use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use jobtrack::config::Config;
use jobtrack::db::Database;
use jobtrack::records::load_records;
use jobtrack::store::{SNAPSHOT_KEY, SnapshotStore};
use jobtrack::{FilterCategory, View, ViewController};

#[derive(Parser)]
#[command(name = "jobtrack")]
#[command(about = "Job application tracker - filter, sort and browse tracked postings")]
struct Cli {
    /// View-state database (defaults to $JOBTRACK_DB or the XDG data dir)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// JSON export of /api/jobs (defaults to $JOBTRACK_RECORDS)
    #[arg(short, long, global = true)]
    records: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the view-state database
    Init,

    /// List jobs under the saved filters and sort
    List,

    /// Toggle a filter token
    Filter {
        /// Filter category
        #[arg(value_enum)]
        category: CategoryArg,

        /// Token: a status (new, applied, ...), visa (true, false, null),
        /// or match threshold (0 for <40%, or a minimum such as 40, 70)
        token: String,
    },

    /// Sort by a column; repeating the same column flips direction
    Sort {
        /// title, company, visa, match, status, applied_date, response_date, days.
        /// Unknown columns leave the view unchanged.
        field: String,
    },

    /// Clear all filters and sorting
    Reset,

    /// Print the saved view state
    State,

    /// Browse jobs interactively
    Browse,
}

#[derive(Clone, Copy, ValueEnum)]
enum CategoryArg {
    Status,
    Visa,
    Match,
}

impl From<CategoryArg> for FilterCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Status => FilterCategory::Status,
            CategoryArg::Visa => FilterCategory::Visa,
            CategoryArg::Match => FilterCategory::Match,
        }
    }
}

fn init_logging(config: &Config, interactive: bool) {
    // Anything on stderr would scribble over the browser's alternate screen
    let fallback = if interactive {
        "off".to_string()
    } else {
        format!("{}={}", env!("CARGO_PKG_NAME"), config.log_level)
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();
    init_logging(&config, matches!(cli.command, Commands::Browse));

    let db_path = cli.db.clone().unwrap_or_else(|| config.db_path.clone());
    let db = Database::open(&db_path)?;
    let records_path = cli.records.clone().or_else(|| config.records_path.clone());

    match cli.command {
        Commands::Init => {
            db.init()?;
            println!("Database initialized at {}", db.path().display());
        }

        Commands::State => {
            db.ensure_initialized()?;
            print_saved_state(&db)?;
        }

        Commands::List => {
            let controller = open_controller(db, records_path)?;
            print_view(&controller.view());
            print_state_line(&controller);
        }

        Commands::Filter { category, token } => {
            let mut controller = open_controller(db, records_path)?;
            print_view(&controller.toggle_filter(category.into(), &token));
            print_state_line(&controller);
        }

        Commands::Sort { field } => {
            let mut controller = open_controller(db, records_path)?;
            print_view(&controller.set_sort_named(&field));
            print_state_line(&controller);
        }

        Commands::Reset => {
            let mut controller = open_controller(db, records_path)?;
            print_view(&controller.reset());
            print_state_line(&controller);
        }

        Commands::Browse => {
            let mut controller = open_controller(db, records_path)?;
            tui::run_browse(&mut controller)?;
        }
    }

    Ok(())
}

fn open_controller(
    db: Database,
    records_path: Option<PathBuf>,
) -> Result<ViewController<Database>> {
    db.ensure_initialized()?;
    let records_path = records_path
        .ok_or_else(|| anyhow!("No jobs file given. Pass --records or set JOBTRACK_RECORDS."))?;
    let jobs = load_records(&records_path)?;
    let mut controller = ViewController::new(jobs, db);
    controller.initialize();
    Ok(controller)
}

fn print_saved_state(db: &Database) -> Result<()> {
    match db.read(SNAPSHOT_KEY)? {
        Some(blob) => {
            let pretty = serde_json::from_str::<serde_json::Value>(&blob)
                .and_then(|v| serde_json::to_string_pretty(&v))
                .unwrap_or(blob);
            println!("{}", pretty);
            if let Some(updated) = db.updated_at(SNAPSHOT_KEY)? {
                println!("(saved {})", updated);
            }
        }
        None => println!("No saved view state."),
    }
    Ok(())
}

fn print_state_line<S: SnapshotStore>(controller: &ViewController<S>) {
    println!("{}", tui::describe_state(controller.state()).trim_start());
}

fn print_view(view: &View<'_>) {
    if let Some(message) = view.empty_message() {
        println!("{}", message);
    } else {
        println!(
            "{:<6} {:<10} {:<30} {:<20} {:>5} {:>6} {:<10} {:>4}",
            "ID", "STATUS", "TITLE", "COMPANY", "VISA", "MATCH", "APPLIED", "DAYS"
        );
        println!("{}", "-".repeat(100));
        for job in &view.jobs {
            let pct = job
                .resume_match_percentage
                .map(|p| format!("{}%", p))
                .unwrap_or_else(|| "-".to_string());
            let applied = job
                .applied_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "-".to_string());
            let days = job
                .days_to_response
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string());
            println!(
                "{:<6} {:<10} {:<30} {:<20} {:>5} {:>6} {:<10} {:>4}",
                job.id,
                job.status.label(),
                truncate(&job.title, 28),
                truncate(&job.company, 18),
                job.has_visa_sponsorship.label(),
                pct,
                applied,
                days
            );
        }
    }
    println!("\nJobs: {}", view.summary.label());
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Senior Platform Engineer", 10), "Senior ...");
        assert_eq!(truncate("Développeur logiciel", 8), "Dével...");
    }

    #[test]
    fn test_cli_parses_filter() {
        let args = ["jobtrack", "-r", "jobs.json", "filter", "match", "70"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.records, Some(PathBuf::from("jobs.json")));
        match cli.command {
            Commands::Filter { category, token } => {
                assert_eq!(FilterCategory::from(category), FilterCategory::Match);
                assert_eq!(token, "70");
            }
            _ => panic!("expected filter command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_category() {
        assert!(Cli::try_parse_from(["jobtrack", "filter", "salary", "100"]).is_err());
    }

    #[test]
    fn test_cli_accepts_unknown_sort_column() {
        let cli = Cli::try_parse_from(["jobtrack", "sort", "salary"]).unwrap();
        match cli.command {
            Commands::Sort { field } => assert_eq!(field, "salary"),
            _ => panic!("expected sort command"),
        }
    }
}
