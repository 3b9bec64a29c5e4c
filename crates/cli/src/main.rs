// rankboard CLI - headless leaderboard queries, exports and refresh loop

mod exit_codes;
mod table;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use rankboard_engine::participant::{find_by_email, ParticipantDetail};
use rankboard_engine::view::{CompletionFilter, RedemptionFilter, SortOrder};
use rankboard_engine::{view, FilterCriteria, LeaderboardConfig, LeaderboardError, Snapshot, SnapshotStore, ViewRecord};
use rankboard_io::csv::decode_utf8_lossless;
use rankboard_io::xlsx::export_to_dir;
use rankboard_io::{DataSource, FileSource, HttpSource, Ingestor, StaticSource};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

use exit_codes::{
    leaderboard_exit_code, EXIT_CONFIG, EXIT_ERROR, EXIT_NOT_FOUND, EXIT_SOURCE_UNAVAILABLE,
    EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "rankboard")]
#[command(about = "Ranked, filterable leaderboard over a participant CSV (headless)")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    source: SourceArgs,

    /// Config file (TOML). Defaults to <config dir>/rankboard/config.toml when present
    #[arg(long, global = true, env = "RANKBOARD_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Local CSV file ("-" reads stdin)
    #[arg(long, global = true, env = "RANKBOARD_CSV", value_name = "PATH")]
    csv: Option<PathBuf>,

    /// Remote CSV object URL (HTTP GET)
    #[arg(long, global = true, env = "RANKBOARD_URL", value_name = "URL")]
    url: Option<String>,
}

#[derive(Args, Debug, Clone)]
struct FilterArgs {
    /// Case-insensitive substring match over the search fields
    #[arg(long, short = 's')]
    search: Option<String>,

    /// Access code redemption: all, done, not-done
    #[arg(long, default_value = "all", value_name = "FILTER")]
    redemption: RedemptionFilter,

    /// All badges and games completed: all, yes, no
    #[arg(long, default_value = "all", value_name = "FILTER")]
    completed: CompletionFilter,

    /// Re-order by skill badge count: none, asc, desc
    #[arg(long, default_value = "none", value_name = "ORDER")]
    badge_sort: SortOrder,

    /// Re-order by arcade game count: none, asc, desc
    #[arg(long, default_value = "none", value_name = "ORDER")]
    game_sort: SortOrder,
}

impl FilterArgs {
    fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            search_term: self.search.clone().unwrap_or_default(),
            redemption_status: self.redemption,
            all_completed: self.completed,
            skill_badge_sort: self.badge_sort,
            arcade_game_sort: self.game_sort,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the ranked leaderboard, optionally filtered and re-sorted
    #[command(after_help = "\
Examples:
  rankboard --csv participants.csv show
  rankboard --csv participants.csv show --search ada --redemption done
  rankboard --url https://storage.example.com/bucket/lb.csv show --json")]
    Show {
        #[command(flatten)]
        filters: FilterArgs,

        /// Emit the view as JSON
        #[arg(long)]
        json: bool,

        /// Print at most N rows
        #[arg(long, value_name = "N")]
        limit: Option<usize>,
    },

    /// Write the (filtered) view to a styled .xlsx workbook
    #[command(after_help = "\
The file is named <prefix>_<YYYY-MM-DD>.xlsx, with a _filtered suffix when
any filter or sort is active. An empty view writes no file.")]
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        /// Output directory
        #[arg(long, short = 'o', default_value = ".")]
        out: PathBuf,
    },

    /// Show one participant's detail by exact email
    Participant {
        #[arg(long)]
        email: String,

        #[arg(long)]
        json: bool,
    },

    /// Participant, redemption and eligibility counts
    Summary {
        #[arg(long)]
        json: bool,
    },

    /// Re-ingest periodically; failed cycles keep the last good snapshot
    Watch {
        /// Seconds between cycles
        #[arg(long, default_value = "300", value_name = "SECS")]
        interval: u64,

        /// Stop after N cycles (default: run until interrupted)
        #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
        cycles: Option<u64>,
    },
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self { code: EXIT_NOT_FOUND, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<LeaderboardError> for CliError {
    fn from(err: LeaderboardError) -> Self {
        let code = leaderboard_exit_code(&err);
        let hint = match &err {
            LeaderboardError::SourceUnavailable { .. } => {
                Some("check the --csv path or --url and retry".to_string())
            }
            LeaderboardError::MalformedInput(_) => {
                Some("every row must have the same columns as the header row".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }
}

// ============================================================================
// main
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    match run(cli) {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

/// Logs go to stderr so stdout stays clean for --json consumers.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;
    let source = open_source(&cli.source)?;
    let ingestor = Ingestor::new(source, config);

    match cli.command {
        Commands::Show { filters, json, limit } => cmd_show(&ingestor, &filters.criteria(), json, limit),
        Commands::Export { filters, out } => cmd_export(&ingestor, &filters.criteria(), &out),
        Commands::Participant { email, json } => cmd_participant(&ingestor, &email, json),
        Commands::Summary { json } => cmd_summary(&ingestor, json),
        Commands::Watch { interval, cycles } => cmd_watch(&ingestor, interval, cycles),
    }
}

// ============================================================================
// Setup
// ============================================================================

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("rankboard").join("config.toml"))
}

fn load_config(explicit: Option<&Path>) -> Result<LeaderboardConfig, CliError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.is_file() => path,
            _ => return Ok(LeaderboardConfig::default()),
        },
    };

    let text = std::fs::read_to_string(&path)
        .map_err(|e| CliError::config(format!("cannot read config {}: {}", path.display(), e)))?;
    let config = LeaderboardConfig::from_toml(&text)
        .map_err(|e| CliError::from(e).with_hint(format!("fix {}", path.display())))?;
    log::debug!("loaded config from {}", path.display());
    Ok(config)
}

fn open_source(args: &SourceArgs) -> Result<Box<dyn DataSource>, CliError> {
    match (&args.csv, &args.url) {
        (Some(_), Some(_)) => Err(CliError::args("--csv and --url are mutually exclusive")),
        (Some(path), None) if path.as_os_str() == "-" => {
            let mut bytes = Vec::new();
            std::io::stdin().read_to_end(&mut bytes).map_err(|e| CliError {
                code: EXIT_SOURCE_UNAVAILABLE,
                message: format!("cannot read stdin: {}", e),
                hint: None,
            })?;
            Ok(Box::new(StaticSource::new("stdin", decode_utf8_lossless(bytes))))
        }
        (Some(path), None) => Ok(Box::new(FileSource::new(path))),
        (None, Some(url)) => Ok(Box::new(HttpSource::new(url.as_str())?)),
        (None, None) => Err(CliError::args("no data source given")
            .with_hint("pass --csv PATH or --url URL (or set RANKBOARD_CSV / RANKBOARD_URL)")),
    }
}

fn ingest_once(ingestor: &Ingestor) -> Result<Arc<Snapshot>, CliError> {
    let store = SnapshotStore::new();
    Ok(ingestor.refresh(&store)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::general(format!("JSON serialization failed: {}", e)))?;
    println!("{}", text);
    Ok(())
}

// ============================================================================
// show
// ============================================================================

/// JSON shape of `show --json`: the query response over the filtered view.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ViewResponse<'a> {
    data: &'a [ViewRecord<'a>],
    headers: &'a [String],
    total_records: usize,
    matched_records: usize,
    is_filtered_view: bool,
    last_updated: String,
    source: &'a str,
    version: u64,
}

fn cmd_show(
    ingestor: &Ingestor,
    criteria: &FilterCriteria,
    json: bool,
    limit: Option<usize>,
) -> Result<(), CliError> {
    let snapshot = ingest_once(ingestor)?;
    let config = ingestor.config();
    let records = view(snapshot.records(), criteria, config);

    if json {
        let shown = limit.map_or(records.len(), |n| n.min(records.len()));
        let response = snapshot.response();
        return print_json(&ViewResponse {
            data: &records[..shown],
            headers: response.headers,
            total_records: response.total_records,
            matched_records: records.len(),
            is_filtered_view: criteria.is_active(),
            last_updated: response.last_updated,
            source: response.source,
            version: response.version,
        });
    }

    print!("{}", table::render_view(&records, snapshot.len(), limit, config));
    Ok(())
}

// ============================================================================
// export
// ============================================================================

fn cmd_export(ingestor: &Ingestor, criteria: &FilterCriteria, out: &Path) -> Result<(), CliError> {
    let snapshot = ingest_once(ingestor)?;
    let config = ingestor.config();
    let records = view(snapshot.records(), criteria, config);
    let today = chrono::Local::now().date_naive();

    match export_to_dir(&records, config, out, today)? {
        Some((path, _)) => println!("{}", path.display()),
        None => println!("Nothing to export: no participants match the current criteria."),
    }
    Ok(())
}

// ============================================================================
// participant
// ============================================================================

fn cmd_participant(ingestor: &Ingestor, email: &str, json: bool) -> Result<(), CliError> {
    let snapshot = ingest_once(ingestor)?;
    let config = ingestor.config();

    let record = find_by_email(snapshot.records(), email.trim(), config)
        .ok_or_else(|| CliError::not_found(format!("no participant with email '{}'", email)))?;
    let detail = ParticipantDetail::from_record(record, config);

    if json {
        return print_json(&detail);
    }
    print!("{}", table::render_participant(&detail));
    Ok(())
}

// ============================================================================
// summary
// ============================================================================

fn cmd_summary(ingestor: &Ingestor, json: bool) -> Result<(), CliError> {
    let snapshot = ingest_once(ingestor)?;
    let summary = snapshot.summary(ingestor.config());

    if json {
        return print_json(&summary);
    }
    print!("{}", table::render_summary(&summary));
    Ok(())
}

// ============================================================================
// watch
// ============================================================================

fn cmd_watch(ingestor: &Ingestor, interval: u64, cycles: Option<u64>) -> Result<(), CliError> {
    let store = SnapshotStore::new();
    let mut last_error = None;
    let mut cycle = 0u64;

    loop {
        cycle += 1;
        match ingestor.refresh(&store) {
            Ok(snapshot) => {
                println!("cycle {}: v{} published ({} participants)", cycle, snapshot.version(), snapshot.len());
                last_error = None;
            }
            Err(e) if !e.is_ingestion_failure() => return Err(e.into()),
            Err(e) => {
                match store.current() {
                    Some(prior) => println!("cycle {}: failed, serving v{}", cycle, prior.version()),
                    None => println!("cycle {}: failed, no snapshot yet", cycle),
                }
                last_error = Some(e);
            }
        }

        if cycles.is_some_and(|n| cycle >= n) {
            break;
        }
        std::thread::sleep(Duration::from_secs(interval));
    }

    // Only a run that never produced a snapshot is a failure
    match (store.current(), last_error) {
        (None, Some(e)) => Err(e.into()),
        _ => Ok(()),
    }
}
