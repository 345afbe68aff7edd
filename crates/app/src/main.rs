use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use adventure_core::model::StudentId;
use adventure_core::weakness::{CentroidDetector, TrainingConfig};
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AppServices, Clock};
use storage::export::export_scores_csv;
use storage::repository::Storage;
use ui::{App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://adventure.sqlite3";
const DEFAULT_QUESTIONS: &str = "data/questions.csv";
const DEFAULT_MODEL: &str = "models/weakness_detector.json";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidNumber { flag: &'static str, raw: String },
    InvalidStudent { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidStudent { raw } => write!(f, "invalid --student value: {raw:?}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_number<T: std::str::FromStr>(raw: String, flag: &'static str) -> Result<T, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidNumber { flag, raw })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui     [--db <sqlite_url>] [--questions <csv>] [--model <json>]");
    eprintln!("  cargo run -p app -- train  [--model <json>] [--samples <n>] [--seed <n>]");
    eprintln!("  cargo run -p app -- export [--db <sqlite_url>] [--student <name>] [--out <csv>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --questions {DEFAULT_QUESTIONS}");
    eprintln!("  --model {DEFAULT_MODEL}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUEST_DB_URL, QUEST_QUESTIONS, QUEST_MODEL, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Train,
    Export,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "train" => Some(Self::Train),
            "export" => Some(Self::Export),
            _ => None,
        }
    }
}

/// Settings shared by every subcommand; env first, flags override.
#[derive(Debug)]
struct Args {
    db_url: String,
    questions: PathBuf,
    model: PathBuf,
    samples: Option<usize>,
    seed: Option<u64>,
    student: Option<StudentId>,
    out: Option<PathBuf>,
}

impl Args {
    fn from_env() -> Self {
        let env = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
        Self {
            db_url: env("QUEST_DB_URL").map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url),
            questions: env("QUEST_QUESTIONS").map_or_else(|| DEFAULT_QUESTIONS.into(), PathBuf::from),
            model: env("QUEST_MODEL").map_or_else(|| DEFAULT_MODEL.into(), PathBuf::from),
            samples: None,
            seed: None,
            student: None,
            out: None,
        }
    }

    fn parse(cmd: Command, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::from_env();

        while let Some(arg) = args.next() {
            match (cmd, arg.as_str()) {
                (Command::Ui | Command::Export, "--db") => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    parsed.db_url = normalize_sqlite_url(value);
                }
                (Command::Ui, "--questions") => {
                    parsed.questions = require_value(args, "--questions")?.into();
                }
                (Command::Ui | Command::Train, "--model") => {
                    parsed.model = require_value(args, "--model")?.into();
                }
                (Command::Train, "--samples") => {
                    parsed.samples = Some(parse_number(require_value(args, "--samples")?, "--samples")?);
                }
                (Command::Train, "--seed") => {
                    parsed.seed = Some(parse_number(require_value(args, "--seed")?, "--seed")?);
                }
                (Command::Export, "--student") => {
                    let value = require_value(args, "--student")?;
                    let id = StudentId::from_name(&value)
                        .map_err(|_| ArgsError::InvalidStudent { raw: value.clone() })?;
                    parsed.student = Some(id);
                }
                (Command::Export, "--out") => {
                    parsed.out = Some(require_value(args, "--out")?.into());
                }
                (_, "--help" | "-h") => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn launch_ui(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    prepare_sqlite_file(&args.db_url)?;
    let services = AppServices::new_sqlite(
        &args.db_url,
        &args.questions,
        Some(&args.model),
        Clock::system(),
    )
    .await?;
    let report = services.adventure().bank().report();
    log::info!(
        "question bank ready: {} loaded, {} invalid, {} duplicates",
        report.loaded,
        report.skipped_invalid,
        report.skipped_duplicates
    );

    let app: Arc<dyn UiApp> = Arc::new(services);
    let context = build_app_context(&app);

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("English Adventure")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

fn train(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let defaults = TrainingConfig::default();
    let config = TrainingConfig {
        samples: args.samples.unwrap_or(defaults.samples),
        seed: args.seed.unwrap_or(defaults.seed),
        ..defaults
    };
    let detector = CentroidDetector::train(config)?;
    detector.save(&args.model)?;

    let report = detector.report();
    println!(
        "trained on {} profiles, held out {}: accuracy {:.1}%",
        report.train_samples,
        report.test_samples,
        report.test_accuracy * 100.0
    );
    println!("model written to {}", args.model.display());
    Ok(())
}

async fn export(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    prepare_sqlite_file(&args.db_url)?;
    let storage = Storage::sqlite(&args.db_url).await?;
    let entries = match &args.student {
        Some(student) => storage.scores.list_scores(student, None).await?,
        None => storage.scores.list_all_scores(None).await?,
    };

    let written = match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            export_scores_csv(File::create(path)?, &entries)?
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            let written = export_scores_csv(&mut lock, &entries)?;
            lock.flush()?;
            written
        }
    };
    log::info!("exported {written} score entries");
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            io::Error::new(io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let args = Args::parse(cmd, &mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    log::debug!("{cmd:?} with {args:?}");

    match cmd {
        Command::Ui => launch_ui(args).await,
        Command::Train => train(&args),
        Command::Export => export(&args).await,
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
