use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use services::{
    ContactService, FileStatus, ImportReport, RevisionQuery, TEMPLATE_CSV, Trainer,
};
use storage::{FileRepository, PersistStatus, SnapshotRepository};
use vocab_core::Clock;
use vocab_core::model::{ContactDraft, LevelAssignment, LevelFilter, QuizMode};

mod quiz;

const DEFAULT_DATA_DIR: &str = "./vocab-data";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidPage { raw: String },
    InvalidMode(vocab_core::Error),
    MissingFiles,
    NotConfirmed { command: &'static str },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidPage { raw } => write!(f, "invalid --page value: {raw}"),
            ArgsError::InvalidMode(err) => write!(f, "{err}"),
            ArgsError::MissingFiles => write!(f, "import needs at least one CSV file"),
            ArgsError::NotConfirmed { command } => {
                write!(f, "{command} deletes stored data; pass --yes to confirm")
            }
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  vocab-trainer [--data-dir <dir>] <command> [options]");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  quiz    [--mode flash|mcq|type] [--level <level>]");
    eprintln!("  import  <file.csv>... [--level <level>|AUTO]");
    eprintln!("  export  [--out <file>]");
    eprintln!("  template [--out <file>]");
    eprintln!("  browse  [--level <level>] [--search <text>] [--page <n>]");
    eprintln!("  stats");
    eprintln!("  clear --yes");
    eprintln!("  reset-progress --yes");
    eprintln!("  contact --name <name> --email <email> --message <text>");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --data-dir {DEFAULT_DATA_DIR}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  VOCAB_DATA_DIR, RUST_LOG");
}

#[derive(Debug)]
enum Command {
    Quiz { mode: QuizMode, level: LevelFilter },
    Import { files: Vec<PathBuf>, level: LevelAssignment },
    Export { out: Option<PathBuf> },
    Template { out: Option<PathBuf> },
    Browse(RevisionQuery),
    Stats,
    Clear,
    ResetProgress,
    Contact(ContactDraft),
}

struct Args {
    data_dir: PathBuf,
    command: Command,
}

impl Args {
    /// Returns `Ok(None)` when help was requested.
    fn parse(argv: impl IntoIterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let mut data_dir = std::env::var("VOCAB_DATA_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);

        // `--data-dir` may appear anywhere; collect the rest for the command.
        let mut rest = Vec::new();
        let mut args = argv.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--data-dir" => data_dir = PathBuf::from(require_value(&mut args, "--data-dir")?),
                "--help" | "-h" => return Ok(None),
                _ => rest.push(arg),
            }
        }

        let mut args = rest.into_iter();
        let Some(name) = args.next() else {
            return Ok(None);
        };
        let command = match name.as_str() {
            "quiz" => parse_quiz(&mut args)?,
            "import" => parse_import(&mut args)?,
            "export" => Command::Export {
                out: parse_out(&mut args)?,
            },
            "template" => Command::Template {
                out: parse_out(&mut args)?,
            },
            "browse" => parse_browse(&mut args)?,
            "stats" => no_options(&mut args, Command::Stats)?,
            "clear" => confirmed(&mut args, "clear", Command::Clear)?,
            "reset-progress" => confirmed(&mut args, "reset-progress", Command::ResetProgress)?,
            "contact" => parse_contact(&mut args)?,
            _ => return Err(ArgsError::UnknownArg(name)),
        };

        Ok(Some(Self { data_dir, command }))
    }
}

fn parse_quiz(args: &mut impl Iterator<Item = String>) -> Result<Command, ArgsError> {
    let mut mode = QuizMode::default();
    let mut level = LevelFilter::All;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--mode" => {
                mode = require_value(args, "--mode")?
                    .parse()
                    .map_err(|err| ArgsError::InvalidMode(vocab_core::Error::from(err)))?;
            }
            "--level" => level = LevelFilter::parse(&require_value(args, "--level")?),
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }
    Ok(Command::Quiz { mode, level })
}

fn parse_import(args: &mut impl Iterator<Item = String>) -> Result<Command, ArgsError> {
    let mut files = Vec::new();
    let mut level = LevelAssignment::Auto;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--level" => level = LevelAssignment::parse(&require_value(args, "--level")?),
            flag if flag.starts_with("--") => return Err(ArgsError::UnknownArg(arg)),
            _ => files.push(PathBuf::from(arg)),
        }
    }
    if files.is_empty() {
        return Err(ArgsError::MissingFiles);
    }
    Ok(Command::Import { files, level })
}

fn parse_out(args: &mut impl Iterator<Item = String>) -> Result<Option<PathBuf>, ArgsError> {
    let mut out = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" => out = Some(PathBuf::from(require_value(args, "--out")?)),
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }
    Ok(out)
}

fn parse_browse(args: &mut impl Iterator<Item = String>) -> Result<Command, ArgsError> {
    let mut query = RevisionQuery::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--level" => query.level = LevelFilter::parse(&require_value(args, "--level")?),
            "--search" => query.search = require_value(args, "--search")?,
            "--page" => {
                let value = require_value(args, "--page")?;
                query.page = value
                    .parse()
                    .map_err(|_| ArgsError::InvalidPage { raw: value.clone() })?;
            }
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }
    Ok(Command::Browse(query))
}

fn parse_contact(args: &mut impl Iterator<Item = String>) -> Result<Command, ArgsError> {
    let mut draft = ContactDraft::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--name" => draft.name = require_value(args, "--name")?,
            "--email" => draft.email = require_value(args, "--email")?,
            "--message" => draft.message = require_value(args, "--message")?,
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }
    Ok(Command::Contact(draft))
}

fn no_options(
    args: &mut impl Iterator<Item = String>,
    command: Command,
) -> Result<Command, ArgsError> {
    match args.next() {
        Some(arg) => Err(ArgsError::UnknownArg(arg)),
        None => Ok(command),
    }
}

fn confirmed(
    args: &mut impl Iterator<Item = String>,
    name: &'static str,
    command: Command,
) -> Result<Command, ArgsError> {
    let mut yes = false;
    for arg in args {
        match arg.as_str() {
            "--yes" | "-y" => yes = true,
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }
    if yes {
        Ok(command)
    } else {
        Err(ArgsError::NotConfirmed { command: name })
    }
}

fn warn_persist(status: &PersistStatus) {
    if let Some(err) = status.warning() {
        eprintln!("warning: changes are kept for this run only ({err})");
    }
}

fn print_import_report(report: &ImportReport) {
    for file in &report.files {
        match &file.status {
            FileStatus::Imported {
                level,
                accepted,
                rejected,
            } => println!("{}: {accepted} rows as {level} ({rejected} skipped)", file.file),
            FileStatus::Failed(reason) => eprintln!("{}: {reason}", file.file),
        }
    }
    println!(
        "Imported {} rows from {} file(s)",
        report.accepted,
        report.files.len()
    );
    warn_persist(&report.persist);
}

fn write_output(out: Option<&PathBuf>, text: &str) -> io::Result<()> {
    match out {
        Some(path) => std::fs::write(path, text),
        None => io::stdout().write_all(text.as_bytes()),
    }
}

fn open_repo(data_dir: &Path) -> Result<Arc<dyn SnapshotRepository>, storage::StorageError> {
    log::debug!("using data directory {}", data_dir.display());
    Ok(Arc::new(FileRepository::open(data_dir)?))
}

fn submit_contact(data_dir: &Path, draft: ContactDraft) -> Result<(), Box<dyn std::error::Error>> {
    let (mut contact, _) = ContactService::open(Clock::default(), open_repo(data_dir)?);
    let (message, persist) = contact.submit(draft)?;
    println!("Thanks {}, your message was saved.", message.name);
    warn_persist(&persist);
    Ok(())
}

fn run_trainer(data_dir: &Path, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    let mut trainer = Trainer::open(open_repo(data_dir)?);
    for warning in trainer.load_warnings() {
        eprintln!("warning: starting with empty data ({warning})");
    }

    match command {
        Command::Quiz { mode, level } => {
            trainer.set_filter(level);
            if let Err(err) = trainer.start(mode) {
                return Err(format!("{err}. Import a CSV file first.").into());
            }
            let delay = Duration::from_millis(trainer.settings().feedback_delay_ms());
            let stdin = io::stdin();
            quiz::run_quiz(&mut trainer, stdin.lock(), &mut io::stdout(), delay)?;
        }
        Command::Import { files, level } => {
            let report = trainer.import_files(&files, &level);
            print_import_report(&report);
        }
        Command::Export { out } => {
            let csv = trainer.export_csv()?;
            write_output(out.as_ref(), &csv)?;
        }
        Command::Browse(query) => {
            let page = trainer.revision(&query);
            for word in &page.rows {
                println!(
                    "{:<7} {:<5} {:<24} {:<20} {}",
                    word.level(),
                    word.article(),
                    word.headword(),
                    word.plural(),
                    word.translation()
                );
            }
            println!(
                "page {}/{} • {} matching words",
                page.page, page.total_pages, page.total
            );
        }
        Command::Stats => {
            let stats = trainer.stats();
            println!("words:          {}", stats.words);
            println!("correct:        {}", stats.total_correct);
            println!("seen:           {}", stats.total_seen);
            println!("words answered: {}", stats.words_answered);
            for (level, count) in &stats.per_level {
                println!("  {level:<8} {count}");
            }
        }
        Command::Clear => {
            let removed = trainer.words().len();
            warn_persist(&trainer.clear_words());
            println!("Removed {removed} words");
        }
        Command::ResetProgress => {
            warn_persist(&trainer.reset_progress());
            println!("Progress reset");
        }
        Command::Template { .. } | Command::Contact(_) => {}
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = match Args::parse(std::env::args().skip(1)) {
        Ok(Some(parsed)) => parsed,
        Ok(None) => {
            print_usage();
            return Ok(());
        }
        Err(err) => {
            print_usage();
            return Err(err.into());
        }
    };

    match parsed.command {
        // Templates need no stored state.
        Command::Template { out } => write_output(out.as_ref(), TEMPLATE_CSV)?,
        Command::Contact(draft) => submit_contact(&parsed.data_dir, draft)?,
        command => run_trainer(&parsed.data_dir, command)?,
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
