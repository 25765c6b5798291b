use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use recall_core::model::{Card, CardId, CardRating, Deck, SessionSettings};
use services::{Clock, SessionManager, SessionWorkflow, load_deck_file};
use storage::SessionStore;

mod input;
mod render;

use input::{Action, HELP, rating_gate};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid database url: {raw:?}"),
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
    eprintln!("  cargo run -p app -- study   [--deck <path>] [--db <sqlite_url>] [--no-shuffle]");
    eprintln!("  cargo run -p app -- history [--db <sqlite_url>]");
    eprintln!("  cargo run -p app -- clear   [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --deck  built-in sample deck");
    eprintln!("  --db    {DEFAULT_DB_URL}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  RECALL_DECK, RECALL_DB_URL, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Study,
    History,
    Clear,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "study" => Some(Self::Study),
            "history" => Some(Self::History),
            "clear" => Some(Self::Clear),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    deck_path: Option<String>,
    no_shuffle: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let env_db = std::env::var("RECALL_DB_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());
        let mut db_url = resolve_db_url(env_db.as_deref().unwrap_or(DEFAULT_DB_URL))?;
        let mut deck_path = std::env::var("RECALL_DECK").ok().filter(|p| !p.trim().is_empty());
        let mut no_shuffle = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    db_url = resolve_db_url(&require_value(args, "--db")?)?;
                }
                "--deck" => deck_path = Some(require_value(args, "--deck")?),
                "--no-shuffle" => no_shuffle = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            deck_path,
            no_shuffle,
        })
    }
}

const DEFAULT_DB_URL: &str = "sqlite:recall.sqlite3";
const MEMORY_DB_URL: &str = "sqlite::memory:";

/// Turn `--db` input into an absolute `sqlite://` URL. A bare path is accepted.
fn resolve_db_url(raw: &str) -> Result<String, ArgsError> {
    let raw = raw.trim();
    if raw == MEMORY_DB_URL {
        return Ok(raw.to_owned());
    }

    let path = raw
        .strip_prefix("sqlite://")
        .or_else(|| raw.strip_prefix("sqlite:"))
        .unwrap_or(raw);
    if path.is_empty() || path.starts_with('?') {
        return Err(ArgsError::InvalidDbUrl { raw: raw.to_owned() });
    }

    let path = Path::new(path);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    Ok(format!("sqlite://{}", absolute.display()))
}

/// File behind a resolved URL, without query parameters. `None` for memory.
fn db_file_path(db_url: &str) -> Option<&Path> {
    let rest = db_url.strip_prefix("sqlite://")?;
    let path = rest.split('?').next().unwrap_or(rest);
    (!path.is_empty()).then(|| Path::new(path))
}

/// `sqlx` will not create a missing `SQLite` file, so create it and its folder.
fn ensure_db_file(db_url: &str) -> io::Result<()> {
    let Some(path) = db_file_path(db_url) else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
    }
    Ok(())
}

fn sample_deck() -> Result<Deck, Box<dyn std::error::Error>> {
    let cards = [
        ("hola", "hello", Some("greetings")),
        ("adiós", "goodbye", Some("greetings")),
        ("gracias", "thank you", None),
        ("por favor", "please", None),
        ("agua", "water", Some("nouns")),
    ]
    .into_iter()
    .zip(1..)
    .map(|((front, back, tag), id)| Card::new(CardId::new(id), front, back, tag.map(String::from)))
    .collect();

    Ok(Deck::new(
        "Spanish basics",
        cards,
        SessionSettings {
            shuffle: true,
            show_timer: true,
        },
    )?)
}

fn load_deck(args: &Args) -> Result<Deck, Box<dyn std::error::Error>> {
    let deck = match &args.deck_path {
        Some(path) => load_deck_file(path)?,
        None => sample_deck()?,
    };
    if !args.no_shuffle {
        return Ok(deck);
    }

    let settings = SessionSettings {
        shuffle: false,
        ..deck.settings()
    };
    Ok(Deck::new(deck.title(), deck.cards().to_vec(), settings)?)
}

async fn study(workflow: &SessionWorkflow, deck: Deck) -> Result<(), Box<dyn std::error::Error>> {
    let last = workflow.last_session(deck.title()).await?;
    print!("{}", render::intro_view(&deck, last.as_ref()));

    let clock = workflow.clock();
    let mut session = workflow.start(deck)?;
    println!("{HELP}");
    print!("{}", render::card_view(&session, clock.now()));

    let stdin = io::stdin();
    let mut finish_requested = false;
    for line in stdin.lock().lines() {
        let line = line?;
        let Some(action) = Action::parse(&line) else {
            println!("{HELP}");
            continue;
        };

        if action != Action::Finish {
            finish_requested = false;
        }

        match action {
            Action::Next => session.go_to_next(clock.now()),
            Action::Previous => session.go_to_previous(clock.now()),
            Action::Reveal => session.reveal_answer(clock.now()),
            Action::Known => rate(&mut session, CardRating::Known, &clock)?,
            Action::Unknown => rate(&mut session, CardRating::Unknown, &clock)?,
            Action::Help => println!("{HELP}"),
            Action::Quit => {
                info!("session abandoned, nothing saved");
                return Ok(());
            }
            Action::Finish => {
                if !session.all_cards_rated() && !finish_requested {
                    let unrated = session.total_cards() - session.rated_count();
                    println!("{unrated} card(s) unrated; type f again to finish anyway");
                    finish_requested = true;
                    continue;
                }
                let result = workflow.finish(&session).await?;
                print!("{}", render::summary_view(&result, &session.difficult_cards()));
                return Ok(());
            }
        }

        print!("{}", render::card_view(&session, clock.now()));
        io::stdout().flush()?;
    }

    warn!("input closed before finishing; session not saved");
    Ok(())
}

fn rate(
    session: &mut SessionManager,
    rating: CardRating,
    clock: &Clock,
) -> Result<(), Box<dyn std::error::Error>> {
    let gate = rating_gate(session.is_answer_revealed(), session.current_card_rating());
    if let Err(blocked) = gate {
        println!("{}", blocked.hint());
        return Ok(());
    }
    session.rate_card(rating, clock.now())?;
    if session.all_cards_rated() {
        println!("all cards rated, type f to finish");
    } else if session.can_go_next() {
        session.go_to_next(clock.now());
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand means study.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Study,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Study,
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
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    ensure_db_file(&parsed.db_url)?;
    let store = SessionStore::sqlite(&parsed.db_url).await?;
    let workflow = SessionWorkflow::new(Clock::system(), store);

    match cmd {
        Command::Study => {
            let deck = load_deck(&parsed)?;
            study(&workflow, deck).await
        }
        Command::History => {
            let history = workflow.history().await?;
            print!("{}", render::history_view(&history));
            Ok(())
        }
        Command::Clear => {
            let removed = workflow.store().clear_all().await?;
            println!("removed {removed} stored record(s)");
            Ok(())
        }
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
