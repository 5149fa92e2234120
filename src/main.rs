use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use crossterm::{
    event::{KeyCode, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
    tty::IsTty,
};
use keydrill::{
    catalog::Catalog,
    clock::{ManualClock, SystemClock},
    config::{Config, ConfigStore, FileConfigStore},
    generator::generate_lesson,
    lesson::LessonSpec,
    metrics::Score,
    results::{finalize, load_history, save_session},
    runtime::{key_identifier, CrosstermEventSource, DrillEvent, FixedTicker, Runner},
    session::{Session, Transition},
    store::{KeyValueStore, MemoryStore, SqliteStore},
};
use std::{
    error::Error,
    io::{self, stdin, Write},
    path::PathBuf,
    time::Duration,
};

const TICK_RATE_MS: u64 = 100;

/// seeded typing drills with keystroke scoring
#[derive(Parser, Debug)]
#[clap(
    version,
    about,
    long_about = "Generates typing drills from declarative lessons and scores your keystrokes for speed and accuracy."
)]
pub struct Cli {
    /// lesson catalog to use instead of the bundled pack
    #[clap(long, global = true)]
    catalog: Option<PathBuf>,

    /// database file for session hand-off and history
    #[clap(long, global = true)]
    db: Option<PathBuf>,

    /// log generator and session details
    #[clap(short, long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// list lessons grouped by level
    Lessons,
    /// print the generated text for a lesson
    Generate {
        id: String,
        /// seed for reproducible text (default: current time)
        #[clap(short, long)]
        seed: Option<u32>,
    },
    /// practice a lesson in the terminal
    Play {
        id: String,
        #[clap(short, long)]
        seed: Option<u32>,
    },
    /// feed a scripted key sequence to a lesson and print the score
    Replay {
        id: String,
        #[clap(short, long)]
        seed: Option<u32>,
        /// comma separated key identifiers, e.g. a,s,Space,Backspace
        #[clap(short, long, value_delimiter = ',')]
        keys: Vec<String>,
        /// simulated delay between keys
        #[clap(long, default_value_t = 200)]
        interval_ms: u64,
    },
    /// show recent results
    History {
        /// write the log as CSV
        #[clap(long)]
        csv: bool,
    },
}

struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let mut config = FileConfigStore::new().load();
    if let Some(path) = cli.catalog.clone() {
        config.catalog_path = Some(path);
    }
    if let Some(path) = cli.db.clone() {
        config.db_path = Some(path);
    }

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load(path)?,
        None => Catalog::embedded()?,
    };

    match cli.command {
        Command::Lessons => list_lessons(&catalog),
        Command::Generate { ref id, seed } => {
            let lesson = catalog.require(id)?;
            let target = generate_lesson(lesson, seed.or(config.seed))?;
            println!("{}", target.text);
        }
        Command::Play { ref id, seed } => {
            if !stdin().is_tty() {
                let mut cmd = Cli::command();
                cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
            }
            let store = SqliteStore::open(config.resolved_db_path())?;
            play(catalog.require(id)?, seed.or(config.seed), &config, &store)?;
        }
        Command::Replay {
            ref id,
            seed,
            ref keys,
            interval_ms,
        } => {
            let lesson = catalog.require(id)?;
            let score = replay(lesson, seed.or(config.seed), &config, keys, interval_ms)?;
            print_score(lesson, &score);
        }
        Command::History { csv } => {
            let store = SqliteStore::open(config.resolved_db_path())?;
            let history = load_history(&store)?;
            if csv {
                history.write_csv(io::stdout())?;
            } else {
                for entry in history.entries() {
                    let when = entry
                        .completed_at()
                        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_default();
                    println!(
                        "{when}  {:<20} {:>4} wpm {:>4}%",
                        entry.lesson_id,
                        entry.wpm.round(),
                        entry.accuracy
                    );
                }
            }
        }
    }

    Ok(())
}

fn list_lessons(catalog: &Catalog) {
    for (level, lessons) in catalog.levels() {
        println!("Level {level}");
        for lesson in lessons {
            let pool: String = lesson.pool.iter().collect();
            println!("  {:<20} {:<14} {} [{}]", lesson.id, lesson.kind(), lesson.title, pool);
        }
    }
}

fn play(
    lesson: &LessonSpec,
    seed: Option<u32>,
    config: &Config,
    store: &dyn KeyValueStore,
) -> Result<(), Box<dyn Error>> {
    let target = generate_lesson(lesson, seed)?;
    let mut session = Session::new(
        lesson.id.clone(),
        &target.text,
        config.session_options(lesson.allow_backspace),
        SystemClock,
    );

    println!("{}", lesson.title);
    println!("{}", target.text);

    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );
    let guard = RawModeGuard::enable()?;
    let mut stdout = io::stdout();

    let record = loop {
        let DrillEvent::Key(key) = runner.step() else {
            continue;
        };
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            break None;
        }
        let Some(id) = key_identifier(&key) else {
            continue;
        };
        match session.handle_key(&id) {
            Transition::Completed(record) => break Some(record),
            Transition::Ignored => {}
            _ => {
                let state = session.state();
                write!(
                    stdout,
                    "\r{}/{}  errors: {}   ",
                    state.current_index,
                    session.target_len(),
                    state.errors.len()
                )?;
                stdout.flush()?;
            }
        }
    };
    drop(guard);
    println!();

    let Some(record) = record else {
        println!("abandoned");
        return Ok(());
    };
    save_session(store, &lesson.id, &record)?;
    let score = finalize(store, &lesson.id, clock_now_ms())?;
    print_score(lesson, &score);
    Ok(())
}

fn replay(
    lesson: &LessonSpec,
    seed: Option<u32>,
    config: &Config,
    keys: &[String],
    interval_ms: u64,
) -> Result<Score, Box<dyn Error>> {
    let target = generate_lesson(lesson, seed)?;
    let clock = ManualClock::new(0);
    let mut session = Session::new(
        lesson.id.clone(),
        &target.text,
        config.session_options(lesson.allow_backspace),
        &clock,
    );

    let store = MemoryStore::new();
    for key in keys {
        if let Transition::Completed(record) = session.handle_key(key) {
            save_session(&store, &lesson.id, &record)?;
            break;
        }
        clock.advance(interval_ms);
    }

    if !session.is_complete() {
        println!(
            "incomplete: {}/{} characters",
            session.state().current_index,
            session.target_len()
        );
    }
    Ok(finalize(&store, &lesson.id, clock_now_ms())?)
}

fn clock_now_ms() -> i64 {
    chrono::Local::now().timestamp_millis()
}

fn print_score(lesson: &LessonSpec, score: &Score) {
    println!(
        "{} wpm, {}% accuracy: {}{}",
        score.rounded_wpm(),
        score.accuracy,
        score.rating(),
        if score.meets_goal(&lesson.goal) {
            " (goal reached)"
        } else {
            ""
        }
    );
}
