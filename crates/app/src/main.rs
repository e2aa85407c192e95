use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use services::{Clock, Feedback, RoundSelector, SessionController};
use storage::{InMemoryStore, JsonFileStore, KeyValueStore, ProgressStore};
use vocab_core::model::{Catalog, Tier};
use vocab_core::scheduler::{IntervalPolicy, Scheduler};
use vocab_core::unlock;

mod catalog;
mod words;

//
// ─── ARGUMENTS ─────────────────────────────────────────────────────────────────
//

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSeed { raw: String },
    InvalidPolicy { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidPolicy { raw } => {
                write!(f, "invalid --policy value: {raw} (expected exponential or stepped)")
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

#[derive(Debug)]
struct CliArgs {
    data: PathBuf,
    ephemeral: bool,
    words: Option<PathBuf>,
    seed: Option<u64>,
    policy: IntervalPolicy,
    stats_only: bool,
    reset: bool,
    help: bool,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            data: PathBuf::from("vocab-progress.json"),
            ephemeral: false,
            words: None,
            seed: None,
            policy: IntervalPolicy::Exponential,
            stats_only: false,
            reset: false,
            help: false,
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs, ArgsError> {
    let mut parsed = CliArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--data" => parsed.data = PathBuf::from(require_value(&mut args, "--data")?),
            "--ephemeral" => parsed.ephemeral = true,
            "--words" => parsed.words = Some(PathBuf::from(require_value(&mut args, "--words")?)),
            "--seed" => {
                let raw = require_value(&mut args, "--seed")?;
                parsed.seed = Some(raw.parse().map_err(|_| ArgsError::InvalidSeed { raw })?);
            }
            "--policy" => {
                let raw = require_value(&mut args, "--policy")?;
                parsed.policy = match raw.as_str() {
                    "exponential" => IntervalPolicy::Exponential,
                    "stepped" => IntervalPolicy::Stepped,
                    _ => return Err(ArgsError::InvalidPolicy { raw }),
                };
            }
            "--stats" => parsed.stats_only = true,
            "--reset" => parsed.reset = true,
            "-h" | "--help" => parsed.help = true,
            other => return Err(ArgsError::UnknownArg(other.to_string())),
        }
    }

    Ok(parsed)
}

fn print_usage() {
    println!("vocab-trainer — match vocabulary pairs with spaced repetition");
    println!();
    println!("Usage: vocab-trainer [options]");
    println!("  --data <path>      progress file (default: vocab-progress.json)");
    println!("  --ephemeral        keep progress in memory only");
    println!("  --words <path>     catalog file (JSON array of id/source/target/tier)");
    println!("  --seed <n>         fixed random seed for reproducible rounds");
    println!("  --policy <name>    review interval policy: exponential (default) or stepped");
    println!("  --stats            print statistics and exit");
    println!("  --reset            wipe all progress and exit");
    println!("  -h, --help         show this help");
}

//
// ─── INPUT PARSING ─────────────────────────────────────────────────────────────
//

/// Parses a pick like `2 b`, `2b`, or `2,b` into zero-based
/// (source, target) indices. Rejects anything out of range for the round.
fn parse_pick(input: &str, len: usize) -> Option<(usize, usize)> {
    let mut digits = String::new();
    let mut letter = None;

    for ch in input.chars() {
        if ch.is_ascii_digit() {
            digits.push(ch);
        } else if ch.is_ascii_alphabetic() {
            if letter.is_some() {
                return None;
            }
            letter = Some(ch.to_ascii_lowercase());
        } else if !ch.is_whitespace() && ch != ',' {
            return None;
        }
    }

    let number: usize = digits.parse().ok()?;
    let source = number.checked_sub(1)?;
    let target = (letter? as usize).checked_sub('a' as usize)?;

    if source >= len || target >= len {
        return None;
    }
    Some((source, target))
}

//
// ─── RENDERING ─────────────────────────────────────────────────────────────────
//

fn render_round(ctrl: &SessionController) {
    let round = ctrl.round();
    let progress = ctrl.round_progress();

    println!();
    println!("Matched {}/{}", progress.matched, progress.total);
    for (i, (source, target)) in round
        .source_items()
        .iter()
        .zip(round.target_items())
        .enumerate()
    {
        #[allow(clippy::cast_possible_truncation)]
        let letter = (b'a' + i as u8) as char;

        let source_cell = if round.is_matched(source.id()) {
            format!("   ✓ {}", source.source_text())
        } else {
            format!("  {}. {}", i + 1, source.source_text())
        };
        let target_cell = if round.is_matched(target.id()) {
            format!("✓ {}", target.target_text())
        } else {
            format!("{letter}. {}", target.target_text())
        };
        println!("{source_cell:<26}{target_cell}");
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn mastery_bar(pct: f64) -> String {
    let filled = ((pct / 100.0) * 10.0).round() as usize;
    let filled = filled.min(10);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(10 - filled))
}

fn print_summary(ctrl: &SessionController) {
    let summary = ctrl.summary();
    println!();
    println!(
        "Plays: {}   Answered: {}   Accuracy: {}%   Words learned: {}",
        summary.total_plays, summary.total_answered, summary.accuracy, summary.words_learned
    );

    let available = ctrl.available_tiers();
    for tier in Tier::all() {
        let pct = ctrl.mastery(tier);
        let state = if available.contains(&tier) {
            "open"
        } else {
            "locked"
        };
        println!("  {:<7} {} {:>5.1}%  {state}", tier.label(), mastery_bar(pct), pct);
    }

    if !available.contains(&Tier::Medium) {
        println!(
            "  medium unlocks at {:.0}% easy mastery",
            unlock::MEDIUM_UNLOCK_EASY_MASTERY
        );
    } else if !available.contains(&Tier::Hard) {
        println!(
            "  hard unlocks at {:.0}% medium and {:.0}% easy mastery",
            unlock::HARD_UNLOCK_MEDIUM_MASTERY, unlock::HARD_UNLOCK_EASY_MASTERY
        );
    }
}

//
// ─── GAME LOOP ─────────────────────────────────────────────────────────────────
//

fn play(mut ctrl: SessionController) -> io::Result<()> {
    println!("Match each word to its translation.");
    println!("Enter pairs like `1 c`; `s` stats, `n` next round, `r` reset, `q` quit.");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        if ctrl.round().is_empty() {
            println!("The catalog has no words to practice.");
            return Ok(());
        }

        if ctrl.is_round_complete() {
            println!();
            println!("Round complete! All {} matches found.", ctrl.round().len());
            print_summary(&ctrl);
            println!("Enter `n` for the next round.");
        } else {
            render_round(&ctrl);
        }

        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let input = line?.trim().to_string();

        match input.as_str() {
            "q" | "quit" => return Ok(()),
            "s" | "stats" => print_summary(&ctrl),
            "n" | "next" => ctrl.advance_round(),
            "r" | "reset" => {
                print!("Really wipe all progress? This cannot be undone. [y/N] ");
                io::stdout().flush()?;
                let Some(answer) = lines.next() else {
                    return Ok(());
                };
                if answer?.trim().eq_ignore_ascii_case("y") {
                    ctrl.reset_progress();
                    println!("Progress cleared.");
                }
            }
            "" => {}
            _ => match parse_pick(&input, ctrl.round().len()) {
                Some((source_idx, target_idx)) => {
                    let source_id = ctrl.round().source_items()[source_idx].id().clone();
                    let target_id = ctrl.round().target_items()[target_idx].id().clone();

                    ctrl.pick_source(&source_id);
                    ctrl.pick_target(&target_id);

                    match ctrl.feedback() {
                        Some(Feedback::Correct) => println!("✓ Correct!"),
                        Some(Feedback::Incorrect) => println!("✗ Try again"),
                        None => println!("That pair cannot be picked right now."),
                    }
                    ctrl.clear_feedback();
                }
                None => println!("Enter a number/letter pair like `2 d`, or `q` to quit."),
            },
        }
    }
}

//
// ─── ENTRY POINT ───────────────────────────────────────────────────────────────
//

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_args(std::env::args().skip(1))?;
    if args.help {
        print_usage();
        return Ok(());
    }

    let catalog = Arc::new(match &args.words {
        Some(path) => catalog::load(path)?,
        None => Catalog::new(words::builtin())?,
    });

    let backend: Arc<dyn KeyValueStore> = if args.ephemeral {
        Arc::new(InMemoryStore::new())
    } else {
        Arc::new(JsonFileStore::open(&args.data)?)
    };
    let progress = ProgressStore::new(backend);

    if args.reset {
        progress.reset();
        println!("Progress cleared.");
        return Ok(());
    }

    let selector = match args.seed {
        Some(seed) => RoundSelector::with_seed(Arc::clone(&catalog), seed),
        None => RoundSelector::new(Arc::clone(&catalog)),
    };
    let ctrl = SessionController::new(
        Clock::default(),
        selector,
        Scheduler::with_policy(args.policy),
        progress,
    );

    if args.stats_only {
        print_summary(&ctrl);
        return Ok(());
    }

    play(ctrl)?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
