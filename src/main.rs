use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use zcalc::calculator::{CalcError, EvaluatorKind, copy_result, looks_like_keys};
use zcalc::config::Config;
use zcalc::history::{HistoryBackend, JsonFileBackend, MemoryBackend};
use zcalc::session::CalculatorSession;
use zcalc::ui::{CalculatorView, HistoryAction};

#[derive(Parser, Debug)]
#[command(name = "zcalc", version, about = "A calculator driven by button presses")]
struct Cli {
    /// Keys to press, e.g. "2+3=". Prints the display and exits.
    #[arg(short, long)]
    keys: Option<String>,

    /// Config file (default: the user config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// History file, overriding the config.
    #[arg(long)]
    history_file: Option<PathBuf>,

    /// Keep history in memory only.
    #[arg(long)]
    no_history: bool,

    /// Evaluator backend, overriding the config.
    #[arg(long, value_enum)]
    evaluator: Option<EvaluatorKind>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the stored history.
    History,
    /// Delete the stored history.
    ClearHistory,
}

const HELP: &str = "\
keys:      0-9 . + - * x / ( ) % =   < delete   c clear
commands:  :h toggle history   :n / :p select next / previous
           :e [N] reuse expression   :r [N] reuse result   :d [N] delete entry
           :clear clear history   :y copy result   :q quit   :? help";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            warn!(error = %e, "ignoring unreadable config");
            Config::default()
        }),
    };
    if let Some(path) = &cli.history_file {
        config.history_file = path.clone();
    }
    if let Some(evaluator) = cli.evaluator {
        config.evaluator = evaluator;
    }

    let backend: Box<dyn HistoryBackend> = if cli.no_history {
        Box::new(MemoryBackend::new())
    } else {
        Box::new(JsonFileBackend::new(&config.history_file))
    };
    let mut session = CalculatorSession::from_config(&config, backend);
    let mut view = CalculatorView::new(config.ellipsis_width);

    match cli.command {
        Some(Command::History) => {
            view.history_panel.toggle();
            for row in view.history_panel.render(&session) {
                println!("{row}");
            }
            return Ok(());
        }
        Some(Command::ClearHistory) => {
            session.clear_history();
            return Ok(());
        }
        None => {}
    }

    if let Some(keys) = &cli.keys {
        press_keys(&mut session, keys);
        println!("{}", view.render(&session));
        return Ok(());
    }

    run_interactive(&mut session, &mut view)
}

fn press_keys(session: &mut CalculatorSession, keys: &str) {
    match session.apply_keys(keys) {
        Err(CalcError::UnknownKey(c)) => eprintln!("unknown key {c:?}, type :? for help"),
        // Other failures are already on display as the error sentinel.
        Err(_) | Ok(()) => {}
    }
}

fn run_interactive(session: &mut CalculatorSession, view: &mut CalculatorView) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("{}", view.render(session));
    loop {
        print!("key> ");
        stdout.flush().context("flushing stdout")?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        if let Some(command) = line.strip_prefix(':') {
            if !run_command(command, session, view) {
                break;
            }
        } else if looks_like_keys(line) {
            press_keys(session, line);
        } else if !line.is_empty() {
            eprintln!("not a key sequence, type :? for help");
            continue;
        }

        println!("{}", view.render(session));
    }

    Ok(())
}

/// Run a `:` command. Returns `false` when the session should end.
fn run_command(command: &str, session: &mut CalculatorSession, view: &mut CalculatorView) -> bool {
    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    if let Some(index) = parts.next().and_then(|arg| arg.parse::<usize>().ok()) {
        view.history_panel.set_selected(index, session);
    }

    let action = match name {
        "q" | "quit" => return false,
        "?" | "help" => {
            println!("{HELP}");
            None
        }
        "h" | "history" => {
            view.history_panel.toggle();
            None
        }
        "n" => {
            view.history_panel.select_next(session);
            None
        }
        "p" => {
            view.history_panel.select_prev(session);
            None
        }
        "e" => Some(HistoryAction::ReuseExpression),
        "r" => Some(HistoryAction::ReuseResult),
        "d" => Some(HistoryAction::Delete),
        "clear" => {
            session.clear_history();
            None
        }
        "y" | "copy" => {
            match copy_result(session.result(), session.formatter()) {
                Ok(text) => println!("copied {text}"),
                Err(e) => eprintln!("{e}"),
            }
            None
        }
        other => {
            eprintln!("unknown command :{other}, type :? for help");
            None
        }
    };

    if let Some(action) = action
        && let Err(e) = view.history_panel.confirm(action, session)
    {
        eprintln!("{e}");
    }
    true
}
