use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use mineclear_core::*;
use tracing_subscriber::filter::LevelFilter;

use command::{Command, HELP};

mod command;
mod render;

const TICK: Duration = Duration::from_secs(1);

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper in the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Board preset: easy, medium, hard, dense or endless
    #[arg(short, long, default_value = "easy")]
    difficulty: Difficulty,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print the results of a finished game as JSON
    #[arg(long)]
    json: bool,
}

fn init_logging(verbose: &clap_verbosity_flag::Verbosity) {
    let level = match verbose.log_level_filter() {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

/// Turns wall-clock time into one-second ticks for the session.
struct TickSource {
    last: Instant,
}

impl TickSource {
    fn new() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    fn restart(&mut self) {
        self.last = Instant::now();
    }

    fn pump(&mut self, session: &mut GameSession) {
        if !session.is_timer_running() {
            self.restart();
            return;
        }
        while self.last.elapsed() >= TICK {
            self.last += TICK;
            session.tick();
        }
    }
}

struct Frontend {
    session: GameSession,
    ticks: TickSource,
    json: bool,
}

impl Frontend {
    fn print_board(&self) {
        println!("{}", render::render_status(&self.session));
        print!("{}", render::render_board(&self.session.snapshot()));
    }

    /// Runs one command, returns `false` when the player wants to quit.
    fn handle(&mut self, command: Command) -> anyhow::Result<bool> {
        self.ticks.pump(&mut self.session);
        let was_running = self.session.is_timer_running();

        let result = match command {
            Command::Reveal(coords) => self
                .session
                .handle_primary_action(coords)
                .map(RevealOutcome::has_update),
            Command::Flag(coords) => self
                .session
                .handle_secondary_action(coords)
                .map(MarkOutcome::has_update),
            Command::Chord(coords) => self
                .session
                .handle_chord_action(coords)
                .map(RevealOutcome::has_update),
            Command::New(difficulty) => {
                let difficulty = difficulty.unwrap_or_else(|| self.session.difficulty());
                self.session.new_game(difficulty).map(|_| true)
            }
            Command::Print => {
                self.print_board();
                Ok(true)
            }
            Command::Help => {
                println!("{}", HELP);
                Ok(true)
            }
            Command::Quit => return Ok(false),
        };
        match result {
            Ok(true) => {}
            Ok(false) => println!("nothing to do there"),
            Err(err) => println!("{}", err),
        }

        if !was_running && self.session.is_timer_running() {
            self.ticks.restart();
        }
        self.flush_events()?;
        Ok(true)
    }

    fn flush_events(&mut self) -> anyhow::Result<()> {
        let mut redraw = false;
        let mut finished = None;

        for event in self.session.take_events() {
            log::trace!("event: {:?}", event);
            match event {
                GameEvent::Reset(_) | GameEvent::CellsChanged(_) | GameEvent::FlagsChanged(_) => {
                    redraw = true
                }
                GameEvent::StateChanged(_) | GameEvent::Tick(_) => {}
                GameEvent::Finished(summary) => finished = Some(summary),
            }
        }

        if redraw {
            self.print_board();
        }
        if let Some(summary) = finished {
            println!("{}", render::render_summary(&summary));
            if self.json {
                let json = serde_json::to_string_pretty(&summary)
                    .context("Could not serialize game summary")?;
                println!("{}", json);
            }
            println!("type \"n\" for a new game");
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.verbose);

    let session = match args.seed {
        Some(seed) => GameSession::with_seed(args.difficulty, seed),
        None => GameSession::new(args.difficulty),
    }
    .context("Could not start a game")?;
    log::debug!("seed: {}", session.seed());

    let mut frontend = Frontend {
        session,
        ticks: TickSource::new(),
        json: args.json,
    };
    frontend.print_board();
    println!("{}", HELP);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush().context("Could not write prompt")?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Could not read input")?;
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(command) => {
                if !frontend.handle(command)? {
                    break;
                }
            }
            Err(err) => println!("{:#}", err),
        }
    }

    Ok(())
}
