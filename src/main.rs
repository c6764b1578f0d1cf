// warpgrid: time-travelling grid language simulator

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser as ClapParser;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use num_bigint::BigInt;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_subscriber::EnvFilter;

use warpgrid::interpreter::{Outcome, SimConfig, Simulator};
use warpgrid::parser::Parser;
use warpgrid::ui::{App, RunStatus};

/// Run a grid program with inputs A and B
#[derive(Debug, ClapParser)]
#[command(name = "warpgrid", version, about)]
struct Cli {
    /// Program file: whitespace-separated tokens, `.` for empty cells
    program: PathBuf,

    /// Value substituted for every `A` cell
    #[arg(allow_negative_numbers = true)]
    a: BigInt,

    /// Value substituted for every `B` cell
    #[arg(allow_negative_numbers = true)]
    b: BigInt,

    /// Steps to run before giving up on a result
    #[arg(long, default_value_t = SimConfig::default().max_steps)]
    max_steps: usize,

    /// Browse the run in the terminal UI afterwards
    #[arg(long)]
    tui: bool,

    /// Only print the outcome, not every board
    #[arg(long, short)]
    quiet: bool,

    /// Do not record visited boards (incompatible with --tui)
    #[arg(long, conflicts_with = "tui")]
    no_trace: bool,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let source = match fs::read_to_string(&cli.program) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: cannot read '{}': {}", cli.program.display(), e);
            return Ok(ExitCode::from(1));
        }
    };

    let grid = match Parser::new(&source).parse_grid() {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(ExitCode::from(1));
        }
    };

    let config = SimConfig {
        max_steps: cli.max_steps,
        record_trace: !cli.no_trace,
    };
    let mut simulator = Simulator::with_parameters(grid, &cli.a, &cli.b, config);

    let quiet = cli.quiet;
    let status = match simulator.run_with(|sim| {
        if !quiet {
            print_board(sim);
        }
    }) {
        Ok(outcome) => RunStatus::Finished(outcome),
        Err(e) => RunStatus::Failed(e),
    };

    match &status {
        RunStatus::Finished(Outcome::Submitted(value)) => println!("Result: {}", value),
        RunStatus::Finished(Outcome::StepBudgetExceeded) => {
            println!("No result after {} steps", simulator.steps())
        }
        RunStatus::Failed(err) => eprintln!("Error: {}", err),
    }

    let space = simulator.space_used();
    println!(
        "Space used: {}x{} over {} ticks (volume {})",
        space.width(),
        space.height(),
        space.ticks,
        space.volume()
    );

    let code = match &status {
        RunStatus::Finished(Outcome::Submitted(_)) => ExitCode::SUCCESS,
        RunStatus::Finished(Outcome::StepBudgetExceeded) => ExitCode::from(2),
        RunStatus::Failed(_) => ExitCode::from(1),
    };

    if cli.tui {
        let trace = simulator.trace().clone();
        browse(App::new(trace, space.bounds, status))?;
    }

    Ok(code)
}

fn print_board(simulator: &Simulator) {
    let time = simulator.current_time();
    println!("Time: {}", time);
    if let Some(result) = simulator.result() {
        println!("Result: {}", result);
    }
    print!("{}", simulator.timeline().current());
    println!("--------------");
}

fn browse(mut app: App) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
