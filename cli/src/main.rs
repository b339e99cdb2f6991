#![warn(clippy::pedantic)]

use std::{
    io::{self, BufRead},
    path::{Path, PathBuf},
    time::Instant,
};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{self, WrapErr};
use cube_core::{CubeFaces, FaceletsError, parse_scramble};
use owo_colors::OwoColorize;
use scramble_tracker::{SolveSession, TrackerConfig, TrackerStatus};
use solve_analysis::{CfopAnalysis, analyze_solve};

mod report;

/// Follow scrambles and break solves down into CFOP phases
#[derive(Parser)]
#[command(name = "cubetrack", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Split a solution into Cross, F2L, OLL and PLL
    Analyze {
        /// The scramble the solution starts from
        #[arg(long)]
        scramble: String,
        #[arg(long)]
        solution: String,
        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },
    /// Read moves from stdin, following the scramble and then timing the solve.
    ///
    /// A line of the form `sync <facelets>` replaces the cube's state.
    Track {
        #[arg(long)]
        scramble: String,
        /// A TOML file of tracker settings
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the 54 facelets of a solved cube after performing an algorithm
    Facelets { alg: String },
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    env_logger::init();

    match Cli::parse().command {
        Command::Analyze {
            scramble,
            solution,
            json,
        } => analyze(&scramble, &solution, json),
        Command::Track { scramble, config } => track(&scramble, config.as_deref()),
        Command::Facelets { alg } => {
            println!(
                "{}",
                CubeFaces::solved()
                    .apply_moves(&parse_scramble(&alg))
                    .to_facelets()
            );
            Ok(())
        }
    }
}

fn analyze(scramble: &str, solution: &str, json: bool) -> eyre::Result<()> {
    let scrambled = CubeFaces::solved().apply_moves(&parse_scramble(scramble));
    let analysis = analyze_solve(&scrambled, &parse_scramble(solution));

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        print_analysis(&analysis);
    }

    Ok(())
}

fn print_analysis(analysis: &CfopAnalysis) {
    println!("{} {}", "Cross color:".bold(), analysis.cross_color);

    for phase in analysis.phases() {
        let summary = report::phase_summary(phase);

        if phase.skipped {
            println!("{:<6} {}", phase.name.bold(), summary.dimmed());
        } else {
            println!("{:<6} {summary}", phase.name.bold());
        }
    }

    println!("{} {}", "Total:".bold(), analysis.total_moves());
}

fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_owned());
    }

    let default = dirs::config_dir()?.join("cubetrack").join("config.toml");
    default.exists().then_some(default)
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn start_solve_once_scrambled(session: &mut SolveSession, solve_start: &mut Option<Instant>) {
    if session.state().status != TrackerStatus::Completed {
        return;
    }

    session.start_solving();
    *solve_start = Some(Instant::now());

    println!("{}", "Scramble done, start solving".green().bold());
}

/// Resynchronize from a `sync` line, leaving the session alone if the facelets are malformed
fn sync(session: &mut SolveSession, facelets: &str) -> Result<(), FaceletsError> {
    session
        .sync_with_facelets(facelets.trim())
        .inspect_err(|err| log::warn!("Bad facelets `{}`: {err}", facelets.trim()))
}

fn track(scramble: &str, config: Option<&Path>) -> eyre::Result<()> {
    let config = match config_path(config) {
        Some(path) => TrackerConfig::load(&path)
            .wrap_err_with(|| format!("Loading {}", path.display()))?,
        None => TrackerConfig::default(),
    };

    let mut session = SolveSession::new(config);
    session.set_scramble(scramble);

    if session.state().status == TrackerStatus::Idle {
        eyre::bail!("`{scramble}` doesn't contain any moves");
    }

    println!("{}", report::progress(session.state()));

    let mut solve_start = None::<Instant>;

    for line in io::stdin().lock().lines() {
        let line = line?;

        if let Some(facelets) = line.trim().strip_prefix("sync ") {
            if let Err(err) = sync(&mut session, facelets) {
                println!("{}", format!("Ignoring `{}`: {err}", line.trim()).yellow());
            }
            start_solve_once_scrambled(&mut session, &mut solve_start);
        } else {
            for token in line.split_whitespace() {
                let performed = match solve_start {
                    Some(start) => session.perform_timed_move(token, elapsed_ms(start)),
                    None => session.perform_move(token),
                };

                if performed.is_none() {
                    log::info!("`{token}` is not a move");
                }

                start_solve_once_scrambled(&mut session, &mut solve_start);

                if session.state().status == TrackerStatus::Solved {
                    break;
                }
            }
        }

        if session.state().status == TrackerStatus::Solved {
            break;
        }

        let progress = report::progress(session.state());
        if session.state().status == TrackerStatus::Diverged {
            println!("{}", progress.red());
        } else {
            println!("{progress}");
        }

        if session.tracker().should_reset_cube() {
            println!(
                "{}",
                "Too far from the scramble, send `sync <facelets>` with the cube's state".yellow()
            );
        }
    }

    let Some(record) = session.finish(solve_start.map_or(0, elapsed_ms)) else {
        eprintln!("Input ended before the cube was solved");
        return Ok(());
    };

    print_analysis(&record.cfop_analysis);

    if let Some(stats) = record.stats() {
        for line in report::timing_lines(&stats) {
            println!("{}", line.dimmed());
        }
    }

    println!("{}", serde_json::to_string_pretty(&record)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use cube_core::{CubeFaces, FaceletsError, parse_scramble};
    use pretty_assertions::assert_eq;
    use scramble_tracker::{SolveSession, TrackerStatus};

    use super::sync;

    #[test]
    fn malformed_sync_keeps_the_session() {
        let mut session = SolveSession::default();
        session.set_scramble("R U F");
        session.perform_move("R");

        assert_eq!(
            sync(&mut session, "UUU"),
            Err(FaceletsError::InvalidLength(3))
        );
        assert_eq!(session.state().status, TrackerStatus::Scrambling);
        assert_eq!(session.state().current_index, 1);

        let cube = CubeFaces::solved().apply_moves(&parse_scramble("R U"));
        assert_eq!(sync(&mut session, &cube.to_facelets()), Ok(()));
        assert_eq!(session.state().current_index, 2);
    }
}
