// Squad optimizer entry point: loads a player catalogue and a request from
// the command line, runs the solver, and prints the resulting lineup.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load solver config
// 3. Parse CLI arguments into a SolverRequest
// 4. Load the player catalogue
// 5. Run the optimizer
// 6. Print the result

mod candidates;
mod catalogue;
mod chemistry;
mod config;
mod error;
mod player;
mod position;
mod solver;

use std::collections::HashSet;

use anyhow::Context;
use tracing::info;

use catalogue::InMemoryCatalogue;
use position::{EaId, Position};
use solver::{SolverRequest, SquadStatus};

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("squad optimizer starting up");

    let solver_config = config::load_config().context("failed to load configuration")?;
    info!(
        min_rating = solver_config.min_rating,
        candidate_limit = solver_config.candidate_limit,
        timeout_seconds = solver_config.timeout_seconds,
        "solver config loaded"
    );

    let args = CliArgs::parse(std::env::args().skip(1)).context("failed to parse arguments")?;

    let catalogue = InMemoryCatalogue::load_json(&args.catalogue_path)
        .context("failed to load player catalogue")?;
    info!(players = catalogue.len(), "catalogue loaded");

    let request = SolverRequest {
        positions: args.positions,
        budget: args.budget,
        min_chemistry: args.min_chemistry,
        owned: args.owned,
        include: args.include,
        owned_only: args.owned_only,
    };

    let response = solver::optimize(&catalogue, &request, &solver_config)
        .context("optimization failed")?;

    print_squad(&response);
    Ok(())
}

struct CliArgs {
    catalogue_path: String,
    positions: Vec<Position>,
    budget: u64,
    min_chemistry: i64,
    owned_only: bool,
    owned: HashSet<EaId>,
    include: HashSet<EaId>,
}

impl CliArgs {
    /// Parse `--catalogue`, `--positions`, `--budget`, `--min-chemistry`,
    /// `--owned-only`, `--owned`, and `--include` flags.
    fn parse(args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut catalogue_path = None;
        let mut positions = None;
        let mut budget = None;
        let mut min_chemistry = 20i64;
        let mut owned_only = false;
        let mut owned = HashSet::new();
        let mut include = HashSet::new();

        let mut iter = args.peekable();
        while let Some(flag) = iter.next() {
            match flag.as_str() {
                "--catalogue" => catalogue_path = Some(require_value(&mut iter, "--catalogue")?),
                "--positions" => {
                    let raw = require_value(&mut iter, "--positions")?;
                    let parsed = raw
                        .split(',')
                        .map(|s| {
                            Position::from_str_pos(s.trim())
                                .with_context(|| format!("invalid position '{s}'"))
                        })
                        .collect::<anyhow::Result<Vec<_>>>()?;
                    positions = Some(parsed);
                }
                "--budget" => {
                    budget = Some(require_value(&mut iter, "--budget")?.parse()?);
                }
                "--min-chemistry" => {
                    min_chemistry = require_value(&mut iter, "--min-chemistry")?.parse()?;
                }
                "--owned-only" => owned_only = true,
                "--owned" => {
                    let raw = require_value(&mut iter, "--owned")?;
                    for id in raw.split(',').filter(|s| !s.is_empty()) {
                        owned.insert(EaId(id.parse()?));
                    }
                }
                "--include" => {
                    let raw = require_value(&mut iter, "--include")?;
                    for id in raw.split(',').filter(|s| !s.is_empty()) {
                        include.insert(EaId(id.parse()?));
                    }
                }
                other => anyhow::bail!("unrecognized argument: {other}"),
            }
        }

        Ok(CliArgs {
            catalogue_path: catalogue_path.context("--catalogue is required")?,
            positions: positions.context("--positions is required")?,
            budget: budget.context("--budget is required")?,
            min_chemistry,
            owned_only,
            owned,
            include,
        })
    }
}

fn require_value(
    iter: &mut std::iter::Peekable<impl Iterator<Item = String>>,
    flag: &str,
) -> anyhow::Result<String> {
    iter.next()
        .with_context(|| format!("{flag} requires a value"))
}

/// Print the solved lineup in the style of the optimizer's original console
/// report: a summary block followed by a per-slot table.
fn print_squad(response: &solver::SolverResponse) {
    let lineup = &response.lineup;

    println!("\n{}", "=".repeat(80));
    let status = match response.status {
        SquadStatus::Optimal => "OPTIMAL",
        SquadStatus::Feasible => "FEASIBLE",
    };
    println!("OPTIMIZED SQUAD - {status}");
    println!("{}", "=".repeat(80));
    println!("Total Rating: {:.2}", response.objective_rating);
    println!("Total Cost: {} coins", lineup.total_cost());
    println!("Total Chemistry: {}/33", lineup.total_chemistry());
    println!("Solve Time: {:.1}s", response.elapsed_seconds);
    println!("Owned Players: {}/11", lineup.owned_count());
    if lineup.required_count() > 0 {
        println!("Required Players: {}/11", lineup.required_count());
    }

    println!("\n{}", "-".repeat(80));
    println!(
        "{:<3} {:<6} {:<25} {:<6} {:<12} {:<5} {:<5}",
        "#", "Pos", "Player", "Rtg", "Price", "Own", "Req"
    );
    println!("{}", "-".repeat(80));

    for (i, slot) in lineup.slots.iter().enumerate() {
        let candidate = &slot.candidate;
        let mut name = candidate.player.name.clone();
        if candidate.player.is_icon {
            name.push_str(" [ICON]");
        } else if candidate.player.is_hero {
            name.push_str(" [HERO]");
        }
        let price = if candidate.is_owned {
            "OWNED".to_string()
        } else {
            candidate.effective_price.to_string()
        };
        let owned_mark = if candidate.is_owned { "*" } else { "" };
        let required_mark = if candidate.is_required { "!" } else { "" };

        println!(
            "{:<3} {:<6} {:<25} {:<6.1} {:<12} {:<5} {:<5}",
            i + 1,
            slot.position,
            name,
            candidate.rating,
            price,
            owned_mark,
            required_mark,
        );
    }

    println!("{}", "=".repeat(80));
}

/// Initialize tracing to log to a file (not the terminal, which prints the
/// squad report).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("squad-optimizer.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("squad_optimizer=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
