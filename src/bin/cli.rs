//! `life-engine` binary: construct a grid, advance it for N generations,
//! and report elapsed time and throughput. This is a thin driver over the
//! `life_engine` library surface (§6 of the spec) — it does not implement
//! pattern catalogs, rule-string authoring beyond the library's own
//! parser, or anything else out of the core's scope.

use clap::Parser;
use life_engine::{Grid, LifeError, Rule, StepOptions};
use rand::Rng;
use std::time::Instant;
use tracing::info;

/// Advance a bit-packed Game-of-Life-family grid and report throughput.
#[derive(Parser, Debug)]
#[command(name = "life-engine", version, about = "Bit-packed outer-totalistic CA engine")]
struct Args {
    /// Grid height in cells.
    #[arg(long, default_value_t = 1024)]
    height: usize,

    /// Grid width in cells.
    #[arg(long, default_value_t = 1024)]
    width: usize,

    /// Totalistic rule as "B<digits>/S<digits>", e.g. B3/S23.
    #[arg(long, default_value = "B3/S23")]
    rule: String,

    /// Number of generations to advance.
    #[arg(long, default_value_t = 100)]
    generations: usize,

    /// Row-chunk length for the sweep engine.
    #[arg(long, default_value_t = life_engine::DEFAULT_CHUNK_LEN)]
    chunk_len: usize,

    /// Force parallel stepping on, regardless of grid height.
    #[arg(long, conflicts_with = "serial")]
    parallel: bool,

    /// Force serial (single-threaded) stepping, regardless of grid height.
    #[arg(long)]
    serial: bool,

    /// Starting pattern: "empty", "glider", "blinker", or "random".
    #[arg(long, default_value = "glider")]
    pattern: String,

    /// Density used when `--pattern random` (fraction of cells alive).
    #[arg(long, default_value_t = 0.3)]
    density: f64,

    /// Increase log verbosity (can be repeated); combine with `RUST_LOG`.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all logging output.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn init_logging(args: &Args) {
    if args.quiet {
        return;
    }
    let default_level = match args.verbose {
        0 => "life_engine=info",
        1 => "life_engine=debug",
        _ => "life_engine=trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn seed_pattern(grid: &mut Grid, pattern: &str, density: f64) -> Result<(), LifeError> {
    match pattern {
        "empty" => Ok(()),
        "glider" => {
            let glider: &[&[bool]] = &[
                &[false, true, false],
                &[false, false, true],
                &[true, true, true],
            ];
            grid.blit(0, 0, glider)
        }
        "blinker" => {
            if grid.height() >= 3 && grid.width() >= 3 {
                grid.set(1, 0, true)?;
                grid.set(1, 1, true)?;
                grid.set(1, 2, true)?;
            }
            Ok(())
        }
        "random" => {
            let mut rng = rand::rng();
            for r in 0..grid.height() {
                for c in 0..grid.width() {
                    if rng.random_bool(density) {
                        grid.set(r, c, true)?;
                    }
                }
            }
            Ok(())
        }
        other => Err(LifeError::Configuration(format!(
            "unknown --pattern {other:?}; expected empty, glider, blinker, or random"
        ))),
    }
}

fn run(args: Args) -> Result<(), LifeError> {
    let rule = Rule::parse(&args.rule)?;
    let mut grid = Grid::new(args.height, args.width, rule)?;
    seed_pattern(&mut grid, &args.pattern, args.density)?;

    let parallel = if args.parallel {
        Some(true)
    } else if args.serial {
        Some(false)
    } else {
        None
    };
    let opts = StepOptions {
        chunk_len: args.chunk_len,
        parallel,
    };

    info!(
        height = args.height,
        width = args.width,
        rule = %rule,
        generations = args.generations,
        chunk_len = opts.chunk_len,
        "starting run"
    );

    let cells_per_gen = (args.height * args.width) as f64;
    let start = Instant::now();
    for gen in 0..args.generations {
        grid.step(opts);
        if gen % 100 == 0 {
            info!(generation = gen, "advanced");
        }
    }
    let elapsed = start.elapsed();

    let total_cells = cells_per_gen * args.generations as f64;
    let cells_per_sec = total_cells / elapsed.as_secs_f64();
    println!(
        "{} generations of {}x{} ({}) in {:.3}s — {:.2}M cells/sec",
        args.generations,
        args.height,
        args.width,
        rule,
        elapsed.as_secs_f64(),
        cells_per_sec / 1_000_000.0
    );

    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(&args);
    if let Err(err) = run(args) {
        eprintln!("life-engine: {err}");
        std::process::exit(1);
    }
}
