//! A discrete-time water level monitor.
//!
//! The level changes with an uncertain rate of `0.8 +- 0.2` per step. The
//! rate turns negative once the level reaches the upper mark and positive
//! again below the lower mark.
//!
//! Run with:
//! ```bash
//! cargo run --release --example water_level -- --steps 50
//! ```

use aadd_rs::approx::Approximation;
use aadd_rs::manager::Manager;
use aadd_rs::scope::ScopeManager;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about = "Water level monitor with an uncertain rate")]
struct Cli {
    /// Number of simulation steps
    #[arg(long, default_value = "30")]
    steps: usize,

    /// Upper mark
    #[arg(long, default_value = "10")]
    high: f64,

    /// Lower mark
    #[arg(long, default_value = "2")]
    low: f64,

    /// Approximation mode: min-range, chebyshev, secant or interval-exact
    #[arg(long, default_value = "chebyshev")]
    approximation: Approximation,

    /// Merge sibling leaves after every step
    #[arg(long)]
    join: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let cli = Cli::parse();
    println!("cli = {:?}", cli);

    let time_total = std::time::Instant::now();

    let mgr = Manager::new(cli.approximation);
    let uncertainty = mgr.uncertain(-0.2, 0.2);
    let up = mgr.add_scalar(&uncertainty, 0.8);
    let down = mgr.add_scalar(&uncertainty, -0.8);

    let mut rate = up.clone();
    let mut level = mgr.scalar(5.0);
    let mut scopes = ScopeManager::new(&mgr);
    let mut hash = 0;

    for step in 1..=cli.steps {
        hash += level.num_leaves();

        scopes.begin_branch(mgr.ge(&level, &mgr.scalar(cli.high)));
        scopes.assign(&mut rate, down.clone());
        scopes.end_branch()?;

        scopes.begin_branch(mgr.lt(&level, &mgr.scalar(cli.low)));
        scopes.assign(&mut rate, up.clone());
        scopes.end_branch()?;

        level = mgr.add(&level, &rate);
        if cli.join {
            level = mgr.join(&level);
        }

        let bounds = mgr.bounds(&level);
        println!(
            "{:>4}: level in [{:.3}, {:.3}], {} leaves, {} conditions",
            step,
            bounds.min,
            bounds.max,
            level.num_leaves(),
            mgr.num_conditions()
        );
    }

    println!("Sum of leaf counts: {}", hash);
    println!("mgr = {:?}", mgr);
    println!("Total time: {:.2?}", time_total.elapsed());

    Ok(())
}
