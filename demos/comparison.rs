//! Comparisons of uncertain values.
//!
//! A value known to lie in `[0, 2]` is compared against a few thresholds.
//! Comparisons that the range cannot decide split into a two-leaf diagram,
//! and later comparisons reuse the conditions on the path.
//!
//! Run with:
//! ```bash
//! cargo run --example comparison -- --dot comparison.dot
//! ```

use std::path::PathBuf;

use aadd_rs::manager::Manager;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about = "Comparisons of uncertain values")]
struct Cli {
    /// Write the final diagram in DOT format to this file
    #[arg(long)]
    dot: Option<PathBuf>,
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

    let mgr = Manager::default();
    println!("mgr = {:?}", mgr);

    let mut a = mgr.add(&mgr.scalar(0.0), &mgr.uncertain(0.0, 2.0));
    println!("a = {}", a.to_bracket_string());

    let condition = mgr.gt(&a, &mgr.scalar(4.0));
    println!("a > 4: {}", condition.to_bracket_string());

    let con = mgr.gt(&a, &mgr.scalar(1.0));
    println!("a > 1: {} ({} leaves)", con.to_bracket_string(), con.num_leaves());

    a = mgr.ite(&con, &mgr.add_scalar(&a, 10.0), &mgr.add_scalar(&a, -10.0));
    println!("a = ite(a > 1, a + 10, a - 10):");
    print!("{}", mgr.debug_string(&a));

    let cd = mgr.lt(&a, &mgr.scalar(5.0));
    println!("a < 5: {}", cd.to_bracket_string());
    a = mgr.ite(&cd, &mgr.scalar(10.0), &mgr.add_scalar(&a, 1.0));
    println!("a = ite(a < 5, 10, a + 1):");
    print!("{}", mgr.debug_string(&a));

    let bounds = mgr.bounds(&a);
    println!("a in [{}, {}]", bounds.min, bounds.max);
    println!("mgr = {:?}", mgr);

    if let Some(path) = cli.dot {
        std::fs::write(&path, mgr.to_dot(&a)?)?;
        println!("Wrote {}", path.display());
    }

    Ok(())
}
