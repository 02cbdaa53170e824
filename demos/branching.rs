//! Symbolic execution of `if`/`else` and `while` with the scope builder.
//!
//! Run with:
//! ```bash
//! cargo run --example branching
//! ```

use aadd_rs::manager::Manager;
use aadd_rs::scope::ScopeManager;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about = "Branches and loops over uncertain values")]
struct Cli {
    /// Loop bound
    #[arg(long, default_value = "10")]
    limit: f64,

    /// Maximum number of loop iterations
    #[arg(long, default_value = "100")]
    max_iterations: usize,
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
    let mut scopes = ScopeManager::new(&mgr);

    // if (g > 1) { g = g + 5 } else { g = g + 9 }
    let mut g = mgr.uncertain(0.0, 2.0);
    scopes.begin_branch(mgr.gt(&g, &mgr.scalar(1.0)));
    let value = mgr.add_scalar(&g, 5.0);
    scopes.assign(&mut g, value);
    scopes.begin_else()?;
    let value = mgr.add_scalar(&g, 9.0);
    scopes.assign(&mut g, value);
    scopes.end_branch()?;
    println!("After if/else, g is:");
    print!("{}", mgr.debug_string(&g));

    // while (a < limit) { a = a + 1; b = b - 10 }
    let mut a = mgr.uncertain(0.0, 2.0);
    let mut b = mgr.uncertain(10.0, 12.0);
    let mut iterations = 0;
    loop {
        let condition = mgr.lt(&a, &mgr.scalar(cli.limit));
        if mgr.is_zero(&condition) {
            break;
        }
        if iterations == cli.max_iterations {
            log::warn!("Stopping after {} iterations", iterations);
            break;
        }
        iterations += 1;
        scopes.begin_loop(condition);
        let value = mgr.add_scalar(&a, 1.0);
        scopes.assign(&mut a, value);
        let value = mgr.add_scalar(&b, -10.0);
        scopes.assign(&mut b, value);
    }
    scopes.end_loop()?;

    println!("After {} iterations, a is:", iterations);
    print!("{}", mgr.debug_string(&a));
    for (path, leaf) in a.paths() {
        let path: Vec<String> = path
            .iter()
            .map(|&(index, taken)| if taken { index.to_string() } else { format!("!{}", index) })
            .collect();
        println!("  [{}] => {}", path.join(", "), leaf);
    }
    let bounds = mgr.bounds(&b);
    println!("b in [{}, {}]", bounds.min, bounds.max);

    Ok(())
}
