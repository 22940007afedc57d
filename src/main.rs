//! Pollconf CLI

use std::path::Path;
use std::process;
use std::sync::Arc;

use pollconf::config::LoopConfig;
use pollconf::engine::PollerState;
use pollconf::{Options, Tuning};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Pollconf v{}", env!("CARGO_PKG_VERSION"));
        eprintln!();
        eprintln!("Usage: pollconf <command> [options]");
        eprintln!();
        eprintln!("Commands:");
        eprintln!("  check <config.toml>    Resolve a configuration file and print the result");
        process::exit(1);
    }

    let command = &args[1];

    match command.as_str() {
        "check" => {
            if args.len() < 3 {
                eprintln!("Usage: pollconf check <config.toml>");
                process::exit(1);
            }

            if let Err(e) = check(Path::new(&args[2])) {
                eprintln!("{e}");
                process::exit(1);
            }
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!("Run 'pollconf' for usage information.");
            process::exit(1);
        }
    }
}

fn check(path: &Path) -> pollconf::Result<()> {
    let config = LoopConfig::from_file(path)?;

    let options = Options::resolve(config.options());
    let poller = Arc::new(PollerState::default());
    config.apply_tuning(&Tuning::new(Arc::clone(&poller)))?;

    println!("Configuration: {}", path.display());
    println!();
    println!("  read_timeout:   {:?}", options.read_timeout());
    println!("  idle_timeout:   {:?}", options.idle_timeout());
    println!("  num_loops:      {}", poller.num_loops());
    println!("  load_balance:   {}", poller.load_balance());
    println!("  dispatch_pool:  {}", poller.dispatch_pool_enabled());

    Ok(())
}
