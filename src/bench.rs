//! Benchmarks the fruit selector and checks the observed distribution against the weights
use clap::Parser;
use fruit_machine::fruit::fruit_selector;
use fruit_machine::selector::{SelectorError, WeightedSelector};
use std::time::Instant;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
    #[arg(short, long, default_value_t = 100000)]
    trials: usize,
    #[arg(short, long, default_value_t = 5)]
    episodes: usize,
    /// Print the final episode's shares as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn run_benchmark(trials: usize) -> Result<(WeightedSelector, f64), SelectorError> {
    let mut selector = fruit_selector()?;
    let start = Instant::now();
    for _ in 0..trials {
        selector.draw()?;
    }
    let elapsed = start.elapsed();
    let draws_per_second = trials as f64 / elapsed.as_secs_f64();
    println!(
        "{} draws in {:.4} seconds ({:.2} draws per second)",
        trials,
        &elapsed.as_secs_f64(),
        draws_per_second
    );
    Ok((selector, elapsed.as_secs_f64()))
}

fn print_table(selector: &WeightedSelector) {
    println!("Label\tWeight\tCount\tObserved\tExpected");
    for share in selector.shares() {
        println!(
            "{}\t{}\t{}\t{:>7.3}%\t{:>7.3}%",
            share.label,
            share.weight,
            share.count,
            100.0 * share.observed,
            100.0 * share.expected
        );
    }
    let degrees_of_freedom = selector.items().iter().filter(|i| i.weight > 0).count() - 1;
    println!(
        "Chi-square: {:.3} ({} degrees of freedom)",
        selector.chi_square(),
        degrees_of_freedom
    );
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut durations = Vec::with_capacity(args.episodes);
    let mut last = None;
    for episode in 0..args.episodes {
        log::info!("Starting episode {}", episode);
        let (selector, duration) = run_benchmark(args.trials)?;
        durations.push(duration);
        last = Some(selector);
    }
    let Some(selector) = last else {
        return Ok(());
    };
    println!("---");
    println!(
        "Average duration: {:.4} seconds",
        durations.iter().sum::<f64>() / durations.len() as f64
    );
    println!(
        "Average draws per second: {:.2}",
        (args.episodes * args.trials) as f64 / durations.iter().sum::<f64>()
    );
    println!("---");
    if args.json {
        println!("{}", serde_json::to_string_pretty(&selector.shares())?);
    } else {
        print_table(&selector);
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    println!(
        "===\nTrials: {}, Episodes: {}",
        args.trials, args.episodes
    );
    println!("---");
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    if let Err(err) = run(&args) {
        log::error!("Benchmark failed: {}", err);
        eprintln!("Benchmark failed: {}", err);
        std::process::exit(1);
    }
}
