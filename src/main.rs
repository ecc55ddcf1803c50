//! Spins the fruit machine a fixed number of times and prints the tally
use clap::Parser;
use env_logger::fmt::Formatter;
use fruit_machine::fruit::{fruit_selector, play, TRIALS};
use fruit_machine::selector::SelectorError;
use log::Record;
use std::io::Write;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
}

fn run() -> Result<(), SelectorError> {
    let mut selector = fruit_selector()?;
    log::info!("Running {} trials", TRIALS);
    play(&mut selector, TRIALS, |line| println!("{}", line))
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::new()
        .format(|buf: &mut Formatter, record: &Record| {
            let timestamp = buf.timestamp_millis();
            writeln!(buf, "[{}] [{}] - {}", timestamp, record.level(), record.args())
        })
        .filter_level(args.verbose.log_level_filter())
        .init();

    if let Err(err) = run() {
        log::error!("Fruit machine stopped: {}", err);
        eprintln!("Fruit machine stopped: {}", err);
        std::process::exit(1);
    }
}
