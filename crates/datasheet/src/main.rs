use std::io::ErrorKind;
use std::process;

use clap::Parser;
use cli::{Args, Command};
use error::{DatasheetError, DatasheetResult};
use jemallocator::Jemalloc;
use polars::error::PolarsError;
use rayon::ThreadPoolBuilder;
use repository::Repository;

mod cli;
mod commands;
mod config;
mod datasheet;
mod error;
mod prelude;
mod progress;
mod region;
mod repository;
mod revision;
mod stats;
mod tables;
mod utils;
mod version;
mod vocab;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

fn num_threads(args: &Args) -> usize {
    if let Some(num_threads) = args.num_jobs {
        return num_threads;
    }

    if let Ok(config) =
        Repository::discover().and_then(|repo| repo.config())
    {
        if let Some(runtime) = config.runtime {
            if let Some(num_threads) = runtime.num_jobs {
                return num_threads;
            }
        }
    }

    0
}

fn run(args: Args) -> DatasheetResult<()> {
    match args.cmd {
        Command::Completions(cmd) => cmd.execute(),
        Command::Init(cmd) => cmd.execute(),
        Command::New(cmd) => cmd.execute(),
        Command::Status(cmd) => cmd.execute(),
        Command::Summary(cmd) => cmd.execute(),
        Command::Update(cmd) => cmd.execute(),
        Command::Verify(cmd) => cmd.execute(),
        Command::Version(cmd) => cmd.execute(),
    }
}

fn main() {
    env_logger::init();

    let args = Args::parse();

    ThreadPoolBuilder::new()
        .num_threads(num_threads(&args))
        .build_global()
        .unwrap();

    match run(args) {
        Ok(()) => process::exit(0),
        Err(DatasheetError::IO(e))
            if e.kind() == ErrorKind::BrokenPipe =>
        {
            process::exit(0)
        }
        Err(DatasheetError::Polars(PolarsError::IO {
            error, ..
        })) if error.kind() == ErrorKind::BrokenPipe => {
            process::exit(0);
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            process::exit(1);
        }
    }
}
