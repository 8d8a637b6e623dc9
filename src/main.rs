mod cli;
mod config;
mod core;
mod models;
mod plugin;
mod sources;

use clap::Parser;

fn main() {
    let cli = cli::Cli::parse();

    let mut clog = colog::default_builder();
    clog.filter(
        None,
        if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        },
    );
    clog.init();

    if let Err(e) = cli::run(cli) {
        eprintln!("오류: {:#}", e);
        std::process::exit(1);
    }
}
