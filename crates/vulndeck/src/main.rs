mod app;
mod cli;
mod commands;
mod config;
mod deck;
mod logging;
mod nav;
mod render;
mod theme;

use clap::{CommandFactory, Parser};
use colored::Colorize;

fn main() {
    clap_complete::CompleteEnv::with_factory(cli::Cli::command).complete();

    let cli = cli::Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }
    logging::init_logging(
        &logging::LogConfig::from_flags(cli.verbose, cli.quiet).with_ansi(!cli.no_color),
    );

    if let Err(e) = cli.run() {
        eprintln!("{} {e:#}", "error:".red().bold());
        std::process::exit(1);
    }
}
