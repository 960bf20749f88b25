mod calc;
mod cli;
mod error;
mod export;
mod fmt;
mod models;
mod progress;
mod settings;
mod store;
mod tui;

use clap::{CommandFactory, Parser};

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Init { data_dir }) => cli::init::run(data_dir),
        Some(Commands::Status) => cli::status::run(),
        Some(Commands::Attach { category, paths }) => cli::files::attach(category, &paths),
        Some(Commands::Detach { category, index }) => cli::files::detach(category, index),
        Some(Commands::Files { category }) => cli::files::list(category),
        Some(Commands::Save { command }) => cli::save::run(command),
        Some(Commands::Later { category }) => cli::later::run(category),
        Some(Commands::Lookup { address }) => cli::lookup::run(address.as_deref()),
        Some(Commands::Year { year }) => cli::year::run(&year),
        Some(Commands::Demo) => cli::demo::run(),
        Some(Commands::Review { category }) => cli::review::run(category),
        Some(Commands::Export { output, save }) => cli::export::run(output.as_deref(), save),
        Some(Commands::Reset { force }) => cli::reset::run(force),
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "klaar", &mut std::io::stdout());
            Ok(())
        }
        None => cli::dashboard::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
