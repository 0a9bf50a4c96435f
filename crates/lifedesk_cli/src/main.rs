//! `lifedesk` command-line entry point.

mod cli;
mod commands;
mod error;

use clap::Parser;
use cli::{Cli, Command};
use error::CliResult;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let client = cli.client;
    match cli.command {
        Command::Serve(args) => commands::serve(args),
        Command::Register {
            name,
            email,
            password,
        } => commands::register(&client, &name, &email, &password),
        Command::Login { email, password } => commands::login(&client, &email, &password),
        Command::Logout => commands::logout(&client),
        Command::Whoami => commands::whoami(&client),
        Command::Tasks(command) => commands::tasks(&client, command),
        Command::Notes(command) => commands::notes(&client, command),
        Command::Goals(command) => commands::goals(&client, command),
    }
}
