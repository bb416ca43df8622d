// Entrypoint for the `voynich` CLI.
// - Keeps `main` small: parse arguments, run one command, map errors to an
//   exit code.
// - No subcommand prints help and exits successfully.

use clap::{CommandFactory, Parser};
use crossterm::style::Stylize;

use voynich_cli::cli::{self, Cli};
use voynich_cli::logging::init_logging;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.connection.verbose);

    let Some(command) = cli.command.as_ref() else {
        if let Err(e) = Cli::command().print_help() {
            eprintln!("{} {e}", "Error:".red());
            std::process::exit(cli::EXIT_FAILURE);
        }
        return;
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = cli::run(&cli.connection, command, &mut out) {
        eprintln!("{} {e:#}", "Error:".red());
        std::process::exit(cli::exit_code(&e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
