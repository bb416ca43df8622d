// Entrypoint for the example workflow. Resolves the connection settings,
// then walks through the research scenario in `workflow::run_example`.

use clap::Parser;
use crossterm::style::Stylize;

use voynich_cli::cli;
use voynich_cli::logging::init_logging;
use voynich_cli::workflow::{run_example, WorkflowCli, WorkflowOptions};
use voynich_cli::ApiClient;

fn main() {
    let args = WorkflowCli::parse();
    init_logging(args.connection.verbose);

    let config = match args.connection.to_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {e}", "Error:".red());
            std::process::exit(cli::EXIT_CONFIG);
        }
    };

    let options = WorkflowOptions {
        page_id: args.page_id,
        ..WorkflowOptions::default()
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = ApiClient::new(&config)
        .map_err(anyhow::Error::from)
        .and_then(|client| run_example(&client, &options, &mut out));
    if let Err(e) = result {
        eprintln!("\n{} {e:#}", "ERROR:".red());
        eprintln!("\nExample workflow did not complete successfully.");
        std::process::exit(cli::exit_code(&e));
    }
}
