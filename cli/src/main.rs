mod commands;
mod terminal;

use commands::{CommandLine, Commands, run, workloads};
use terminal::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);

    match commands.command {
        Commands::Run(args) => run::run(args).await,
        Commands::Workloads => {
            workloads::workloads();
            Ok(())
        }
    }
}
