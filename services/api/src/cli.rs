use crate::demo::{run_board, run_demo, BoardArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use turnover_ai::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Turnover Operations Console",
    about = "Run and inspect the turnover scheduling service from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect the turnover timeline without starting the service
    Timeline {
        #[command(subcommand)]
        command: TimelineCommand,
    },
    /// Walk a reservation export through import, automation and the board
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum TimelineCommand {
    /// Render the timeline board for a reservation export
    Board(BoardArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Reservation export CSV to preload into the in-memory store
    #[arg(long)]
    pub(crate) pms_csv: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Timeline {
            command: TimelineCommand::Board(args),
        } => run_board(args),
        Command::Demo(args) => run_demo(args),
    }
}
