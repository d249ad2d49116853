use crate::demo::{run_demo, DemoArgs};
use crate::evaluate::{run_evaluate, EvaluateArgs};
use crate::server;
use chowk_screening::error::AppError;
use chowk_screening::workflows::applications::EvaluatorKind;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Orange Chowk Screening",
    about = "Score and route membership applications from the command line or over HTTP",
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
    /// Score answers given inline or from an exported CSV
    Evaluate(EvaluateArgs),
    /// Run sample applicants through intake, scoring, and routing
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured evaluator (heuristic or remote)
    #[arg(long, value_parser = crate::infra::parse_engine)]
    pub(crate) engine: Option<EvaluatorKind>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Evaluate(args) => run_evaluate(args).await,
        Command::Demo(args) => run_demo(args).await,
    }
}
