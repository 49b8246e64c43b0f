use crate::demo::{
    run_demo, run_report, run_review_prompt, run_review_show, DemoArgs, PromptArgs, ReportArgs,
    ShowArgs,
};
use crate::server;
use answer_review::error::AppError;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Answer Review",
    about = "Grade open answers with hidden AI suggestions and report class results",
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
    /// Inspect an answer catalog from the command line
    Review {
        #[command(subcommand)]
        command: ReviewCommand,
    },
    /// Build the RTTI class report from a results CSV export
    Report(ReportArgs),
    /// Walk through a grading session on the bundled sample question
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum ReviewCommand {
    /// Print the grading grid with current scores and suggestion states
    Show(ShowArgs),
    /// Print the grading prompt and chat link for one answer
    Prompt(PromptArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Answer catalog JSON to review (defaults to the bundled sample)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Review {
            command: ReviewCommand::Show(args),
        } => run_review_show(args),
        Command::Review {
            command: ReviewCommand::Prompt(args),
        } => run_review_prompt(args),
        Command::Report(args) => run_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
