mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "websurfer")]
#[command(about = "A web-research agent with a text browser", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the surfer agent directly on one research task
    Surf {
        /// The research task, e.g. a question to answer from the web
        task: String,
    },

    /// Ask the orchestrating agent a question (delegates web work)
    Ask {
        /// The question to answer
        question: String,

        /// Path of a file attached to the question
        #[arg(long)]
        file: Option<String>,
    },

    /// Run a batch of questions from a JSONL dataset
    Eval {
        /// Input dataset: one {"task_id", "question", "file_name"?} per line
        #[arg(long)]
        dataset: String,

        /// Output file: one {"task_id", "answer", "steps"} per line
        #[arg(long)]
        output: String,

        /// Number of questions to run concurrently
        #[arg(long, default_value = "4")]
        concurrency: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Surf { task } => {
            commands::surf::run(&task).await?;
        }
        Commands::Ask { question, file } => {
            commands::ask::run(&question, file.as_deref()).await?;
        }
        Commands::Eval {
            dataset,
            output,
            concurrency,
        } => {
            commands::eval::run(&dataset, &output, concurrency).await?;
        }
    }

    Ok(())
}
