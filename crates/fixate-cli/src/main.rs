use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fixate", version, about = "Fixate focus timer CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a focus session to completion
    Run {
        /// Session length in minutes (1-10)
        #[arg(long)]
        minutes: Option<u32>,
        /// Skip the first-visit confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Print the current state surface as JSON
    Status,
    /// Print the current streak
    Streak,
    /// Show the last seven days
    History,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run { minutes, yes } => commands::run::run(minutes, yes).await,
        Commands::Status => commands::status::run(),
        Commands::Streak => commands::streak::run(),
        Commands::History => commands::history::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
