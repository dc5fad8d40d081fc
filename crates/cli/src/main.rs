//! qaboard CLI - Main Entry Point
//!
//! Inspects vehicle QA results from the terminal and serves the web
//! dashboard.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod output;

use commands::{parts, serve, session, show, summary, tree, Context};

/// qaboard CLI - Vehicle QA test dashboard
#[derive(Parser)]
#[command(name = "qaboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (defaults to ~/.qaboard/config.toml)
    #[arg(long, global = true, env = "QABOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Roll up test counts for the vehicle or one node
    Summary(summary::SummaryArgs),

    /// Print the system tree
    Tree(tree::TreeArgs),

    /// Show the detail panel for one leaf
    Show(show::ShowArgs),

    /// List diagram parts and the tree nodes they resolve to
    Parts,

    /// Store the dashboard identity
    Login {
        /// Username
        username: String,
    },

    /// Clear the dashboard identity
    Logout,

    /// Show the stored identity
    Whoami,

    /// Start the web dashboard
    Serve(serve::ServeArgs),

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let ctx = Context::load(cli.config.as_deref(), cli.format)?;

    match cli.command {
        Commands::Summary(args) => summary::execute(args, &ctx)?,
        Commands::Tree(args) => tree::execute(args, &ctx)?,
        Commands::Show(args) => show::execute(args, &ctx)?,
        Commands::Parts => parts::execute(&ctx)?,
        Commands::Login { username } => session::login(&username, &ctx)?,
        Commands::Logout => session::logout(&ctx)?,
        Commands::Whoami => session::whoami(&ctx)?,
        Commands::Serve(args) => serve::execute(args, ctx).await?,
        Commands::Version => {
            println!("qaboard CLI v{}", qaboard_common::VERSION);
            println!("Vehicle QA test dashboard");
        }
    }

    Ok(())
}
