//! CLI entry point for folio

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "A personal homepage with a file-backed markdown blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the posts and serve them
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// List site information
    List {
        /// Type of content to list (post, tag)
        #[arg(default_value = "post")]
        r#type: String,

        /// Only list posts carrying this tag
        #[arg(short, long)]
        tag: Option<String>,
    },

    /// Report posts that fail to load
    Check,

    /// Print the code highlighting stylesheet
    Css,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio=debug,info"
    } else {
        "folio=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("cannot determine current directory")?,
    };

    match cli.command {
        Commands::Serve { port, ip } => {
            let site = folio::Site::new(&base_dir)?;
            folio::server::start(&site, &ip, port).await?;
        }

        Commands::List { r#type, tag } => {
            let site = folio::Site::new(&base_dir)?;
            folio::commands::list::run(&site, &r#type, tag.as_deref())?;
        }

        Commands::Check => {
            let site = folio::Site::new(&base_dir)?;
            folio::commands::check::run(&site)?;
        }

        Commands::Css => {
            let site = folio::Site::new(&base_dir)?;
            folio::commands::css::run(&site)?;
        }

        Commands::Version => {
            println!("folio version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
