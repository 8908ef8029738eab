//! # Lux CLI (`lux`)
//!
//! Command-line front end for the collection catalog: search it, inspect a
//! single object, or serve the web interface.
//!
//! ## Usage
//!
//! ```bash
//! lux --config ./config/lux.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `lux serve` | Start the HTTP server |
//! | `lux search` | Search objects by label, classifier, agent, and date |
//! | `lux show <id>` | Print one object's detail |
//! | `lux check` | Verify the database opens read-only |

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lux_search::catalog::Catalog;
use lux_search::models::SearchParams;
use lux_search::{config, details, search, server};

/// Lux — search the collection catalog from the terminal or the browser.
#[derive(Parser)]
#[command(
    name = "lux",
    about = "Lux — search a museum collection catalog by label, classifier, agent, and date",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/lux.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server.
    ///
    /// Binds to `[server].bind`; `--port` replaces its port.
    Serve {
        /// The port at which the server should listen.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Search objects. All filters are case-insensitive substring matches,
    /// except the date, which is matched case-sensitively.
    Search {
        /// Show only objects whose label contains this text.
        #[arg(short = 'l', long)]
        label: Option<String>,

        /// Show only objects classified with a name containing this text.
        #[arg(short = 'c', long)]
        classifier: Option<String>,

        /// Show only objects produced by an agent whose name contains this text.
        #[arg(short = 'a', long)]
        agent: Option<String>,

        /// Show only objects whose date contains this text.
        #[arg(short = 'd', long)]
        date: Option<String>,

        /// Print JSON instead of a listing.
        #[arg(long)]
        json: bool,
    },

    /// Show the details of one object.
    Show {
        /// The id of the object whose details should be shown.
        id: i64,

        /// Print JSON instead of sections.
        #[arg(long)]
        json: bool,
    },

    /// Verify that the database opens and answers queries.
    Check,
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lux_search=info,tower_http=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Logs go to stderr so `--json` output on stdout stays clean.
    if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Serve { port } => {
            server::run_server(&cfg, port).await?;
        }
        Commands::Search {
            label,
            classifier,
            agent,
            date,
            json,
        } => {
            let params = SearchParams::new(label, classifier, agent, date);
            search::run_search(&cfg, &params, json).await?;
        }
        Commands::Show { id, json } => {
            details::run_show(&cfg, id, json).await?;
        }
        Commands::Check => {
            let catalog = Catalog::open(&cfg).await?;
            catalog.ping().await?;
            catalog.close().await;
            println!("Database OK: {}", cfg.db.path.display());
        }
    }

    Ok(())
}
