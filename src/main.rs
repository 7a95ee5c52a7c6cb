use anyhow::Result;
use clap::{Parser, Subcommand};
use park_tracker::config::{AppConfig, DataPaths};
use park_tracker::dashboard::write_static_site;
use park_tracker::data::DataStore;
use park_tracker::server;
use park_tracker::types::{VisitStatus, Visited};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Application settings (missing file means defaults)
    #[arg(short, long, value_name = "FILE", default_value = "park_tracker.toml", global = true)]
    config: PathBuf,

    /// Directory holding `data/` and `config/`; overrides PARK_TRACKER_ROOT
    #[arg(short, long, value_name = "DIR", global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the interactive dashboard
    Serve {
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Write static pages with every filter option selected
    Render {
        #[arg(short, long, value_name = "DIR", default_value = "site")]
        out: PathBuf,
    },
    /// Load every input file and report what was found
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut app_config = AppConfig::load_or_default(&cli.config)?;
    let paths = DataPaths::resolve(&app_config.data, cli.root.as_deref())?;
    info!("Project root: {:?}", paths.root);
    let store = DataStore::new(&paths);

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                app_config.server.port = port;
            }
            server::start_server(app_config, store).await?;
        }
        Commands::Render { out } => {
            write_static_site(&app_config.map, &store, &out)?;
            println!("Wrote dashboard pages to {:?}", out);
        }
        Commands::Check => {
            check_inputs(&store)?;
        }
    }

    Ok(())
}

fn check_inputs(store: &DataStore) -> Result<()> {
    let stamps = store.stamps.get()?;
    let visits = store.visits.get()?;
    let region_colors = store.region_colors.get()?;
    let visit_colors = store.visit_colors.get()?;

    let collected = stamps.iter().filter(|s| s.visited == Visited::Yes).count();
    println!("{:?}: {} stamps ({} collected)", store.stamps.path(), stamps.len(), collected);
    println!("{:?}: {} parks", store.visits.path(), visits.len());
    for status in VisitStatus::ALL {
        let count = visits.iter().filter(|v| v.status == status).count();
        println!("  {:<16} {}", status.label(), count);
    }
    println!("{:?}: {} region colors", store.region_colors.path(), region_colors.len());
    println!("{:?}: {} status colors", store.visit_colors.path(), visit_colors.len());
    Ok(())
}
