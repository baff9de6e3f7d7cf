use clap::{Parser, Subcommand};
use dealsync_core::config::Config;
use dealsync_core::store::ProjectStore;

#[derive(Parser)]
#[command(
    name = "dealsync",
    about = "Relay HubSpot closed-won deals into Basecamp projects",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the relay server
    Serve {
        /// Port to listen on
        #[arg(long, env = "PORT", default_value = "3000")]
        port: u16,
    },

    /// Print locally recorded projects
    Projects {
        /// Output as JSON
        #[arg(long, short = 'j')]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        Commands::Projects { .. } => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let config = Config::from_env();

    match cli.command {
        Commands::Serve { port } => dealsync_server::serve(config, port).await,
        Commands::Projects { json } => {
            let records = ProjectStore::new(config.store_path()).load();
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                println!("{} project(s)", records.len());
                for record in records {
                    println!(
                        "  {}  deal {}  {}  ({})",
                        record.id, record.deal_id, record.name, record.amount
                    );
                }
            }
            Ok(())
        }
    }
}
