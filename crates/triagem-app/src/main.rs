use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use eyre::Result;
use tracing_subscriber::EnvFilter;

use triagem_app::commands::{self, Output};
use triagem_app::config::{self, CredentialSource, TriagemConfig};
use triagem_app::state::AppState;
use triagem_storage::PatientRepository;
use triagem_storage::memory::MemoryPatientRepository;

#[derive(Parser)]
#[command(name = "triagem")]
#[command(about = "Patient intake and triage queue")]
#[command(version)]
struct Cli {
    /// Use an in-memory store instead of S3 (nothing is persisted)
    #[arg(long, global = true)]
    memory: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Seconds to wait for the queue to load
    #[arg(long, global = true, default_value_t = 10)]
    wait: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a patient and add them to the queue
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: String,
        #[arg(long)]
        description: String,
        /// Triage level, 1 (mild) to 5 (emergency)
        #[arg(long)]
        severity: String,
    },
    /// Show the queue
    List,
    /// Remove one patient from the queue
    Delete {
        /// Position in the queue, as shown by `list`
        position: usize,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Remove every patient from the queue
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Follow the queue live until Ctrl-C
    Watch,
    /// Interactive session with both screens
    Shell,
    /// Manage the backend configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Write a new config file
    Init {
        #[arg(long)]
        region: String,
        #[arg(long)]
        bucket: String,
        /// AWS profile to use instead of the default credential chain
        #[arg(long)]
        profile: Option<String>,
        /// Collection prefix inside the bucket
        #[arg(long)]
        collection: Option<String>,
        /// Subscription poll interval in milliseconds
        #[arg(long)]
        poll_interval_ms: Option<u64>,
    },
    /// Print the current config with secrets redacted
    Show,
    /// Remove the config file
    Delete,
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn open_state(memory: bool) -> Result<AppState> {
    Ok(AppState::new(build_repository(memory).await?))
}

async fn build_repository(memory: bool) -> Result<Arc<dyn PatientRepository>> {
    if memory {
        tracing::info!("using in-memory patient store");
        return Ok(Arc::new(MemoryPatientRepository::new()));
    }

    let path = config::config_path()?;
    if !config::has_config(&path) {
        return Err(eyre::eyre!(
            "no config at {}: run `triagem config init` or pass --memory",
            path.display()
        ));
    }
    let config = config::load_config(&path)?;
    Ok(triagem_app::aws::build_repository(&config).await)
}

fn run_config(command: ConfigCommand) -> Result<ExitCode> {
    let path = config::config_path()?;
    match command {
        ConfigCommand::Init {
            region,
            bucket,
            profile,
            collection,
            poll_interval_ms,
        } => {
            let credentials = match profile {
                Some(profile_name) => CredentialSource::Profile { profile_name },
                None => CredentialSource::DefaultChain,
            };
            let mut config = TriagemConfig::new(region, bucket, credentials);
            if let Some(collection) = collection {
                config.collection = collection;
            }
            if let Some(ms) = poll_interval_ms {
                config.poll_interval_ms = ms;
            }
            config::save_config(&path, &config)?;
            println!("{}", path.display());
        }
        ConfigCommand::Show => {
            let config = config::load_config(&path)?;
            let info = config::config_info(&config);
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        ConfigCommand::Delete => config::delete_config(&path)?,
    }
    Ok(ExitCode::SUCCESS)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.json);

    let output = Output {
        color: !cli.no_color && std::io::stdout().is_terminal(),
        snapshot_wait: Duration::from_secs(cli.wait),
    };
    let memory = cli.memory;

    match cli.command {
        Commands::Config { command } => run_config(command),
        Commands::Add {
            name,
            age,
            description,
            severity,
        } => {
            let mut state = open_state(memory).await?;
            commands::add(&mut state, name, age, description, severity, output).await
        }
        Commands::List => {
            let mut state = open_state(memory).await?;
            commands::list(&mut state, output).await
        }
        Commands::Delete { position, yes } => {
            let mut state = open_state(memory).await?;
            commands::delete(&mut state, position, yes, output).await
        }
        Commands::Clear { yes } => {
            let mut state = open_state(memory).await?;
            commands::clear(&mut state, yes, output).await
        }
        Commands::Watch => {
            let mut state = open_state(memory).await?;
            commands::watch(&mut state, output).await
        }
        Commands::Shell => {
            let mut state = open_state(memory).await?;
            commands::shell(&mut state, output).await
        }
    }
}
