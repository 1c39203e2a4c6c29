use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tunedctl::{config, Config, TunedClient};

#[derive(Parser)]
#[command(name = "tunedctl")]
#[command(author, version, about = "Control the tuned system tuning daemon", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available profiles and mark the active one
    List,

    /// Show the active profile
    Active,

    /// Switch to a profile
    Profile {
        /// Profile name (e.g., "balanced", "powersave")
        name: String,
    },

    /// Switch to the recommended profile
    AutoProfile,

    /// Show the recommended profile
    Recommend,

    /// Verify that system settings match the active profile
    Verify,

    /// Turn off all tuning
    Off,

    /// Check whether tuning is running
    Running,

    /// Manage the tuned systemd unit
    Service {
        #[command(subcommand)]
        action: ServiceAction,
    },

    /// Configure settings
    Config {
        /// Set the systemd unit to manage (e.g., "tuned.service")
        #[arg(long)]
        unit: Option<String>,

        /// Start the unit automatically before daemon calls (true/false)
        #[arg(long)]
        autostart: Option<bool>,

        /// Set how many status checks to make after starting the unit
        #[arg(long)]
        poll_attempts: Option<u32>,

        /// Set the pause between status checks in milliseconds
        #[arg(long)]
        poll_interval_ms: Option<u64>,

        /// Set the log level (trace, debug, info, warn, error)
        #[arg(long)]
        log_level: Option<String>,

        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand)]
enum ServiceAction {
    /// Show the unit's active state
    Status,
    /// Start the unit
    Start,
    /// Stop the unit
    Stop,
}

fn init_logging(verbose: bool, level: &str) {
    let filter = if verbose {
        EnvFilter::new("tunedctl=debug,zbus=info")
    } else {
        EnvFilter::new(format!("tunedctl={},zbus=warn", level.to_lowercase()))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    init_logging(cli.verbose, &config.logging.level);
    debug!(unit = %config.service.unit, "configuration loaded");

    let client = TunedClient::system(&config);

    match cli.command {
        Commands::List => {
            let profiles = client.profiles().await?;
            let active = client.active_profile().await?;
            println!("Available profiles:");
            for profile in &profiles {
                let marker = if *profile == active { "*" } else { " " };
                println!("{} {}", marker, profile);
            }
            println!("Current active profile: {}", active);
        }

        Commands::Active => {
            println!("Current active profile: {}", client.active_profile().await?);
        }

        Commands::Profile { name } => {
            client.switch_profile(&name).await?;
            println!("Switched to profile: {}", name);
        }

        Commands::AutoProfile => {
            client.auto_profile().await?;
            println!("Switched to recommended profile");
        }

        Commands::Recommend => {
            println!("{}", client.recommend_profile().await?);
        }

        Commands::Verify => {
            if client.verify_profile().await? {
                println!("Verification succeeded, current system settings match the profile");
            } else {
                anyhow::bail!(
                    "Verification failed, current system settings differ from the profile"
                );
            }
        }

        Commands::Off => {
            client.disable().await?;
            println!("Tuning disabled");
        }

        Commands::Running => {
            let running = client.is_running().await?;
            println!("Running: {}", if running { "yes" } else { "no" });
        }

        Commands::Service { action } => match action {
            ServiceAction::Status => {
                println!("{}", client.service_status().await?);
            }
            ServiceAction::Start => {
                client.service_start().await?;
                println!("Start requested for {}", client.unit());
            }
            ServiceAction::Stop => {
                client.service_stop().await?;
                println!("Stop requested for {}", client.unit());
            }
        },

        Commands::Config {
            unit,
            autostart,
            poll_attempts,
            poll_interval_ms,
            log_level,
            show,
        } => {
            if show {
                config::show()?;
            } else {
                config::update(config::ConfigUpdate {
                    unit,
                    autostart,
                    poll_attempts,
                    poll_interval_ms,
                    log_level,
                })?;
            }
        }
    }

    Ok(())
}
