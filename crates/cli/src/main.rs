//! UniCred Admin Registry Command Line Interface
//!
//! Deploys the admin registry store, performs the one-time initialization,
//! reassigns the college admin and queries both admin identities.

mod artifacts;
mod settings;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ed25519_dalek::SigningKey;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use unicred_admin_registry::{
    AdminRegistry, RegistryCall, RegistryStore, SignedCall, SledRegistryStore,
};
use unicred_types::Address;

use crate::settings::AdminConfig;

#[derive(Parser)]
#[command(name = "unicred-admin")]
#[command(about = "UniCred Admin Registry Command Line Interface", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Registry data directory (overrides configuration)
    #[arg(long, global = true, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new Ed25519 admin keypair
    Keygen {
        /// Output directory for keys
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Key name/prefix
        #[arg(short, long, default_value = "admin")]
        name: String,
    },

    /// Create a new registry owned by the key's address
    Deploy {
        /// Creator private key file
        #[arg(long, value_name = "PATH")]
        key: PathBuf,

        /// Initialize right after deployment
        #[arg(long)]
        init: bool,

        #[arg(long)]
        platform_admin: Option<Address>,

        #[arg(long)]
        college_admin: Option<Address>,
    },

    /// Set both admins (creator only, once)
    Initialize {
        /// Creator private key file
        #[arg(long, value_name = "PATH")]
        key: PathBuf,

        #[arg(long)]
        platform_admin: Option<Address>,

        #[arg(long)]
        college_admin: Option<Address>,
    },

    /// Reassign the college admin (platform admin only)
    UpdateCollegeAdmin {
        /// Platform admin private key file
        #[arg(long, value_name = "PATH")]
        key: PathBuf,

        #[arg(long)]
        new_admin: Address,
    },

    /// Print the platform admin address
    PlatformAdmin,

    /// Print the college admin address
    CollegeAdmin,

    /// Print the full registry state as JSON
    Show,

    /// Check whether an address is the current college admin
    VerifyCollegeAdmin {
        address: Address,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AdminConfig::load(cli.config.as_deref())?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    init_logging(&config)?;

    match cli.command {
        Commands::Keygen { output, name } => {
            let (private_path, address) = artifacts::generate_keypair(&output, &name)?;
            println!("✓ Keypair generated");
            println!("  Private key: {}", private_path.display());
            println!("  Address:     {address}");
        }
        Commands::Deploy {
            key,
            init,
            platform_admin,
            college_admin,
        } => {
            let signing_key = artifacts::load_signing_key(&key)?;
            let registry = deploy_registry(&config, &signing_key)?;
            println!("✓ Registry deployed");
            println!("  Creator:  {}", registry.creator());
            println!("  Data dir: {}", config.data_dir.display());

            if init {
                let call = initialize_call(&config, platform_admin, college_admin)?;
                registry
                    .submit(&SignedCall::sign(&signing_key, call)?)
                    .context("Initialization failed")?;
                println!("✓ Registry initialized");
                write_deployment_info(&config, &registry)?;
            }
        }
        Commands::Initialize {
            key,
            platform_admin,
            college_admin,
        } => {
            let signing_key = artifacts::load_signing_key(&key)?;
            let registry = open_registry(&config)?;
            let call = initialize_call(&config, platform_admin, college_admin)?;
            registry
                .submit(&SignedCall::sign(&signing_key, call)?)
                .context("Initialization failed")?;
            println!("✓ Registry initialized");
            write_deployment_info(&config, &registry)?;
        }
        Commands::UpdateCollegeAdmin { key, new_admin } => {
            let signing_key = artifacts::load_signing_key(&key)?;
            let registry = open_registry(&config)?;
            registry
                .submit(&SignedCall::sign(
                    &signing_key,
                    RegistryCall::UpdateCollegeAdmin { new_admin },
                )?)
                .context("College admin update failed")?;
            println!("✓ College admin is now {new_admin}");
            write_deployment_info(&config, &registry)?;
        }
        Commands::PlatformAdmin => {
            println!("{}", open_registry(&config)?.get_platform_admin()?);
        }
        Commands::CollegeAdmin => {
            println!("{}", open_registry(&config)?.get_college_admin()?);
        }
        Commands::Show => {
            let registry = open_registry(&config)?;
            let snapshot = serde_json::json!({
                "creator": registry.creator(),
                "state": registry.snapshot(),
            });
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Commands::VerifyCollegeAdmin { address } => {
            let is_admin = open_registry(&config)?.is_college_admin(&address);
            println!("{is_admin}");
            if !is_admin {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Create the store and record the deployment before anything else can fail.
fn deploy_registry(
    config: &AdminConfig,
    signing_key: &SigningKey,
) -> Result<AdminRegistry<SledRegistryStore>> {
    let creator = Address::from_public_key(&signing_key.verifying_key());
    let store = SledRegistryStore::deploy(&config.data_dir, creator)
        .with_context(|| format!("Failed to deploy at {}", config.data_dir.display()))?;
    let registry = AdminRegistry::new(store)?;
    write_deployment_info(config, &registry)?;
    Ok(registry)
}

fn open_registry(config: &AdminConfig) -> Result<AdminRegistry<SledRegistryStore>> {
    let store = SledRegistryStore::open(&config.data_dir).with_context(|| {
        format!(
            "Failed to open admin registry at {}",
            config.data_dir.display()
        )
    })?;
    Ok(AdminRegistry::new(store)?)
}

fn initialize_call(
    config: &AdminConfig,
    platform_admin: Option<Address>,
    college_admin: Option<Address>,
) -> Result<RegistryCall> {
    let platform_admin = platform_admin
        .or(config.platform_admin)
        .context("No platform admin given (use --platform-admin or UNICRED_PLATFORM_ADMIN)")?;
    let college_admin = college_admin
        .or(config.college_admin)
        .context("No college admin given (use --college-admin or UNICRED_COLLEGE_ADMIN)")?;
    Ok(RegistryCall::Initialize {
        platform_admin,
        college_admin,
    })
}

fn write_deployment_info<S: RegistryStore>(
    config: &AdminConfig,
    registry: &AdminRegistry<S>,
) -> Result<()> {
    let info = artifacts::render_deployment_info(
        &registry.creator(),
        &registry.snapshot(),
        &config.data_dir,
    );
    fs::write(&config.deployment_info, info).with_context(|| {
        format!(
            "Failed to write deployment info to {}",
            config.deployment_info.display()
        )
    })?;
    info!(path = %config.deployment_info.display(), "Deployment info saved");
    Ok(())
}

fn init_logging(config: &AdminConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.log_format == "pretty" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(())
}
