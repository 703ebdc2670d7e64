//! ddns-daddy - minimal GoDaddy dynamic DNS client.

use clap::{Parser, Subcommand};
use ddns_daddy::cache::IpCache;
use ddns_daddy::config::Config;
use ddns_daddy::detector::{IpDetector, PublicIpSource};
use ddns_daddy::engine::{Disposition, Outcome, SyncEngine};
use ddns_daddy::registrar::{target_name, GoDaddyClient, RegistrarClient};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ddns-daddy")]
#[command(about = "Keep GoDaddy A records pointed at this machine's public IP")]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one synchronization pass
    Sync {
        /// Reconcile even if the cached IP matches the current one
        #[arg(short, long)]
        force: bool,
    },

    /// Show current public IP and each record's remote value
    Status,

    /// Validate configuration and registrar credentials
    Validate,
}

fn get_config_path(cli_path: Option<PathBuf>) -> PathBuf {
    if let Some(path) = cli_path {
        return path;
    }

    // Default locations
    let candidates = [
        dirs::config_dir().map(|p| p.join("ddns-daddy/config.toml")),
        Some(PathBuf::from("/etc/ddns-daddy/config.toml")),
        Some(PathBuf::from("config.toml")),
    ];

    for candidate in candidates.into_iter().flatten() {
        if candidate.exists() {
            return candidate;
        }
    }

    // Return default even if it doesn't exist
    dirs::config_dir()
        .map(|p| p.join("ddns-daddy/config.toml"))
        .unwrap_or_else(|| PathBuf::from("config.toml"))
}

fn godaddy_client(config: &Config) -> GoDaddyClient {
    GoDaddyClient::new(
        config.registrar.resolved_api_key(),
        config.registrar.resolved_api_secret(),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config_path = get_config_path(cli.config);
    let config = Config::load_from(&config_path)?;

    match cli.command {
        Commands::Sync { force } => cmd_sync(config, force).await?,
        Commands::Status => cmd_status(config).await?,
        Commands::Validate => cmd_validate(config).await?,
    }

    Ok(())
}

async fn cmd_sync(config: Config, force: bool) -> anyhow::Result<()> {
    let detector = IpDetector::new(config.ip_services.clone());
    let cache = IpCache::new()?;
    let registrar = godaddy_client(&config);

    let engine = SyncEngine::new(
        Box::new(detector),
        cache,
        Box::new(registrar),
        config.targets(),
        config.registrar.ttl,
    );

    let report = engine.run(force).await?;

    println!("Current public IP: {}", report.current_ip);
    if let Some(prev) = report.previous_ip {
        println!("Last recorded IP:  {}", prev);
    }

    match report.outcome {
        Outcome::Unchanged => {
            println!("IP unchanged since last sync. Nothing to do.");
        }
        Outcome::Synced => {
            for target in &report.targets {
                match target.disposition {
                    Disposition::Updated => {
                        println!("  {}: updated -> {}", target.name(), report.current_ip)
                    }
                    Disposition::AlreadyCurrent => {
                        println!("  {}: already current", target.name())
                    }
                }
            }
            println!("Recorded {} as last synchronized IP.", report.current_ip);
        }
    }

    Ok(())
}

async fn cmd_status(config: Config) -> anyhow::Result<()> {
    let detector = IpDetector::new(config.ip_services.clone());
    let registrar = godaddy_client(&config);

    println!("ddns-daddy status");
    println!("=================\n");

    match detector.current_ipv4().await {
        Ok(ip) => println!("Current public IP: {}", ip),
        Err(e) => println!("Failed to detect IP: {}", e),
    }

    println!("\nRecords:");
    for (domain, subdomain) in config.targets() {
        print!("  {}: ", target_name(&domain, &subdomain));
        match registrar.get_record(&domain, &subdomain).await {
            Ok(Some(record)) => println!("{} (ttl {})", record.data, record.ttl),
            Ok(None) => println!("(no record)"),
            Err(e) => println!("error: {}", e),
        }
    }

    Ok(())
}

async fn cmd_validate(config: Config) -> anyhow::Result<()> {
    println!("Validating configuration...\n");

    let registrar = godaddy_client(&config);
    let mut all_valid = true;

    // One authenticated read per domain is enough to prove credentials
    // and domain ownership; records themselves may legitimately be absent.
    for (domain, subdomains) in &config.domains {
        let subdomain = subdomains.first().map(String::as_str).unwrap_or("@");
        print!("  {}: ", domain);

        match registrar.get_record(domain, subdomain).await {
            Ok(_) => println!("OK"),
            Err(e) => {
                println!("FAILED - {}", e);
                all_valid = false;
            }
        }
    }

    println!();

    if all_valid {
        println!("Configuration validated successfully.");
    } else {
        println!("Validation failed.");
        std::process::exit(1);
    }

    Ok(())
}
