// # zonesync - Zone Sync CLI
//
// A THIN integration layer: it reads configuration, installs logging,
// registers providers and hands zones or plans to them. Translation,
// caching and change logic live in the library crates.
//
// ## Modes
//
// - Dump (default): populate every configured zone and print it as JSON
// - Apply: read a plan from `ZONESYNC_PLAN_PATH` and apply it
//
// ## Configuration
//
// Either a JSON file:
// - `ZONESYNC_CONFIG`: Path to a `SyncConfig` JSON file
//
// or environment variables:
// - `ZONESYNC_PROJECT_ID`: Cloud project owning the managed zones
// - `ZONESYNC_ACCESS_TOKEN`: OAuth2 bearer token
// - `ZONESYNC_ZONES`: Comma-separated absolute zone names
// - `ZONESYNC_ENDPOINT`: API base URL override (optional)
// - `ZONESYNC_TIMEOUT_SECS`: Per-request timeout (optional, default 30)
// - `ZONESYNC_DRY_RUN`: `true` to log writes instead of sending them
//
// Always read from the environment:
// - `ZONESYNC_PLAN_PATH`: Plan JSON file to apply (optional)
// - `ZONESYNC_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export ZONESYNC_PROJECT_ID=my-project
// export ZONESYNC_ACCESS_TOKEN="$(gcloud auth print-access-token)"
// export ZONESYNC_ZONES=example.com.,example.net.
//
// zonesync > zones.json
// ZONESYNC_PLAN_PATH=plan.json zonesync
// ```

use anyhow::{Context, Result};
use std::env;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;
use zonesync_core::{Plan, ProviderConfig, ProviderRegistry, SyncConfig, Zone};

/// Exit codes for different termination scenarios
///
/// - 0: Success
/// - 1: Configuration or startup error
/// - 2: Runtime error (remote API, translation, plan)
#[derive(Debug, Clone, Copy)]
enum ZonesyncExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<ZonesyncExitCode> for ExitCode {
    fn from(code: ZonesyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    sync: SyncConfig,
    plan_path: Option<String>,
    log_level: String,
}

impl Config {
    /// Load configuration from the environment, or from the file it names
    fn from_env() -> Result<Self> {
        let sync = match env::var("ZONESYNC_CONFIG") {
            Ok(path) => SyncConfig::from_file(&path)
                .with_context(|| format!("Failed to load ZONESYNC_CONFIG {}", path))?,
            Err(_) => Self::sync_from_env()?,
        };

        Ok(Self {
            sync,
            plan_path: env::var("ZONESYNC_PLAN_PATH").ok().filter(|p| !p.is_empty()),
            log_level: env::var("ZONESYNC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    fn sync_from_env() -> Result<SyncConfig> {
        let timeout_secs = match env::var("ZONESYNC_TIMEOUT_SECS") {
            Ok(s) => s
                .parse()
                .with_context(|| format!("ZONESYNC_TIMEOUT_SECS is not a number: {}", s))?,
            Err(_) => 30,
        };

        let provider = ProviderConfig::GoogleDns {
            project_id: env::var("ZONESYNC_PROJECT_ID").context(
                "ZONESYNC_PROJECT_ID is required. Set it via: export ZONESYNC_PROJECT_ID=my-project",
            )?,
            access_token: env::var("ZONESYNC_ACCESS_TOKEN")
                .context("ZONESYNC_ACCESS_TOKEN is required")?,
            endpoint: env::var("ZONESYNC_ENDPOINT").ok().filter(|e| !e.is_empty()),
            timeout_secs,
            dry_run: env::var("ZONESYNC_DRY_RUN")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        };

        let mut sync = SyncConfig::new(provider);
        sync.zones = env::var("ZONESYNC_ZONES")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Ok(sync)
    }

    fn validate(&self) -> Result<()> {
        self.sync.validate()?;

        if let ProviderConfig::GoogleDns {
            endpoint: Some(url),
            ..
        } = &self.sync.provider
        {
            if !url.starts_with("https://") && !url.starts_with("http://") {
                anyhow::bail!("Provider endpoint must use HTTP or HTTPS scheme. Got: {}", url);
            }
            if url.starts_with("http://") {
                eprintln!(
                    "WARNING: provider endpoint uses HTTP (not HTTPS). \
                    The access token will be sent in clear text."
                );
            }
        }

        if self.log_level_filter().is_none() {
            anyhow::bail!(
                "ZONESYNC_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            );
        }

        Ok(())
    }

    fn log_level_filter(&self) -> Option<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Some(Level::TRACE),
            "debug" => Some(Level::DEBUG),
            "info" => Some(Level::INFO),
            "warn" => Some(Level::WARN),
            "error" => Some(Level::ERROR),
            _ => None,
        }
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return ZonesyncExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return ZonesyncExitCode::ConfigError.into();
    }

    // Logs go to stderr so stdout stays parseable JSON
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level_filter().unwrap_or(Level::INFO))
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return ZonesyncExitCode::ConfigError.into();
    }

    info!(
        "Starting zonesync: provider={}, {} zone(s)",
        config.sync.provider.type_name(),
        config.sync.zones.len()
    );

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return ZonesyncExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        if let Err(e) = run(config).await {
            error!("zonesync failed: {:#}", e);
            ZonesyncExitCode::RuntimeError
        } else {
            ZonesyncExitCode::Success
        }
    })
    .into()
}

fn registry() -> ProviderRegistry {
    let registry = ProviderRegistry::new();

    #[cfg(feature = "googledns")]
    zonesync_provider_googledns::register(&registry);

    registry
}

async fn run(config: Config) -> Result<()> {
    let registry = registry();
    let mut provider = registry
        .create_provider(&config.sync.provider)
        .context("Failed to create zone provider")?;

    match &config.plan_path {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read plan {}", path))?;
            let plan: Plan = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse plan {}", path))?;

            if !config.sync.zones.contains(&plan.zone) {
                warn!("Plan targets {}, which is not a configured zone", plan.zone);
            }

            let report = provider.apply(&plan).await?;
            info!(
                "Applied plan for {}: {} changes, {} writes",
                plan.zone, report.changes, report.writes
            );
        }
        None => {
            let mut zones = Vec::with_capacity(config.sync.zones.len());
            for name in &config.sync.zones {
                let mut zone = Zone::new(name.as_str())?;
                provider.populate(&mut zone).await?;
                zones.push(zone);
            }
            println!("{}", serde_json::to_string_pretty(&zones)?);
        }
    }

    Ok(())
}
