mod cli; // Console reports

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use log::{error, info, warn};

use minicluster_core::component::{ComponentId, ComponentRegistry};
use minicluster_core::config::{ConfigError, ConfigSource, parse_override};
use minicluster_core::kernel::Result as KernelResult;
use minicluster_core::kernel::constants::{APP_NAME, APP_VERSION};
use minicluster_core::orchestrator::{Orchestrator, OrchestratorSettings, Overrides};
use minicluster_core::DependencyResolver;

/// Exit code when a requested component failed to start
const EXIT_START_FAILED: u8 = 1;
/// Exit code for unknown dependencies, cycles and unreadable configuration
const EXIT_STRUCTURAL: u8 = 2;

/// minicluster: boot embedded data-infrastructure services in dependency order
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List registered components
    List,
    /// Print the start order for the given components
    Order {
        /// Identities to resolve, e.g. HIVESERVER2
        #[arg(required = true, value_parser = str::parse::<ComponentId>)]
        ids: Vec<ComponentId>,
    },
    /// Start components (and their dependencies), then stop them on Ctrl-C
    Start {
        /// Identities to start
        #[arg(required = true, value_parser = str::parse::<ComponentId>)]
        ids: Vec<ComponentId>,

        /// Configuration file (.properties, .json, .toml, .yaml); later files win
        #[arg(long)]
        config: Vec<PathBuf>,

        /// Override one setting, e.g. HIVESERVER2:hive.server2.port=30000
        #[arg(long = "set", value_name = "ID:KEY=VALUE", value_parser = parse_override)]
        overrides: Vec<(ComponentId, String, String)>,

        /// Per-component start timeout in seconds
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,

        /// Stop again right after starting instead of waiting for Ctrl-C
        #[arg(long)]
        no_wait: bool,

        /// Write the start and stop reports as JSON, one document per line
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // A logger may already be installed when embedded; that is fine
    let _ = env_logger::try_init();

    let args = CliArgs::parse();
    info!("{} v{}", APP_NAME, APP_VERSION);

    let registry = match build_registry() {
        Ok(registry) => Arc::new(registry),
        Err(e) => {
            eprintln!("Fatal: failed to register components: {}", e);
            return ExitCode::from(EXIT_STRUCTURAL);
        }
    };

    match args.command {
        Commands::List => {
            println!("Registered components:");
            report(cli::write_registry(&mut io::stdout(), &registry))
        }
        Commands::Order { ids } => match DependencyResolver::new(&registry).order(&ids) {
            Ok(order) => report(cli::write_order(&mut io::stdout(), &order)),
            Err(e) => {
                eprintln!("Error: {}", e);
                ExitCode::from(EXIT_STRUCTURAL)
            }
        },
        Commands::Start {
            ids,
            config,
            overrides,
            timeout,
            no_wait,
            json,
        } => {
            let source = match load_sources(&config) {
                Ok(source) => source,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::from(EXIT_STRUCTURAL);
                }
            };
            let mut settings = OrchestratorSettings::new();
            if let Some(secs) = timeout {
                settings = settings.with_start_timeout(Duration::from_secs(secs));
            }
            let orchestrator = Orchestrator::new(registry, source).with_settings(settings);
            let format = if json { ReportFormat::Json } else { ReportFormat::Text };
            start(&orchestrator, &ids, collect_overrides(overrides), no_wait, format).await
        }
    }
}

fn build_registry() -> KernelResult<ComponentRegistry> {
    let mut builder = ComponentRegistry::builder();
    core_hadoop::register(&mut builder)?;
    core_confluent::register(&mut builder)?;
    Ok(builder.build())
}

/// Merge the configuration files in command-line order.
fn load_sources(paths: &[PathBuf]) -> Result<ConfigSource, ConfigError> {
    let mut source = ConfigSource::new();
    for path in paths {
        source.merge(&ConfigSource::load(path)?);
    }
    Ok(source)
}

fn collect_overrides(assignments: Vec<(ComponentId, String, String)>) -> Overrides {
    let mut overrides = Overrides::new();
    for (id, key, value) in assignments {
        overrides.entry(id).or_default().insert(key, value);
    }
    overrides
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReportFormat {
    Text,
    Json,
}

async fn start(
    orchestrator: &Orchestrator,
    ids: &[ComponentId],
    overrides: Overrides,
    no_wait: bool,
    format: ReportFormat,
) -> ExitCode {
    let outcomes = match orchestrator.start_all(ids, &overrides).await {
        Ok(outcomes) => outcomes,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_STRUCTURAL);
        }
    };
    let written = match format {
        ReportFormat::Text => cli::write_start_report(&mut io::stdout(), &outcomes),
        ReportFormat::Json => cli::write_start_json(&mut io::stdout(), &outcomes),
    };
    let mut code = report(written);
    if !outcomes.is_success() {
        code = ExitCode::from(EXIT_START_FAILED);
    }

    if !no_wait && outcomes.successes().next().is_some() {
        eprintln!("Components are running. Press Ctrl-C to stop them.");
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C, stopping now: {}", e);
        }
    }

    let stopped = orchestrator.stop_all().await;
    if !stopped.is_success() {
        warn!("Some components did not stop cleanly");
    }
    let written = match format {
        ReportFormat::Text => cli::write_stop_report(&mut io::stdout(), &stopped),
        ReportFormat::Json => cli::write_stop_json(&mut io::stdout(), &stopped),
    };
    if let Err(e) = written {
        error!("Failed to write the stop report: {}", e);
    }
    code
}

fn report(written: io::Result<()>) -> ExitCode {
    match written {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Failed to write to stdout: {}", e);
            ExitCode::FAILURE
        }
    }
}
