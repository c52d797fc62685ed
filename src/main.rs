//! wellperf - well performance analysis CLI
//!
//! # Usage
//!
//! ```bash
//! # Operating point of two curve files (JSON arrays of {rate, pressure})
//! wellperf intersect --inflow ipr.json --lift vlp.json
//!
//! # Recompute a casing program with pending edits
//! wellperf recalc --rows casing.json --kind casing --initial-top 0 --drafts edits.json
//!
//! # Diagnostics for a committed string
//! wellperf check-string --rows bha.json
//!
//! # Full fluid → inflow → lift run against the calculation services
//! wellperf analyze --session session.json --service-url http://calc:8000
//! ```
//!
//! # Environment Variables
//!
//! - `WELLPERF_CONFIG`: Path to the engine TOML config (default: ./wellperf.toml)
//! - `WELLPERF_SERVICE_URL`: Calculation service base URL override
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use wellperf::analysis::{AnalysisOrchestrator, AnalysisState, SensitivityParameter};
use wellperf::config::{self, EngineConfig};
use wellperf::types::{
    ComponentRow, DraftOverride, FluidInputs, InflowInputs, LiftInputs, Point, RowId,
    StringKind,
};
use wellperf::{
    find_operating_point, recalculate, validate_string, ComponentString, HttpCalculationClient,
    RecalcContext,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "wellperf")]
#[command(about = "Well performance analysis: operating points, string design, nodal analysis")]
#[command(version)]
struct CliArgs {
    /// Engine config file (overrides WELLPERF_CONFIG and ./wellperf.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Intersect an inflow curve with a lift curve
    Intersect {
        /// JSON array of inflow points
        #[arg(long)]
        inflow: PathBuf,
        /// JSON array of lift points
        #[arg(long)]
        lift: PathBuf,
    },

    /// Recompute component depths, applying optional draft edits
    Recalc {
        /// JSON array of component rows
        #[arg(long)]
        rows: PathBuf,
        /// casing or bha
        #[arg(long, default_value = "casing")]
        kind: StringKind,
        #[arg(long, default_value_t = 0.0)]
        initial_top: f64,
        /// JSON object of row id → partial edit
        #[arg(long)]
        drafts: Option<PathBuf>,
    },

    /// Report diameter and overlap problems in a component string
    CheckString {
        #[arg(long)]
        rows: PathBuf,
    },

    /// Run fluid properties, inflow and lift performance for a session file
    Analyze {
        #[arg(long)]
        session: PathBuf,
        /// Calculation service base URL
        #[arg(long, env = "WELLPERF_SERVICE_URL")]
        service_url: Option<String>,
    },
}

/// Inputs for `analyze`.
#[derive(Debug, Deserialize)]
struct SessionFile {
    #[serde(default)]
    inflow: InflowInputs,
    #[serde(default)]
    fluid: FluidInputs,
    #[serde(default)]
    lift: LiftInputs,
    string: ComponentString,
    /// Correlation methods to compare after the main run
    #[serde(default)]
    compare: Vec<String>,
    #[serde(default)]
    sensitivity: Option<SensitivitySweep>,
}

#[derive(Debug, Deserialize)]
struct SensitivitySweep {
    parameter: SensitivityParameter,
    values: Vec<f64>,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ============================================================================
// Subcommands
// ============================================================================

fn run_intersect(inflow: &Path, lift: &Path) -> Result<()> {
    let inflow: Vec<Point> = read_json(inflow)?;
    let lift: Vec<Point> = read_json(lift)?;

    match find_operating_point(&inflow, &lift)? {
        Some(op) => {
            info!(%op, "operating point found");
            print_json(&op)
        }
        None => {
            warn!("curves do not intersect");
            print_json(&serde_json::Value::Null)
        }
    }
}

fn run_recalc(
    rows: &Path,
    kind: StringKind,
    initial_top: f64,
    drafts: Option<&Path>,
) -> Result<()> {
    let rows: Vec<ComponentRow> = read_json(rows)?;
    let drafts: HashMap<RowId, DraftOverride> = match drafts {
        Some(path) => read_json(path)?,
        None => HashMap::new(),
    };

    let out = recalculate(&rows, initial_top, &drafts, &RecalcContext::new(kind));
    for message in validate_string(&out) {
        warn!("{}", message);
    }
    print_json(&out)
}

fn run_check_string(rows: &Path) -> Result<()> {
    let rows: Vec<ComponentRow> = read_json(rows)?;
    let messages = validate_string(&rows);
    if messages.is_empty() {
        info!(rows = rows.len(), "component string is valid");
        return Ok(());
    }
    for message in &messages {
        println!("{message}");
    }
    bail!("{} problem(s) found", messages.len())
}

async fn run_analyze(session: &Path, service_url: Option<String>, cfg: EngineConfig) -> Result<()> {
    let session: SessionFile = read_json(session)?;

    let mut services = cfg.services.clone();
    if let Some(url) = service_url {
        services.base_url = url;
    }
    let client = HttpCalculationClient::from_config(&services)
        .context("Failed to build calculation service client")?;
    info!(base_url = %client.base_url(), "using calculation services");

    let orchestrator = AnalysisOrchestrator::from_client(client).with_config(cfg);
    let mut state = AnalysisState::new(session.inflow, session.fluid.clone(), session.lift.clone());

    let mut string = session.string;
    string.commit();
    for message in string.validate() {
        warn!("{}", message);
    }
    let geometry = string.geometry();

    orchestrator
        .calculate_fluid_properties(&mut state, session.fluid)
        .await
        .context("Fluid property calculation failed")?;
    orchestrator
        .calculate_lift_performance_curve(&mut state, session.lift, &geometry)
        .await
        .context("Lift performance calculation failed")?;

    match state.operating_point {
        Some(op) => info!(%op, "operating point"),
        None => warn!("inflow and lift curves do not intersect"),
    }

    if !session.compare.is_empty() {
        orchestrator
            .run_correlation_comparison(&mut state, &session.compare, &geometry, |pct| {
                info!(progress = pct, "correlation comparison");
            })
            .await?;
    }

    if let Some(sweep) = session.sensitivity {
        orchestrator
            .run_sensitivity_analysis(&mut state, sweep.parameter, &sweep.values, &geometry)
            .await?;
    }

    print_json(&state)
}

// ============================================================================
// Main
// ============================================================================

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let cfg = match path {
        Some(p) => EngineConfig::load_from_file(p)
            .with_context(|| format!("Failed to load config {}", p.display()))?,
        None => EngineConfig::load(),
    };
    config::init(cfg.clone());
    Ok(cfg)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let cfg = load_config(args.config.as_deref())?;

    match args.command {
        SubCommand::Intersect { inflow, lift } => run_intersect(&inflow, &lift),
        SubCommand::Recalc {
            rows,
            kind,
            initial_top,
            drafts,
        } => run_recalc(&rows, kind, initial_top, drafts.as_deref()),
        SubCommand::CheckString { rows } => run_check_string(&rows),
        SubCommand::Analyze {
            session,
            service_url,
        } => run_analyze(&session, service_url, cfg).await,
    }
}
