use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use leaf_core::{load_view_config, MeasurementTable, SessionContext};
use leaf_runtime::{InfrastructureFile, InfrastructureTimeline};
use tracing::info;

mod app;

use app::InspectorApp;

#[derive(Parser, Debug)]
#[command(author, version, about = "LEAF viewer trigger inspector", long_about = None)]
struct Cli {
    /// Infrastructure JSON with one topology slice per time key.
    #[arg(long, required_unless_present = "print_schema")]
    topology: Option<PathBuf>,
    /// JSON array of power measurement records.
    #[arg(long, required_unless_present = "print_schema")]
    measurements: Option<PathBuf>,
    /// View configuration; defaults to LEAF_VIEW_CONFIG_PATH or the builtin copy.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Trigger script, one trigger per line. Reads stdin when omitted.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Include assembled chart figures in every record.
    #[arg(long)]
    charts: bool,
    /// Print a session summary (time keys, filter types, dropdown options) first.
    #[arg(long)]
    describe: bool,
    #[arg(long)]
    pretty: bool,
    /// Print the JSON schema of the infrastructure file and exit.
    #[arg(long)]
    print_schema: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.print_schema {
        let schema = InfrastructureFile::json_schema();
        serde_json::to_writer_pretty(&mut out, &schema)?;
        writeln!(out)?;
        return Ok(());
    }

    let topology_path = cli
        .topology
        .as_deref()
        .ok_or_else(|| eyre!("--topology is required"))?;
    let measurements_path = cli
        .measurements
        .as_deref()
        .ok_or_else(|| eyre!("--measurements is required"))?;

    let topology = InfrastructureTimeline::from_file(topology_path)
        .wrap_err_with(|| format!("loading topology {}", topology_path.display()))?;
    let measurements = MeasurementTable::from_file(measurements_path)
        .wrap_err_with(|| format!("loading measurements {}", measurements_path.display()))?;
    let (config, _metadata) = load_view_config(cli.config.as_deref());
    info!(
        slices = topology.len(),
        elements = measurements.len(),
        "inspector.loaded"
    );

    let context = SessionContext::new(Arc::new(topology), Arc::new(measurements), config);
    let mut inspector = InspectorApp::new(context, cli.charts, cli.pretty);

    if cli.describe {
        inspector.describe(&mut out)?;
    }

    let input: Box<dyn BufRead> = match &cli.script {
        Some(path) => Box::new(BufReader::new(
            File::open(path).wrap_err_with(|| format!("opening script {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };
    let summary = inspector.run(input, &mut out)?;
    info!(
        applied = summary.applied,
        rejected = summary.rejected,
        "inspector.finished"
    );
    Ok(())
}
