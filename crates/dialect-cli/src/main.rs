//! Dialect command-line interface.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dialect_backend::{BackendConfig, NgspiceBackend, SpiceBackend, XyceBackend};
use dialect_convert::{convert, MacromodelDefaults};
use dialect_core::{netlist, AcGainParams, Circuit, Component};
use dialect_model::analyze_file;
use dialect_router::SimulatorManager;

#[derive(Parser)]
#[command(name = "dialect")]
#[command(about = "SPICE model compatibility analysis, conversion and backend routing", long_about = None)]
#[command(version)]
struct Cli {
    /// Verbose logging (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a vendor model file and report backend compatibility
    Analyze {
        /// Model file (.lib, .cir, .sub)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Emit the full metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Convert an incompatible model to a solver-safe macromodel
    Convert {
        /// Model file to convert
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path (default: <NAME>_SIMPLE.lib next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run an AC gain measurement of a non-inverting op-amp stage built
    /// around the given model, routed to a compatible solver
    Gain {
        /// Op-amp model file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Feedback resistor R1 (Vout to Vminus), ohms
        #[arg(long, default_value_t = 90e3)]
        r1: f64,

        /// Ground leg resistor R2, ohms
        #[arg(long, default_value_t = 10e3)]
        r2: f64,

        /// Measurement frequency in Hz
        #[arg(long, default_value_t = 1e3)]
        freq: f64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Analyze { file, json } => cmd_analyze(&file, json),
        Command::Convert { file, output } => cmd_convert(&file, output.as_deref()),
        Command::Gain { file, r1, r2, freq } => cmd_gain(&file, r1, r2, freq),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn cmd_analyze(file: &Path, json: bool) -> Result<()> {
    let meta = analyze_file(file)
        .with_context(|| format!("failed to analyze {}", file.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&meta)?);
        return Ok(());
    }

    println!("{}", meta.summary());
    println!("  vendor:   {}", meta.vendor);
    println!("  category: {}", meta.category);
    match meta.recommended_backend {
        Some(backend) => println!("  backend:  {}", backend),
        None => println!("  backend:  none (model cannot be simulated as-is)"),
    }
    println!("  score:    {:.1}", meta.compatibility_score);
    if !meta.subcircuit_names.is_empty() {
        println!("  subckts:  {}", meta.subcircuit_names.join(", "));
    }
    for warning in &meta.warnings {
        println!("  warning:  {warning}");
    }
    Ok(())
}

fn cmd_convert(file: &Path, output: Option<&Path>) -> Result<()> {
    let meta = analyze_file(file)
        .with_context(|| format!("failed to analyze {}", file.display()))?;
    let text = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let conversion = convert(
        &meta,
        &text,
        &Circuit::new("conversion"),
        &MacromodelDefaults::default(),
    );
    let Some(block) = conversion.block else {
        println!(
            "{}: already standard SPICE, no conversion needed",
            file.display()
        );
        return Ok(());
    };

    for warning in &conversion.warnings {
        eprintln!("warning: {warning}");
    }

    let path = match output {
        Some(path) => path.to_path_buf(),
        None => file.with_file_name(format!("{}.lib", block.subckt_name)),
    };
    fs::write(&path, &block.spice_text)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!(
        "wrote {} (A0={:.0}, GBW={:.0} Hz, pole={:.1} Hz)",
        path.display(),
        block.a0,
        block.gbw_hz,
        block.pole_hz
    );
    Ok(())
}

fn cmd_gain(file: &Path, r1: f64, r2: f64, freq: f64) -> Result<()> {
    let meta = analyze_file(file)
        .with_context(|| format!("failed to analyze {}", file.display()))?;
    let text = fs::read_to_string(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let Some(model_name) = meta.subcircuit_names.first() else {
        bail!("{} declares no subcircuit to instantiate", file.display());
    };

    let mut manager = SimulatorManager::new();
    for backend in solver_adapters() {
        if backend.is_available() {
            manager.register(backend);
        }
    }

    let mut circuit = netlist::non_inverting_stage(r1, r2, model_name);
    circuit.add_model_block(&text);
    circuit.add(Component::dc_voltage("VCC1", "VCC", "0", 15.0))?;
    circuit.add(Component::dc_voltage("VEE1", "VEE", "0", -15.0))?;

    let params = AcGainParams {
        freq_hz: freq,
        output_net: "Vout".into(),
    };
    let gain = manager.run_ac_gain(&circuit, &params, Some(&text))?;

    println!("gain at {freq} Hz: {:.2} dB", gain.magnitude_db);
    println!("phase:           {:.2} deg", gain.phase_deg);
    println!("ideal (1+R1/R2): {:.2} dB", 20.0 * (1.0 + r1 / r2).log10());
    Ok(())
}

fn solver_adapters() -> Vec<Box<dyn SpiceBackend>> {
    vec![
        Box::new(NgspiceBackend::new(BackendConfig::ngspice())),
        Box::new(XyceBackend::new(BackendConfig::xyce())),
    ]
}
