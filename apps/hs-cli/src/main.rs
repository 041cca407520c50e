use clap::{Parser, Subcommand};
use hs_app::{AppResult, RunOptions, RunRequest, probe_eos, run_service};
use hs_eos::GasOptions;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hs-cli")]
#[command(about = "Hydrostatic initial-model builder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a run file and check that it compiles
    Validate {
        /// Path to the run file (YAML or JSON)
        run_path: PathBuf,
    },
    /// Build the model a run file describes and write its tables
    Build {
        /// Path to the run file (YAML or JSON)
        run_path: PathBuf,
        /// Directory for the .hse, .extras and manifest files
        #[arg(short, long, default_value = "runs")]
        output_dir: PathBuf,
        /// Rebuild even when an identical run is saved
        #[arg(long)]
        no_cache: bool,
    },
    /// List the runs saved in an output directory
    Runs {
        #[arg(default_value = "runs")]
        output_dir: PathBuf,
    },
    /// Evaluate the equation of state at one point
    Eos {
        /// Density [g/cc]
        #[arg(long)]
        density: f64,
        /// Temperature [K]
        #[arg(long)]
        temperature: f64,
        /// Mass fraction as KEY=X, e.g. C12=0.5 (repeatable)
        #[arg(long = "species", required = true)]
        species: Vec<String>,
        /// Include the ion-sphere Coulomb correction
        #[arg(long)]
        coulomb: bool,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { run_path } => cmd_validate(&run_path),
        Commands::Build {
            run_path,
            output_dir,
            no_cache,
        } => cmd_build(&run_path, &output_dir, !no_cache),
        Commands::Runs { output_dir } => cmd_runs(&output_dir),
        Commands::Eos {
            density,
            temperature,
            species,
            coulomb,
        } => cmd_eos(density, temperature, &species, coulomb),
    }
}

fn cmd_validate(run_path: &Path) -> AppResult<()> {
    println!("Validating run file: {}", run_path.display());
    let run = run_service::validate_run(run_path)?;
    println!("✓ {} ({}) is valid", run.name, run.model.kind());
    Ok(())
}

fn cmd_build(run_path: &Path, output_dir: &Path, use_cache: bool) -> AppResult<()> {
    info!(
        run = %run_path.display(),
        output_dir = %output_dir.display(),
        use_cache,
        "building model"
    );
    let request = RunRequest {
        run_path,
        output_dir,
        options: RunOptions {
            use_cache,
            ..RunOptions::default()
        },
    };
    let response = run_service::ensure_run(&request)?;
    let manifest = &response.manifest;

    if response.loaded_from_cache {
        println!("✓ Loaded from cache: {}", response.run_id);
    } else {
        println!(
            "✓ Model built: {} ({:.2} s)",
            response.run_id, response.elapsed_s
        );
    }
    println!("  Model: {}", manifest.model);
    println!("  Outer iterations: {}", manifest.outer_iterations);
    for control in &manifest.controls {
        println!("  {} = {:.6e}", control.name, control.value);
    }
    println!(
        "  Mass [Msun]: core {:.6}, envelope {:.6}, total {:.6}",
        manifest.masses_solar.core, manifest.masses_solar.envelope, manifest.masses_solar.total
    );
    println!("  Base index: {}", manifest.markers.base_index);
    if let Some(i) = manifest.markers.convective_index {
        println!("  Convective boundary: zone {i}");
    }
    if let Some(i) = manifest.markers.fluff_index {
        println!("  Fluff from: zone {i}");
    }
    println!(
        "  Max HSE error: {:.3e}",
        manifest.diagnostics.max_hse_error
    );
    if !manifest.diagnostics.regimes_monotone {
        println!("  Warning: regime order is not monotone");
    }
    println!(
        "  Wrote {} and {} to {}",
        manifest.files.profile,
        manifest.files.extras,
        response.output_dir.display()
    );
    Ok(())
}

fn cmd_runs(output_dir: &Path) -> AppResult<()> {
    let runs = run_service::list_runs(output_dir)?;
    if runs.is_empty() {
        println!("No runs in {}", output_dir.display());
        return Ok(());
    }
    for run in runs {
        println!(
            "  {} [{}] {} total {:.6} Msun ({})",
            run.name,
            run.model,
            &run.run_id[..12.min(run.run_id.len())],
            run.masses_solar.total,
            run.timestamp
        );
    }
    Ok(())
}

fn cmd_eos(density: f64, temperature: f64, species: &[String], coulomb: bool) -> AppResult<()> {
    let probe = probe_eos(
        density,
        temperature,
        species,
        GasOptions {
            coulomb_corrections: coulomb,
        },
    )?;
    let s = &probe.state;
    println!("rho = {:.6e} g/cc, T = {:.6e} K", s.rho, s.t);
    println!("abar = {:.6}, ye = {:.6}", probe.abar, probe.ye);
    println!("P   = {:.6e} erg/cc", s.p);
    println!("s   = {:.6e} erg/g/K", s.s);
    println!("cs  = {:.6e} cm/s", s.cs);
    println!("dP/drho = {:.6e}, dP/dT = {:.6e}", s.dpdr, s.dpdt);
    println!("ds/drho = {:.6e}, ds/dT = {:.6e}", s.dsdr, s.dsdt);
    Ok(())
}
