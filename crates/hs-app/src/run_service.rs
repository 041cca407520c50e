//! Run execution and caching service.

use hs_config::RunFile;
use hs_eos::ThresholdUrcaRates;
use hs_model::{ModelError, ModelOutcome, build_model};
use hs_output::{
    ControlValue, DiagnosticSummary, MarkerSummary, MassSummary, RunManifest, RunStore,
};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

use crate::compile::compile_run;
use crate::error::{AppError, AppResult};

/// Options for running a model.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Reuse the saved run when its id matches.
    pub use_cache: bool,
    pub engine_version: String,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            use_cache: true,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Request to execute a run.
pub struct RunRequest<'a> {
    pub run_path: &'a Path,
    pub output_dir: &'a Path,
    pub options: RunOptions,
}

#[derive(Debug, Clone)]
pub struct RunResponse {
    pub run_id: String,
    pub manifest: RunManifest,
    pub loaded_from_cache: bool,
    pub output_dir: PathBuf,
    pub elapsed_s: f64,
}

/// Manifests saved in an output directory, sorted by run name.
pub fn list_runs(output_dir: &Path) -> AppResult<Vec<RunManifest>> {
    if !output_dir.exists() {
        return Ok(Vec::new());
    }
    Ok(RunStore::new(output_dir.to_path_buf())?.list_runs()?)
}

/// Load a run file and check that it compiles, without running it.
pub fn validate_run(run_path: &Path) -> AppResult<RunFile> {
    let run = load_run_file(run_path)?;
    compile_run(&run)?;
    Ok(run)
}

fn load_run_file(path: &Path) -> AppResult<RunFile> {
    if !path.exists() {
        return Err(AppError::RunFileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        });
    }
    Ok(hs_config::load(path)?)
}

/// Execute a run, or load it when an identical one is already saved.
pub fn ensure_run(request: &RunRequest) -> AppResult<RunResponse> {
    let started = Instant::now();

    let run = load_run_file(request.run_path)?;
    let run_id = hs_output::compute_run_id(&run, &request.options.engine_version);
    let store = RunStore::new(request.output_dir.to_path_buf())?;

    if request.options.use_cache && store.has_run(&run.name) {
        let manifest = store.load_manifest(&run.name)?;
        if manifest.run_id == run_id {
            info!(name = %run.name, run_id = %run_id, "loaded cached run");
            return Ok(RunResponse {
                run_id,
                manifest,
                loaded_from_cache: true,
                output_dir: store.root_dir().to_path_buf(),
                elapsed_s: started.elapsed().as_secs_f64(),
            });
        }
    }

    let compiled = compile_run(&run)?;
    let rates = ThresholdUrcaRates::na23_ne23();
    let outcome = match build_model(&compiled.eos, &rates, &compiled.settings, &compiled.variant)
    {
        Ok(outcome) => outcome,
        Err(ModelError::DegenerateMass { region, profile }) => {
            let dump = store.save_zero_mass(&run.name, &profile)?;
            warn!(region = %region, dump = %dump.display(), "degenerate mass, profile saved");
            return Err(AppError::DegenerateMass { region, dump });
        }
        Err(err) => return Err(err.into()),
    };

    let manifest = build_manifest(&run, run_id.clone(), &request.options, &outcome);
    store.save_run(&manifest, &outcome.profile)?;

    let elapsed_s = started.elapsed().as_secs_f64();
    info!(
        name = %run.name,
        model = compiled.variant.name(),
        elapsed_s,
        "run completed"
    );

    Ok(RunResponse {
        run_id,
        manifest,
        loaded_from_cache: false,
        output_dir: store.root_dir().to_path_buf(),
        elapsed_s,
    })
}

fn build_manifest(
    run: &RunFile,
    run_id: String,
    options: &RunOptions,
    outcome: &ModelOutcome,
) -> RunManifest {
    RunManifest {
        run_id,
        name: run.name.clone(),
        model: run.model.kind().to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        engine_version: options.engine_version.clone(),
        outer_iterations: outcome.outer_iterations,
        controls: outcome
            .controls
            .iter()
            .map(|(name, value)| ControlValue {
                name: name.clone(),
                value: *value,
            })
            .collect(),
        masses_solar: MassSummary::from(outcome.masses),
        markers: MarkerSummary::from(outcome.profile.markers()),
        diagnostics: DiagnosticSummary::from(outcome.diagnostics),
        files: RunStore::files_for(&run.name),
    }
}
