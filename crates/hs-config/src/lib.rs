//! hs-config: run-file format and validation.

pub mod schema;
pub mod validate;

pub use schema::*;
pub use validate::{COMPOSITION_SUM_TOLERANCE, LATEST_VERSION, ValidationError, validate_run_file};

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn from_yaml_str(content: &str) -> ConfigResult<RunFile> {
    let run: RunFile = serde_yaml::from_str(content)?;
    validate_run_file(&run)?;
    Ok(run)
}

pub fn from_json_str(content: &str) -> ConfigResult<RunFile> {
    let run: RunFile = serde_json::from_str(content)?;
    validate_run_file(&run)?;
    Ok(run)
}

pub fn load_yaml(path: &std::path::Path) -> ConfigResult<RunFile> {
    from_yaml_str(&std::fs::read_to_string(path)?)
}

pub fn load_json(path: &std::path::Path) -> ConfigResult<RunFile> {
    from_json_str(&std::fs::read_to_string(path)?)
}

/// Load by extension: `.json` as JSON, anything else as YAML.
pub fn load(path: &std::path::Path) -> ConfigResult<RunFile> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        _ => load_yaml(path),
    }
}

pub fn save_yaml(path: &std::path::Path, run: &RunFile) -> ConfigResult<()> {
    validate_run_file(run)?;
    std::fs::write(path, serde_yaml::to_string(run)?)?;
    Ok(())
}

pub fn save_json(path: &std::path::Path, run: &RunFile) -> ConfigResult<()> {
    validate_run_file(run)?;
    std::fs::write(path, serde_json::to_string_pretty(run)?)?;
    Ok(())
}
