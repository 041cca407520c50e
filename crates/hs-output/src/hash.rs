//! Content-based hashing for run IDs.

use hs_config::RunFile;
use sha2::{Digest, Sha256};

pub fn compute_run_id(run: &RunFile, engine_version: &str) -> String {
    let mut hasher = Sha256::new();

    let run_json = serde_json::to_string(run).unwrap_or_default();
    hasher.update(run_json.as_bytes());

    hasher.update(engine_version.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
