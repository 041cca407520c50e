//! Run storage: profile tables and manifests side by side in one directory.

use crate::types::{OutputFiles, RunManifest};
use crate::writer::{write_extras, write_profile};
use crate::{OutputError, OutputResult};
use hs_model::Profile;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Clone, Debug)]
pub struct RunStore {
    root_dir: PathBuf,
}

impl RunStore {
    pub fn new(root_dir: PathBuf) -> OutputResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn files_for(name: &str) -> OutputFiles {
        OutputFiles {
            profile: format!("{name}.hse"),
            extras: format!("{name}.extras"),
        }
    }

    fn manifest_path(&self, name: &str) -> PathBuf {
        self.root_dir.join(format!("{name}.manifest.json"))
    }

    pub fn has_run(&self, name: &str) -> bool {
        self.manifest_path(name).exists()
    }

    /// Write both tables, then the manifest naming them.
    pub fn save_run(&self, manifest: &RunManifest, profile: &Profile) -> OutputResult<()> {
        self.write_table(&manifest.files.profile, |out| write_profile(profile, out))?;
        self.write_table(&manifest.files.extras, |out| write_extras(profile, out))?;

        let manifest_json = serde_json::to_string_pretty(manifest)?;
        fs::write(self.manifest_path(&manifest.name), manifest_json)?;

        info!(
            name = %manifest.name,
            run_id = %manifest.run_id,
            dir = %self.root_dir.display(),
            "run saved"
        );
        Ok(())
    }

    /// Dump a profile whose measured mass vanished, for post-mortem inspection.
    pub fn save_zero_mass(&self, name: &str, profile: &Profile) -> OutputResult<PathBuf> {
        let file = format!("{name}.zero_mass.hse");
        self.write_table(&file, |out| write_profile(profile, out))?;
        Ok(self.root_dir.join(file))
    }

    pub fn load_manifest(&self, name: &str) -> OutputResult<RunManifest> {
        let path = self.manifest_path(name);
        if !path.exists() {
            return Err(OutputError::RunNotFound {
                name: name.to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn list_runs(&self) -> OutputResult<Vec<RunManifest>> {
        let mut runs = Vec::new();
        for entry in fs::read_dir(&self.root_dir)? {
            let file_name = entry?.file_name().to_string_lossy().to_string();
            if let Some(name) = file_name.strip_suffix(".manifest.json") {
                runs.push(self.load_manifest(name)?);
            }
        }
        runs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(runs)
    }

    fn write_table(
        &self,
        file: &str,
        write: impl FnOnce(&mut BufWriter<File>) -> OutputResult<()>,
    ) -> OutputResult<()> {
        let mut out = BufWriter::new(File::create(self.root_dir.join(file))?);
        write(&mut out)?;
        out.flush()?;
        Ok(())
    }
}
