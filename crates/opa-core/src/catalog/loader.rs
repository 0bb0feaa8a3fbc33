use std::fs;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::catalog::fbc::CatalogBuilder;
use crate::catalog::model::Package;
use crate::error::CatalogError;

/// Default name of the `opm` executable looked up on `PATH`.
pub const DEFAULT_OPM_BINARY: &str = "opm";

/// Turns a catalog index reference into its package model.
///
/// This is the only suspension point of an advisor run.
#[async_trait]
pub trait CatalogLoader: Send + Sync {
    async fn load_packages(&self, index_reference: &str) -> Result<Vec<Package>, CatalogError>;
}

/// Reads a File-Based Catalog from a local file or directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct FbcLoader;

#[async_trait]
impl CatalogLoader for FbcLoader {
    async fn load_packages(&self, index_reference: &str) -> Result<Vec<Package>, CatalogError> {
        let root = PathBuf::from(index_reference);
        let packages = tokio::task::spawn_blocking(move || read_fbc(&root)).await??;
        info!(
            reference = index_reference,
            packages = packages.len(),
            "loaded file-based catalog"
        );
        Ok(packages)
    }
}

/// Read every `.json`, `.yaml` and `.yml` file under `root` in file name
/// order. A single file is read on its own.
pub fn read_fbc(root: &Path) -> Result<Vec<Package>, CatalogError> {
    let mut builder = CatalogBuilder::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(format) = DocumentFormat::from_path(path) else {
            debug!(path = %path.display(), "skipping non-catalog file");
            continue;
        };

        let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let origin = path.display().to_string();
        match format {
            DocumentFormat::Json => builder.add_json(&origin, &text)?,
            DocumentFormat::Yaml => builder.add_yaml(&origin, &text)?,
        }
    }

    builder.build()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }
}

/// Renders a catalog image (or any reference `opm` understands) with
/// `opm render -o json`.
#[derive(Debug, Clone)]
pub struct OpmLoader {
    binary: PathBuf,
}

impl OpmLoader {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for OpmLoader {
    fn default() -> Self {
        Self::new(DEFAULT_OPM_BINARY)
    }
}

#[async_trait]
impl CatalogLoader for OpmLoader {
    async fn load_packages(&self, index_reference: &str) -> Result<Vec<Package>, CatalogError> {
        info!(reference = index_reference, opm = %self.binary.display(), "rendering catalog");

        // Dropping the future (cancellation) kills the child.
        let output = Command::new(&self.binary)
            .args(["render", index_reference, "--output", "json"])
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| CatalogError::OpmSpawn {
                binary: self.binary.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(CatalogError::Opm {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let mut builder = CatalogBuilder::new();
        builder.add_json("opm render", &String::from_utf8_lossy(&output.stdout))?;
        builder.build()
    }
}

/// Loader chosen from the shape of an index reference.
#[derive(Debug, Clone)]
pub enum IndexLoader {
    Fbc(FbcLoader),
    Opm(OpmLoader),
}

impl IndexLoader {
    /// An existing local path is read as a File-Based Catalog, anything else
    /// is handed to `opm`.
    pub fn for_reference(index_reference: &str, opm_binary: &Path) -> Self {
        if Path::new(index_reference).exists() {
            Self::Fbc(FbcLoader)
        } else {
            Self::Opm(OpmLoader::new(opm_binary))
        }
    }
}

#[async_trait]
impl CatalogLoader for IndexLoader {
    async fn load_packages(&self, index_reference: &str) -> Result<Vec<Package>, CatalogError> {
        match self {
            Self::Fbc(loader) => loader.load_packages(index_reference).await,
            Self::Opm(loader) => loader.load_packages(index_reference).await,
        }
    }
}
