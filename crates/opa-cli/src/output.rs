use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use opa_core::RenderedReport;

use crate::args::OutputFormat;

/// Sends the rendered Role and ClusterRole to stdout and, when requested,
/// to files.
#[derive(Debug)]
pub struct PermissionsOutputWriter {
    pub rendered: RenderedReport,
    pub role: Option<PathBuf>,
    pub cluster_role: Option<PathBuf>,
}

impl PermissionsOutputWriter {
    pub fn write_view(&self, format: OutputFormat, out: &mut impl Write) -> io::Result<()> {
        let view = match format {
            OutputFormat::Standard => self.rendered.standard(),
            OutputFormat::Compact => self.rendered.compact(),
        };
        out.write_all(view.as_bytes())?;
        out.flush()
    }

    pub fn write_files(&self) -> Result<()> {
        let targets = [
            (&self.role, &self.rendered.role_yaml),
            (&self.cluster_role, &self.rendered.cluster_role_yaml),
        ];
        for (path, yaml) in targets {
            let Some(path) = path else { continue };
            fs::write(path, yaml)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote RBAC document");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn rendered() -> RenderedReport {
        RenderedReport {
            role_yaml: "kind: Role\n".into(),
            cluster_role_yaml: "kind: ClusterRole\n".into(),
        }
    }

    #[test]
    fn standard_view_goes_to_writer() {
        let writer = PermissionsOutputWriter {
            rendered: rendered(),
            role: None,
            cluster_role: None,
        };
        let mut out = Vec::new();
        writer.write_view(OutputFormat::Standard, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Role:\nkind: Role\n"));
        assert!(text.contains("Cluster Role:\nkind: ClusterRole\n"));
    }

    #[test]
    fn compact_view_separates_documents() {
        let writer = PermissionsOutputWriter {
            rendered: rendered(),
            role: None,
            cluster_role: None,
        };
        let mut out = Vec::new();
        writer.write_view(OutputFormat::Compact, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "kind: Role\n\n---\nkind: ClusterRole\n\n"
        );
    }

    #[test]
    fn writes_only_requested_files() {
        let dir = TempDir::new().unwrap();
        let role_path = dir.path().join("role.yaml");
        let writer = PermissionsOutputWriter {
            rendered: rendered(),
            role: Some(role_path.clone()),
            cluster_role: None,
        };

        writer.write_files().unwrap();

        assert_eq!(fs::read_to_string(role_path).unwrap(), "kind: Role\n");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        let writer = PermissionsOutputWriter {
            rendered: rendered(),
            role: None,
            cluster_role: Some(dir.path().join("missing").join("cr.yaml")),
        };

        let err = writer.write_files().unwrap_err();
        assert!(format!("{err:#}").contains("failed to write"));
    }
}
