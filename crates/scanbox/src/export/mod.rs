//! Writing parts to disk and driving the external mesh renderer.
//!
//! Meshing is delegated to OpenSCAD: each part is written as a `.scad`
//! script, then `openscad -o part.stl part.scad` turns it into a printable
//! mesh. The renderer binary is configurable for wrappers and CI images
//! that install it under a different name.

use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;

use crate::catalog::NamedPart;

mod scad;

pub use scad::to_scad;

/// Renderer binary used when none is configured.
pub const DEFAULT_RENDERER: &str = "openscad";

/// Errors arising while writing scripts or rendering meshes.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Filesystem failure writing a script or reading renderer output.
    #[error("i/o error exporting {path}: {source}")]
    Io {
        /// The file being written.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: std::io::Error,
    },
    /// The renderer binary could not be started.
    #[error("failed to launch renderer `{renderer}`: {source}")]
    Spawn {
        /// The configured renderer binary.
        renderer: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },
    /// The renderer ran but did not produce a mesh.
    #[error("renderer failed on part `{part}` (exit {status}): {stderr}")]
    Render {
        /// Catalog name of the failing part.
        part: String,
        /// Renderer exit status.
        status: i32,
        /// Renderer diagnostics.
        stderr: String,
    },
}

/// Write one part's OpenSCAD script into `dir`, returning the script path.
pub fn write_scad(part: &NamedPart, dir: &Path) -> Result<PathBuf, ExportError> {
    let path = dir.join(format!("{}.scad", part.name));
    std::fs::write(&path, to_scad(&part.solid)).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Render one part to an STL mesh in `dir` via the external renderer.
///
/// Writes the `.scad` script first, then invokes the renderer on it. The
/// mesh lands next to the script as `<name>.stl`.
pub fn render_stl(part: &NamedPart, dir: &Path, renderer: &str) -> Result<PathBuf, ExportError> {
    let scad_path = write_scad(part, dir)?;
    let stl_path = dir.join(format!("{}.stl", part.name));
    let output = Command::new(renderer)
        .arg("-o")
        .arg(&stl_path)
        .arg(&scad_path)
        .output()
        .map_err(|source| ExportError::Spawn {
            renderer: renderer.to_string(),
            source,
        })?;
    if !output.status.success() {
        return Err(ExportError::Render {
            part: part.name.to_string(),
            status: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    Ok(stl_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog, EnclosureConfig};

    #[test]
    fn write_scad_names_files_after_the_part() {
        let cfg = EnclosureConfig::default();
        let part = catalog::find(&cfg, None, "screw").unwrap();
        let dir = std::env::temp_dir().join("scanbox-export-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = write_scad(&part, &dir).unwrap();
        assert_eq!(path.file_name().unwrap(), "screw.scad");
        let script = std::fs::read_to_string(&path).unwrap();
        assert!(script.starts_with("difference() {"));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_renderer_is_a_spawn_error() {
        let cfg = EnclosureConfig::default();
        let part = catalog::find(&cfg, None, "screw").unwrap();
        let dir = std::env::temp_dir().join("scanbox-render-test");
        std::fs::create_dir_all(&dir).unwrap();
        let err = render_stl(&part, &dir, "scanbox-no-such-renderer").unwrap_err();
        assert!(matches!(err, ExportError::Spawn { .. }));
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn shell_variants_emit_different_scripts() {
        let cfg = EnclosureConfig::default();
        let down = catalog::find(&cfg, None, "bottom_shell_down").unwrap();
        let up = catalog::find(&cfg, None, "bottom_shell_up").unwrap();
        assert_ne!(to_scad(&down.solid), to_scad(&up.solid));
    }
}
