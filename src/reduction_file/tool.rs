//! Config files of the auxiliary tools (coadd, flux calibration, ...).
//!
//! These files share the reduction-file syntax but carry a single named block of files,
//! e.g.
//!
//! ```text
//! [coadd1d]
//! coaddfile = J1217p3905_coadd.fits
//! spec1d read
//! Science/spec1d_b27-J1217p3905_KASTb_2015May20T045733.560.fits
//! spec1d end
//! ```

use super::block::find_block;
use super::data::read_data_file_names;
use super::lines::read_lines;
use super::partition::strip_spans;
use crate::error::RdxResult;
use crate::messages::MessageSink;
use std::path::{Path, PathBuf};

/// Parsed tool config file.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolConfig {
    /// Lines outside the file block.
    pub cfg_lines: Vec<String>,
    /// Files listed in the block; `None` when the block is missing, empty or unterminated.
    pub files: Option<Vec<PathBuf>>,
}

/// Parse a tool config file with a file block called `block`.
///
/// With `check_files` the block goes through the raw data-file reader (globs expanded,
/// skips applied, existence checked); otherwise the lines are taken verbatim.
pub fn parse_tool_config(
    path: impl AsRef<Path>,
    block: &str,
    check_files: bool,
    sink: &dyn MessageSink,
) -> RdxResult<ToolConfig> {
    let path = path.as_ref();
    sink.info(&format!("Loading the {} config file", path.display()));
    let lines = read_lines(path)?;

    let bounds = find_block(&lines, block);
    let Some(found) = bounds.block() else {
        // An unclosed block removes nothing, not even its opening marker.
        if bounds.is_unterminated() {
            sink.warn(&format!(
                "Missing '{block} end' in {}; ignoring the {block} block.",
                path.display()
            ));
        }
        return Ok(ToolConfig {
            cfg_lines: lines,
            files: None,
        });
    };

    let files = if found.is_empty() {
        None
    } else if check_files {
        Some(read_data_file_names(found.lines(&lines), true, sink)?)
    } else {
        Some(found.lines(&lines).iter().map(PathBuf::from).collect())
    };

    Ok(ToolConfig {
        cfg_lines: strip_spans(&lines, &[found.span()]),
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RdxError;
    use crate::log_capture::CaptureSink;
    use std::fs;

    #[test]
    fn verbatim_files() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("coadd.cfg");
        fs::write(
            &cfg,
            "[coadd1d]\ncoaddfile = out.fits\nspec1d read\nScience/spec1d_a.fits\nScience/spec1d_b.fits\nspec1d end\n",
        )
        .unwrap();
        let sink = CaptureSink::new();
        let parsed = parse_tool_config(&cfg, "spec1d", false, &sink).unwrap();
        assert_eq!(parsed.cfg_lines, vec!["[coadd1d]", "coaddfile = out.fits"]);
        assert_eq!(
            parsed.files.unwrap(),
            vec![
                PathBuf::from("Science/spec1d_a.fits"),
                PathBuf::from("Science/spec1d_b.fits")
            ]
        );
        assert_eq!(sink.infos().len(), 1);
    }

    #[test]
    fn checked_files_expand_globs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("spec1d_a.fits"), b"").unwrap();
        fs::write(dir.path().join("spec1d_b.fits"), b"").unwrap();
        let cfg = dir.path().join("flux.cfg");
        fs::write(
            &cfg,
            format!(
                "[fluxcalib]\nspec1d read\npath {}\nspec1d_*.fits\nspec1d end\n",
                dir.path().display()
            ),
        )
        .unwrap();
        let sink = CaptureSink::new();
        let parsed = parse_tool_config(&cfg, "spec1d", true, &sink).unwrap();
        assert_eq!(parsed.files.unwrap().len(), 2);
        assert_eq!(parsed.cfg_lines, vec!["[fluxcalib]"]);
    }

    #[test]
    fn empty_or_unterminated_block_has_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.cfg");
        fs::write(&empty, "[coadd1d]\nspec1d read\nspec1d end\n").unwrap();
        let open = dir.path().join("open.cfg");
        fs::write(&open, "[coadd1d]\nspec1d read\nspec1d_a.fits\n").unwrap();

        let sink = CaptureSink::new();
        let parsed = parse_tool_config(&empty, "spec1d", false, &sink).unwrap();
        assert!(parsed.files.is_none());
        assert_eq!(parsed.cfg_lines, vec!["[coadd1d]"]);

        assert!(sink.warnings().is_empty());

        let parsed = parse_tool_config(&open, "spec1d", false, &sink).unwrap();
        assert!(parsed.files.is_none());
        assert_eq!(
            parsed.cfg_lines,
            vec!["[coadd1d]", "spec1d read", "spec1d_a.fits"]
        );
        assert_eq!(sink.warnings().len(), 1);
    }

    #[test]
    fn missing_config_file() {
        let sink = CaptureSink::new();
        assert!(matches!(
            parse_tool_config("/no/such/coadd.cfg", "spec1d", false, &sink),
            Err(RdxError::FileNotFound(_))
        ));
    }
}
