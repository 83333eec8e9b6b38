//! Reconstructing a reduction file from parsed or derived state.
//!
//! The output is the inverse of the raw-format reading path: writing a list of data
//! files and reading the file back yields the same list in the same order.

use super::block::{DATA_BLOCK, SETUP_BLOCK};
use crate::error::{RdxError, RdxResult};
use crate::messages::{fail, MessageSink};
use crate::validation::{is_not_empty, is_valid_data_entry, is_valid_line_entry};
use chrono::Local;
use std::fmt::Write as _;
use std::path::Path;

/// Everything that goes into a reduction file.
#[derive(Debug, Clone, Default)]
pub struct ReductionFileContents {
    /// Name of the spectrograph, used for the default configuration.
    pub spectrograph: String,
    /// Literal data file entries (paths or glob patterns).
    pub data_files: Vec<String>,
    /// Configuration lines; a minimal `[rdx]` section is written when absent.
    pub cfg_lines: Option<Vec<String>>,
    pub setup_lines: Option<Vec<String>>,
    /// Inline table lines (header first) written after the `path` directives.
    pub table_rows: Option<Vec<String>>,
    /// Base directories written as `path <dir>` directives.
    pub paths: Option<Vec<String>>,
}

impl ReductionFileContents {
    pub fn new(spectrograph: impl Into<String>, data_files: Vec<String>) -> Self {
        Self {
            spectrograph: spectrograph.into(),
            data_files,
            ..Default::default()
        }
    }

    pub fn with_cfg_lines(mut self, lines: Vec<String>) -> Self {
        self.cfg_lines = Some(lines);
        self
    }

    pub fn with_setup_lines(mut self, lines: Vec<String>) -> Self {
        self.setup_lines = Some(lines);
        self
    }

    pub fn with_table_rows(mut self, rows: Vec<String>) -> Self {
        self.table_rows = Some(rows);
        self
    }

    pub fn with_paths(mut self, paths: Vec<String>) -> Self {
        self.paths = Some(paths);
        self
    }

    /// Check that every entry is read back unchanged from its data-block line.
    pub fn validate(&self) -> RdxResult<()> {
        for entry in &self.data_files {
            is_valid_data_entry(entry)
                .map_err(|reason| RdxError::Type(format!("{reason}: {entry:?}")))?;
        }
        for path in self.paths.iter().flatten() {
            is_valid_line_entry(path)
                .map_err(|reason| RdxError::Type(format!("{reason}: {path:?}")))?;
        }
        if self.cfg_lines.is_none() {
            is_not_empty(&self.spectrograph)
                .map_err(|reason| RdxError::Type(format!("spectrograph: {reason}")))?;
        }
        Ok(())
    }

    fn default_cfg_lines(&self) -> Vec<String> {
        vec![
            "[rdx]".to_string(),
            format!("    spectrograph = {}", self.spectrograph),
        ]
    }

    /// Render the file text. The date comment uses the local date.
    pub fn render(&self) -> RdxResult<String> {
        self.validate()?;
        let cfg_lines = self
            .cfg_lines
            .clone()
            .unwrap_or_else(|| self.default_cfg_lines());

        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "# Auto-generated reduction file using specred version: {}",
            env!("CARGO_PKG_VERSION")
        );
        let _ = writeln!(out, "# {}", Local::now().format("%Y-%m-%d"));
        out.push('\n');
        out.push_str("# User-defined execution parameters\n");
        for line in &cfg_lines {
            let _ = writeln!(out, "{line}");
        }
        out.push('\n');

        if let Some(setup) = &self.setup_lines {
            out.push_str("# Setup\n");
            let _ = writeln!(out, "{SETUP_BLOCK} read");
            for line in setup {
                let _ = writeln!(out, "{line}");
            }
            let _ = writeln!(out, "{SETUP_BLOCK} end");
            out.push('\n');
        }

        out.push_str("# Read in the data\n");
        let _ = writeln!(out, "{DATA_BLOCK} read");
        for file in &self.data_files {
            let _ = writeln!(out, " {file}");
        }
        for path in self.paths.iter().flatten() {
            let _ = writeln!(out, " path {path}");
        }
        for row in self.table_rows.iter().flatten() {
            let _ = writeln!(out, "{row}");
        }
        let _ = writeln!(out, "{DATA_BLOCK} end");
        out.push('\n');

        Ok(out)
    }
}

/// Write a reduction file to `path`.
pub fn write_reduction_file(
    path: impl AsRef<Path>,
    contents: &ReductionFileContents,
    sink: &dyn MessageSink,
) -> RdxResult<()> {
    let path = path.as_ref();
    let text = contents.render().map_err(|e| fail(sink, e))?;
    std::fs::write(path, text)?;
    sink.info(&format!("Reduction file written to: {}", path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reduction_file::lines::clean_lines;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn default_config_section() {
        let text = ReductionFileContents::new("shane_kast_blue", strings(&["b1.fits.gz"]))
            .render()
            .unwrap();
        let lines = clean_lines(&text);
        assert_eq!(
            lines,
            vec![
                "[rdx]",
                "spectrograph = shane_kast_blue",
                "data read",
                "b1.fits.gz",
                "data end"
            ]
        );
        assert!(text.starts_with("# Auto-generated reduction file"));
    }

    #[test]
    fn sections_in_fixed_order() {
        let text = ReductionFileContents::new("keck_lris_blue", strings(&["a.fits"]))
            .with_cfg_lines(strings(&["[rdx]", "    spectrograph = keck_lris_blue"]))
            .with_setup_lines(strings(&["Setup A:"]))
            .with_paths(strings(&["/data/raw"]))
            .with_table_rows(strings(&["| filename | frametype |", "| b1.fits | arc |"]))
            .render()
            .unwrap();
        let lines = clean_lines(&text);
        assert_eq!(
            lines,
            vec![
                "[rdx]",
                "spectrograph = keck_lris_blue",
                "setup read",
                "Setup A:",
                "setup end",
                "data read",
                "a.fits",
                "path /data/raw",
                "| filename | frametype |",
                "| b1.fits | arc |",
                "data end"
            ]
        );
    }

    #[test]
    fn rejects_multiline_entry() {
        let err = ReductionFileContents::new("x", strings(&["a.fits\nb.fits"]))
            .render()
            .unwrap_err();
        assert!(matches!(err, RdxError::Type(_)));
    }

    #[test]
    fn rejects_entries_that_change_meaning() {
        for entry in [
            "run#1.fits",
            "skip b.fits",
            "path /data/raw",
            "|a.fits",
            "| a.fits |",
            "data end",
            "setup end",
            "data  read",
        ] {
            let err = ReductionFileContents::new("x", strings(&[entry, "b.fits"]))
                .render()
                .unwrap_err();
            assert!(matches!(err, RdxError::Type(_)), "{entry:?} was accepted");
        }
    }

    #[test]
    fn keyword_inside_a_name_is_fine() {
        let text = ReductionFileContents::new("x", strings(&["skipped.fits", "data_end.fits"]))
            .render()
            .unwrap();
        assert!(text.contains(" skipped.fits\n"));
    }

    #[test]
    fn rejects_commented_path() {
        let err = ReductionFileContents::new("x", strings(&["a.fits"]))
            .with_paths(strings(&["/data/night#2"]))
            .render()
            .unwrap_err();
        assert!(matches!(err, RdxError::Type(_)));
    }

    #[test]
    fn rejects_empty_spectrograph_without_cfg() {
        let err = ReductionFileContents::new("", vec![]).render().unwrap_err();
        assert!(matches!(err, RdxError::Type(_)));
    }
}
