use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::trace;

use super::report::{ReportOptions, format_summary};
use super::sample::{plan_passes, scan_bytes, scan_reader};
use super::scan::ScanState;
use crate::common::io::{Access, load_file, open_noatime};
use crate::common::io_error_msg;
use crate::common::rng::Rng;

/// Sample size used by `-q`.
pub const QUICK_SAMPLE_SIZE: u64 = 1024;
/// NUL locations recorded per source by `-0`.
pub const MAX_REPORTED_NULLS: u32 = 16;

/// Configuration for eol
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EolConfig {
    /// Bytes per sampling pass; 0 scans the whole source.
    pub sample_size: u64,
    /// How many NUL locations to record per source.
    pub null_report_limit: u32,
    pub verbose: bool,
    pub counts: bool,
    pub word_lengths: bool,
}

impl EolConfig {
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            verbose: self.verbose,
            counts: self.counts,
            word_lengths: self.word_lengths,
        }
    }
}

/// Why a source could not be classified. Each one fails only that source.
#[derive(Debug, Error)]
pub enum EolError {
    #[error("{}: {}", .path.display(), io_error_msg(.source))]
    Stat { path: PathBuf, source: io::Error },
    #[error("{}: not a regular file", .path.display())]
    NotRegular { path: PathBuf },
    #[error("{}: can't open: {}", .path.display(), io_error_msg(.source))]
    Open { path: PathBuf, source: io::Error },
    #[error("{}: read error: {}", .path.display(), io_error_msg(.source))]
    Read { path: PathBuf, source: io::Error },
}

/// Outcome for a source that did not fail.
#[derive(Debug)]
pub enum Inspection {
    /// Directories are reported and skipped; not an error.
    Directory,
    Classified(Classified),
}

/// A finished scan plus its rendered summary.
#[derive(Debug)]
pub struct Classified {
    pub state: ScanState,
    pub summary: String,
}

impl Classified {
    fn new(state: ScanState, config: &EolConfig) -> Self {
        let summary = format_summary(&state, &config.report_options());
        trace!(
            bytes = state.bytes_scanned,
            cr = state.cr_count,
            lf = state.lf_count,
            crlf = state.crlf_count,
            %summary,
            "classified"
        );
        Classified { state, summary }
    }
}

/// Classify an in-memory buffer as if it were a regular file of that size.
pub fn classify_bytes(data: &[u8], config: &EolConfig, rng: &mut Rng) -> Classified {
    let total = data.len() as u64;
    let mut state = ScanState::new(Some(total), config.null_report_limit);
    let passes = plan_passes(total, config.sample_size, rng);
    scan_bytes(&mut state, data, &passes);
    Classified::new(state, config)
}

/// Classify a stream of unknown size (standard input). Only the start of
/// the stream is sampled when `sample_size > 0`.
pub fn classify_reader<R: Read>(reader: R, config: &EolConfig) -> io::Result<Classified> {
    let mut state = ScanState::new(None, config.null_report_limit);
    scan_reader(&mut state, reader, config.sample_size)?;
    Ok(Classified::new(state, config))
}

/// Check and classify one named source.
///
/// Directories come back as `Inspection::Directory`; anything else that is
/// not a regular file, or cannot be opened or read, is an `EolError`.
pub fn inspect_path(
    path: &Path,
    config: &EolConfig,
    rng: &mut Rng,
) -> Result<Inspection, EolError> {
    let meta = fs::metadata(path).map_err(|source| EolError::Stat {
        path: path.to_path_buf(),
        source,
    })?;

    if meta.is_dir() {
        return Ok(Inspection::Directory);
    }
    if !meta.file_type().is_file() {
        return Err(EolError::NotRegular {
            path: path.to_path_buf(),
        });
    }

    let file = open_noatime(path).map_err(|source| EolError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let access = if config.sample_size == 0 {
        Access::Sequential
    } else {
        Access::Sampled
    };
    let data = load_file(file, meta.len(), access).map_err(|source| EolError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Inspection::Classified(classify_bytes(&data, config, rng)))
}
