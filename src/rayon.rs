//! Parallel analysis of many files.
//!
//! Each worker opens its own demuxer, and the timing engine holds no shared
//! state, so files are analysed independently on the rayon pool.

use std::path::Path;

use ::rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::analysis::analyze_file;
use crate::configuration::AnalysisOptions;
use crate::error::FramePaceError;
use crate::timing::FrameTimingReport;

/// Analyse several files concurrently on the global rayon pool.
///
/// Same contract as [`analyze_many`](crate::analyze_many): one entry per
/// input, in input order, failures do not abort the batch. A cancelled token
/// makes every not-yet-finished file return
/// [`FramePaceError::Cancelled`].
pub fn analyze_many_parallel<P: AsRef<Path> + Sync>(
    paths: &[P],
    options: &AnalysisOptions,
) -> Vec<Result<FrameTimingReport, FramePaceError>> {
    log::debug!("Analysing {} files in parallel", paths.len());
    paths
        .par_iter()
        .map(|path| analyze_file(path, options))
        .collect()
}
