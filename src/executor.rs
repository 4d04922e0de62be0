//! The row decode executor.
//!
//! Small inputs are decoded on the calling thread. Large inputs are split across the rayon pool:
//! every row owns a pre-allocated output slot, workers write their record into the slot at the
//! row's index, and nothing is handed to the caller until all rows succeeded.
//!
//! Failure semantics match the sequential loop exactly. Workers share an abort marker holding the
//! lowest failing row seen so far; rows after it are skipped, rows before it still run, and the
//! error finally returned is the one of the lowest failing row.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::error::{Result, RowcodeError};
use crate::format::{PARALLEL_ROW_THRESHOLD, RowcodeOptions};

/// Rows handed to one rayon task at a time.
const MIN_ROWS_PER_TASK: usize = 512;

/// Sentinel for "no row has failed".
const NO_FAILURE: usize = usize::MAX;

/// Context shared among all worker threads.
struct ExecutionContext {
    first_failure: AtomicUsize,
    error_capture: Mutex<Option<(usize, RowcodeError)>>,
}

impl ExecutionContext {
    fn new() -> Self {
        Self {
            first_failure: AtomicUsize::new(NO_FAILURE),
            error_capture: Mutex::new(None),
        }
    }

    fn signal_error(&self, row: usize, err: RowcodeError) {
        let mut guard = self.error_capture.lock().unwrap_or_else(|p| p.into_inner());
        let replace = match guard.as_ref() {
            Some((captured, _)) => row < *captured,
            None => true,
        };
        if replace {
            *guard = Some((row, err));
            self.first_failure.fetch_min(row, Ordering::SeqCst);
        }
    }

    /// True once a row before `row` has failed; its outcome can no longer matter.
    fn should_skip(&self, row: usize) -> bool {
        self.first_failure.load(Ordering::Relaxed) < row
    }

    fn into_error(self) -> Option<RowcodeError> {
        self.error_capture
            .into_inner()
            .unwrap_or_else(|p| p.into_inner())
            .map(|(row, err)| err.at_row(row))
    }
}

/// Decodes `lines` in order, choosing the sequential or parallel strategy from `options`.
pub fn decode_rows<L, R, F>(lines: &[L], options: &RowcodeOptions, decode: F) -> Result<Vec<R>>
where
    L: Sync,
    R: Send,
    F: Fn(&L) -> Result<R> + Sync,
{
    if options.parallel && lines.len() >= PARALLEL_ROW_THRESHOLD {
        decode_rows_parallel(lines, decode)
    } else {
        decode_rows_sequential(lines, decode)
    }
}

/// Decodes on the calling thread, stopping at the first failing row.
pub fn decode_rows_sequential<L, R, F>(lines: &[L], decode: F) -> Result<Vec<R>>
where
    F: Fn(&L) -> Result<R>,
{
    let mut records = Vec::with_capacity(lines.len());
    for (row, line) in lines.iter().enumerate() {
        records.push(decode(line).map_err(|e| e.at_row(row))?);
    }
    Ok(records)
}

/// Decodes on the rayon pool. All-or-nothing: any failure discards every decoded slot.
pub fn decode_rows_parallel<L, R, F>(lines: &[L], decode: F) -> Result<Vec<R>>
where
    L: Sync,
    R: Send,
    F: Fn(&L) -> Result<R> + Sync,
{
    tracing::debug!(rows = lines.len(), "decoding rows in parallel");

    let ctx = ExecutionContext::new();
    let mut slots: Vec<Option<R>> = Vec::with_capacity(lines.len());
    slots.resize_with(lines.len(), || None);

    slots
        .par_iter_mut()
        .zip(lines.par_iter())
        .enumerate()
        .with_min_len(MIN_ROWS_PER_TASK)
        .for_each(|(row, (slot, line))| {
            if ctx.should_skip(row) {
                return;
            }
            match decode(line) {
                Ok(record) => *slot = Some(record),
                Err(e) => ctx.signal_error(row, e),
            }
        });

    if let Some(err) = ctx.into_error() {
        return Err(err);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(row, slot)| {
            slot.ok_or_else(|| RowcodeError::Internal(format!("row {row} was never decoded")))
        })
        .collect()
}
