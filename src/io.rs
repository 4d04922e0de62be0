//! File helpers: buffered writes and memory-mapped reads.
//!
//! Reads map the file and decode straight from the mapping through the byte path, so rows are
//! never copied into an intermediate `String`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use memmap2::Mmap;

use crate::constants::DEFAULT_BUFFER_SIZE;
use crate::error::Result;

/// Writes `contents` to `path`, truncating any existing file.
pub fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);
    writer.write_all(contents)?;
    writer.flush()?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(())
}

/// A read-only view of a whole file.
#[derive(Debug)]
pub struct MappedFile {
    // Zero-length files are not mapped.
    mmap: Option<Mmap>,
}

impl MappedFile {
    /// Maps `path` into memory.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        if len == 0 {
            return Ok(Self { mmap: None });
        }

        // Safety: Mmap is fundamentally unsafe as external processes could modify the file.
        // We assume exclusive access for the duration of the decode.
        #[allow(unsafe_code)]
        let mmap = unsafe { Mmap::map(&file)? };

        tracing::debug!(path = %path.display(), bytes = len, "mapped file");
        Ok(Self { mmap: Some(mmap) })
    }

    /// The file contents.
    pub fn bytes(&self) -> &[u8] {
        self.mmap.as_deref().unwrap_or_default()
    }
}
