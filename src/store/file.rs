//! File-backed log medium
//!
//! The durable medium on the deployed device: one flat file per log. A
//! missing file reads as size 0, which makes [`AppendLog::open`] create it
//! with its header on first run.
//!
//! Every append opens the file in append mode, writes one row, flushes, and
//! drops the handle. The single-threaded control loop therefore never holds
//! a write handle open across a read, which is what makes the "never read a
//! record while it is being appended" guarantee hold without locking.
//!
//! [`AppendLog::open`]: super::AppendLog::open

use std::fs::{File, OpenOptions};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use crate::errors::{StoreError, StoreResult};

use super::{LogMedium, MediumCursor};

/// Log medium stored as a flat file
#[derive(Debug, Clone)]
pub struct FileMedium {
    path: PathBuf,
}

impl FileMedium {
    /// Medium at the given path; nothing is opened until first use
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LogMedium for FileMedium {
    type Cursor<'a>
        = FileCursor
    where
        Self: 'a;

    fn size_bytes(&self) -> StoreResult<u64> {
        match std::fs::metadata(&self.path) {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn append(&mut self, bytes: &[u8]) -> StoreResult<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(bytes)?;
        file.flush()?;
        // Handle closes on drop, releasing the medium before any read
        Ok(())
    }

    fn truncate(&mut self, len: u64) -> StoreResult<()> {
        let file = OpenOptions::new().write(true).open(&self.path)?;
        file.set_len(len)?;
        Ok(())
    }

    fn read_from_start(&self) -> StoreResult<Self::Cursor<'_>> {
        let file = File::open(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => StoreError::Unavailable {
                reason: "log file missing",
            },
            _ => e.into(),
        })?;
        Ok(FileCursor {
            reader: BufReader::new(file),
        })
    }
}

/// Sequential cursor over a file medium
pub struct FileCursor {
    reader: BufReader<File>,
}

impl MediumCursor for FileCursor {
    fn read_exact(&mut self, buf: &mut [u8]) -> StoreResult<()> {
        self.reader.read_exact(buf)?;
        Ok(())
    }
}
