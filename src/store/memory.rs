//! In-memory log medium
//!
//! Fixed-capacity byte store used by the test suites and available on
//! no_std targets that keep their logs in battery-backed RAM. Behaves
//! exactly like the file medium from the log's point of view, including the
//! "size 0 means not created yet" convention.

use crate::errors::{StoreError, StoreResult};

use super::{LogMedium, MediumCursor};

/// Heapless in-memory medium with `CAP` bytes of storage
#[derive(Debug, Clone, Default)]
pub struct MemoryMedium<const CAP: usize> {
    data: heapless::Vec<u8, CAP>,
}

impl<const CAP: usize> MemoryMedium<CAP> {
    /// Create an empty (not yet created) medium
    pub fn new() -> Self {
        Self {
            data: heapless::Vec::new(),
        }
    }

    /// Raw stored bytes, for test assertions
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

impl<const CAP: usize> LogMedium for MemoryMedium<CAP> {
    type Cursor<'a>
        = MemoryCursor<'a>
    where
        Self: 'a;

    fn size_bytes(&self) -> StoreResult<u64> {
        Ok(self.data.len() as u64)
    }

    fn append(&mut self, bytes: &[u8]) -> StoreResult<()> {
        self.data
            .extend_from_slice(bytes)
            .map_err(|_| StoreError::Overflow)
    }

    fn truncate(&mut self, len: u64) -> StoreResult<()> {
        self.data.truncate(len as usize);
        Ok(())
    }

    fn read_from_start(&self) -> StoreResult<Self::Cursor<'_>> {
        Ok(MemoryCursor {
            remaining: &self.data,
        })
    }
}

/// Sequential cursor over an in-memory medium
pub struct MemoryCursor<'a> {
    remaining: &'a [u8],
}

impl MediumCursor for MemoryCursor<'_> {
    fn read_exact(&mut self, buf: &mut [u8]) -> StoreResult<()> {
        if self.remaining.len() < buf.len() {
            return Err(StoreError::Corrupt {
                reason: "read past end of medium",
            });
        }
        let (head, tail) = self.remaining.split_at(buf.len());
        buf.copy_from_slice(head);
        self.remaining = tail;
        Ok(())
    }
}
