//! Guest memory seam.
//!
//! The guest VM is an external collaborator; the dispatcher only needs to
//! read an argument out of guest-owned memory and write a result buffer
//! back. Harnesses implement [`GuestMemory`] over whatever linear memory
//! their engine exposes; [`LinearMemory`] is the byte-vector implementation
//! used in tests and by harnesses that manage guest memory themselves.

use serde::{Deserialize, Serialize};

/// A pointer/length pair into guest memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestBuffer {
    pub ptr: u32,
    pub len: u32,
}

impl GuestBuffer {
    /// The empty buffer — the uniform encoding of absence at the guest
    /// boundary.
    pub fn empty() -> Self {
        Self { ptr: 0, len: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    #[error("out-of-bounds access at ptr {ptr} len {len}")]
    OutOfBounds { ptr: u32, len: u32 },

    #[error("guest argument is not utf-8: {message}")]
    NotUtf8 { message: String },

    #[error("guest buffer allocation failed: {message}")]
    Allocation { message: String },
}

/// Read/write access to one guest's memory.
pub trait GuestMemory {
    /// Read `len` bytes at `ptr`.
    fn read_bytes(&self, ptr: u32, len: u32) -> Result<Vec<u8>, MemoryError>;

    /// Allocate a guest-accessible buffer, copy `bytes` into it, and return
    /// its location. An empty slice yields the empty buffer.
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<GuestBuffer, MemoryError>;
}

/// Read a UTF-8 argument string out of guest memory.
pub fn read_argument(
    memory: &dyn GuestMemory,
    ptr: u32,
    len: u32,
) -> Result<String, MemoryError> {
    let bytes = memory.read_bytes(ptr, len)?;
    String::from_utf8(bytes).map_err(|e| MemoryError::NotUtf8 {
        message: e.to_string(),
    })
}

/// Growable linear memory backed by a byte vector. Writes append; nothing is
/// ever freed within an evaluation, matching the arena lifetime of the
/// evaluation itself.
#[derive(Debug, Default)]
pub struct LinearMemory {
    bytes: Vec<u8>,
}

impl LinearMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an argument string and return its location, for handing to a
    /// dispatcher call.
    pub fn push_argument(&mut self, argument: &str) -> GuestBuffer {
        let ptr = self.bytes.len() as u32;
        self.bytes.extend_from_slice(argument.as_bytes());
        GuestBuffer {
            ptr,
            len: argument.len() as u32,
        }
    }

    /// Read a buffer back out as UTF-8 (test convenience).
    pub fn read_utf8(&self, buffer: GuestBuffer) -> Result<String, MemoryError> {
        read_argument(self, buffer.ptr, buffer.len)
    }
}

impl GuestMemory for LinearMemory {
    fn read_bytes(&self, ptr: u32, len: u32) -> Result<Vec<u8>, MemoryError> {
        let start = ptr as usize;
        let end = start
            .checked_add(len as usize)
            .ok_or(MemoryError::OutOfBounds { ptr, len })?;
        if end > self.bytes.len() {
            return Err(MemoryError::OutOfBounds { ptr, len });
        }
        Ok(self.bytes[start..end].to_vec())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<GuestBuffer, MemoryError> {
        if bytes.is_empty() {
            return Ok(GuestBuffer::empty());
        }
        let ptr = self.bytes.len() as u32;
        self.bytes.extend_from_slice(bytes);
        Ok(GuestBuffer {
            ptr,
            len: bytes.len() as u32,
        })
    }
}
