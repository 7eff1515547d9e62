//! Embedded resource archive
//!
//! The archive is a gzip-compressed tar stream compiled into the host binary,
//! normally through the `bundle.rs` file written by the `resbundle` tool.
//! Each call to [`EmbeddedArchive::open`] decodes it from the start.

use flate2::read::GzDecoder;
use std::borrow::Cow;
use std::io::Read;

/// Compressed resource archive bytes
#[derive(Debug, Clone)]
pub struct EmbeddedArchive {
    bytes: Cow<'static, [u8]>,
}

impl EmbeddedArchive {
    /// Wrap bytes compiled into the binary
    pub const fn from_static(bytes: &'static [u8]) -> Self {
        Self {
            bytes: Cow::Borrowed(bytes),
        }
    }

    /// Wrap bytes produced at runtime
    pub fn from_vec(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Cow::Owned(bytes),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Compressed size in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Fresh tar reader over the decompressed stream.
    ///
    /// Corruption is reported lazily, by the reads on the returned archive.
    pub fn open(&self) -> tar::Archive<impl Read + '_> {
        tar::Archive::new(GzDecoder::new(&self.bytes[..]))
    }
}
