//! File format sniffing.
//!
//! Each supported format recognizes its own signature and decodes just
//! enough of the header to describe the file. Detection tries the formats in
//! [`FileFormat::ALL`] order.

mod cgf;
mod nif;

use std::fmt;

use bytes::Buf;
use skope::model::{NodeError, NodeRef};

/// Errors raised while decoding the header of a recognized format.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// The header ends before a required field.
    #[error("header truncated at byte {offset}, {needed} more bytes needed")]
    Truncated { offset: usize, needed: usize },

    /// A field holds a value the format does not allow.
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// The decoded header could not be assembled into nodes.
    #[error(transparent)]
    Node(#[from] NodeError),
}

impl FormatError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        FormatError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// The file formats the viewer can sniff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// NetImmerse / Gamebryo `.nif` and `.kf` files.
    Nif,
    /// CryEngine `.cgf` and `.caf` files.
    Cgf,
}

impl FileFormat {
    /// Formats in detection order.
    pub const ALL: [FileFormat; 2] = [FileFormat::Nif, FileFormat::Cgf];

    /// Short name used in messages.
    pub fn name(self) -> &'static str {
        match self {
            FileFormat::Nif => "NIF",
            FileFormat::Cgf => "CGF",
        }
    }

    /// Returns `true` if `data` starts with this format's signature.
    pub fn matches(self, data: &[u8]) -> bool {
        match self {
            FileFormat::Nif => nif::matches(data),
            FileFormat::Cgf => cgf::matches(data),
        }
    }

    /// Decodes the header of `data` into blocks.
    pub fn read_blocks(self, data: &[u8]) -> Result<Vec<NodeRef>, FormatError> {
        match self {
            FileFormat::Nif => nif::read_blocks(data),
            FileFormat::Cgf => cgf::read_blocks(data),
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns the first format whose signature matches `data`.
pub fn detect(data: &[u8]) -> Option<FileFormat> {
    FileFormat::ALL.into_iter().find(|format| format.matches(data))
}

/// Bounds-checked cursor over a header.
struct HeaderReader<'a> {
    data: &'a [u8],
    buf: &'a [u8],
}

impl<'a> HeaderReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, buf: data }
    }

    fn offset(&self) -> usize {
        self.data.len() - self.buf.remaining()
    }

    fn require(&self, needed: usize) -> Result<(), FormatError> {
        if self.buf.remaining() < needed {
            return Err(FormatError::Truncated {
                offset: self.offset(),
                needed: needed - self.buf.remaining(),
            });
        }
        Ok(())
    }

    fn seek(&mut self, offset: usize) -> Result<(), FormatError> {
        if offset > self.data.len() {
            return Err(FormatError::Truncated {
                offset: self.data.len(),
                needed: offset - self.data.len(),
            });
        }
        self.buf = &self.data[offset..];
        Ok(())
    }

    fn u8(&mut self) -> Result<u8, FormatError> {
        self.require(1)?;
        Ok(self.buf.get_u8())
    }

    fn u32_le(&mut self) -> Result<u32, FormatError> {
        self.require(4)?;
        Ok(self.buf.get_u32_le())
    }

    fn u32_be(&mut self) -> Result<u32, FormatError> {
        self.require(4)?;
        Ok(self.buf.get_u32())
    }

    fn bytes(&mut self, len: usize) -> Result<&'a [u8], FormatError> {
        self.require(len)?;
        let (head, rest) = self.buf.split_at(len);
        self.buf = rest;
        Ok(head)
    }

    /// Reads up to and including the next `\n`, returning the line without it.
    fn line(&mut self, max_len: usize) -> Result<&'a [u8], FormatError> {
        let buf: &'a [u8] = self.buf;
        let window = &buf[..buf.len().min(max_len)];
        match window.iter().position(|&b| b == b'\n') {
            Some(end) => {
                let line = self.bytes(end)?;
                self.buf.advance(1);
                Ok(line)
            }
            None => Err(FormatError::Truncated {
                offset: self.offset() + window.len(),
                needed: 1,
            }),
        }
    }
}
