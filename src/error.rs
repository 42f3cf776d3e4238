// SPDX-License-Identifier: GPL-3.0-or-later

use std::error::Error;
use std::fmt;

/// Parse failures. All of them are terminal for the operation in progress:
/// the input is static, so retrying cannot change the outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// No valid IVT before the scan position exceeded the permitted range.
    IvtNotFound { scanned: usize },
    /// A tag, version, or declared-length check failed.
    Malformed {
        offset: usize,
        what: &'static str,
        expected: u32,
        actual: u32,
    },
    /// A DCD command tag outside the recognized set.
    Unsupported { offset: usize, tag: u8 },
    /// A fixed-size read would run past the end of the image.
    Truncated {
        offset: usize,
        need: usize,
        have: usize,
    },
}

impl ParseError {
    /// Shifts the reported offset, for errors raised against a subslice.
    pub(crate) fn rebase(mut self, base: usize) -> Self {
        match &mut self {
            ParseError::Malformed { offset, .. }
            | ParseError::Unsupported { offset, .. }
            | ParseError::Truncated { offset, .. } => *offset += base,
            ParseError::IvtNotFound { .. } => {}
        }
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::IvtNotFound { scanned } => {
                write!(f, "IVT table not found within the first {:#x} bytes", scanned)
            }
            ParseError::Malformed { offset, what, expected, actual } => {
                write!(f, "malformed {} at offset {:#x}: expected {:#x}, got {:#x}",
                    what, offset, expected, actual)
            }
            ParseError::Unsupported { offset, tag } => {
                write!(f, "DCD command with tag {:#04x} at offset {:#x} is not supported",
                    tag, offset)
            }
            ParseError::Truncated { offset, need, have } => {
                write!(f, "image truncated: need {} bytes at offset {:#x}, have {}",
                    need, offset, have)
            }
        }
    }
}

impl Error for ParseError {}
