// SPDX-License-Identifier: GPL-3.0-or-later

use std::io::prelude::*;
use anyhow::{Context, Result};

use crate::error::ParseError;

pub fn read_file(path: &str) -> Result<Vec<u8>> {
    let mut file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open {}", path))?;

    let mut buf = Vec::new();
    file.read_to_end(&mut buf)
        .with_context(|| format!("Failed to read {}", path))?;

    Ok(buf)
}

/// Bounds-checked subslice, so every fixed-size read reports where it fell
/// off the end instead of panicking.
pub fn slice_at(data: &[u8], offset: usize, len: usize) -> Result<&[u8], ParseError> {
    if offset.checked_add(len).map_or(true, |end| end > data.len()) {
        return Err(ParseError::Truncated {
            offset,
            need: len,
            have: data.len().saturating_sub(offset),
        });
    }
    Ok(&data[offset..offset + len])
}
