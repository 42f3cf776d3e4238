// SPDX-License-Identifier: GPL-3.0-or-later

use bytes::Buf;

use crate::error::ParseError;
use crate::ivt::Ivt;
use crate::util::slice_at;

const BOOT_DATA_LEN: usize = 12;

/// Boot Data record: where the ROM loads the image and how much of it.
/// It carries no tag or version of its own, so only bounds are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootData {
    pub start: u32,
    pub length: u32,
    pub plugin: u32,
}

impl BootData {
    pub fn parse(data: &[u8], ivt: &Ivt) -> Result<BootData, ParseError> {
        let offset = ivt.image_offset(ivt.boot_data)?;
        let mut buf = slice_at(data, offset, BOOT_DATA_LEN)?;

        let start = buf.get_u32_le();
        let length = buf.get_u32_le();
        let plugin = buf.get_u32_le();

        Ok(BootData { start, length, plugin })
    }

    /// Nonzero means a plugin/companion image meant to run before the main
    /// one. Informational, never an error.
    pub fn is_plugin(&self) -> bool {
        self.plugin != 0
    }
}
