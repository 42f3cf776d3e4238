// SPDX-License-Identifier: GPL-3.0-or-later

use bytes::Buf;

use crate::error::ParseError;
use crate::util::slice_at;

pub const IVT_TAG: u8 = 0xD1;

/// Boot ROM only ever places the IVT at one of these offsets, depending on
/// the boot medium. Anything else matching the tag is payload coincidence.
pub const IVT_VALID_OFFSETS: [usize; 4] = [0, 256, 1024, 4096];

pub const IVT_VALID_VERSIONS: [u8; 4] = [0x40, 0x41, 0x42, 0x43];

/// Header plus the seven body words we read. The ROM's struct ends with one
/// more reserved word that nothing looks at.
const IVT_READ_LEN: usize = 28;

/// Image Vector Table. All `u32` fields are absolute addresses in the
/// device's address space, relative to nothing in the file itself; see
/// [`Ivt::image_offset`] for the translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ivt {
    /// Byte offset of the table within the image.
    pub offset: usize,
    pub length: u16,
    pub version: u8,
    pub entry: u32,
    /// 0 means the image carries no DCD.
    pub dcd: u32,
    pub boot_data: u32,
    /// Address the image expects to be loaded at.
    pub self_addr: u32,
    /// 0 means the image is unsigned.
    pub csf: u32,
}

impl Ivt {
    /// Scans for a valid IVT and parses it.
    ///
    /// The scan is byte-by-byte: a 0xD1 at a non-permitted offset, or with
    /// an unknown version byte, can be payload data, so the search resumes
    /// at the very next byte rather than the next permitted offset. The
    /// earliest candidate passing both checks wins.
    pub fn locate(data: &[u8]) -> Result<Ivt, ParseError> {
        let max_offset = IVT_VALID_OFFSETS[IVT_VALID_OFFSETS.len() - 1];
        // The tag can only legally sit at or before max_offset, so the scan
        // never has to look deeper than that into the payload.
        let scan_end = data.len().min(max_offset + 1);

        let mut pos = 0;
        let offset = loop {
            let candidate = match data[pos..scan_end].iter().position(|&b| b == IVT_TAG) {
                Some(rel) => pos + rel,
                None => return Err(ParseError::IvtNotFound { scanned: scan_end }),
            };

            let version = data.get(candidate + 3);
            if IVT_VALID_OFFSETS.contains(&candidate)
                && version.map_or(false, |v| IVT_VALID_VERSIONS.contains(v))
            {
                break candidate;
            }
            pos = candidate + 1;
        };

        Self::parse_at(data, offset)
    }

    // Layout per the reference manual: tag(1) length(2 BE) version(1),
    // then entry, reserved, dcd, boot_data, self, csf as 32-bit LE words.
    fn parse_at(data: &[u8], offset: usize) -> Result<Ivt, ParseError> {
        let mut buf = slice_at(data, offset, IVT_READ_LEN)?;

        buf.advance(1); // tag, already matched by the scan
        let length = buf.get_u16();
        let version = buf.get_u8();
        let entry = buf.get_u32_le();
        buf.advance(4); // reserved
        let dcd = buf.get_u32_le();
        let boot_data = buf.get_u32_le();
        let self_addr = buf.get_u32_le();
        let csf = buf.get_u32_le();

        Ok(Ivt { offset, length, version, entry, dcd, boot_data, self_addr, csf })
    }

    /// Translates an absolute address from the table into a byte offset
    /// within the image.
    pub fn image_offset(&self, addr: u32) -> Result<usize, ParseError> {
        let rel = addr.checked_sub(self.self_addr).ok_or(ParseError::Malformed {
            offset: self.offset,
            what: "address below IVT self address",
            expected: self.self_addr,
            actual: addr,
        })?;
        Ok(self.offset + rel as usize)
    }
}
