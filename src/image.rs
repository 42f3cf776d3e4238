// SPDX-License-Identifier: GPL-3.0-or-later

use crate::boot_data::BootData;
use crate::dcd::Dcd;
use crate::error::ParseError;
use crate::ivt::Ivt;

/// Everything parsed out of one boot image. The raw bytes stay owned by the
/// caller; the DCD body borrows from them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image<'a> {
    pub ivt: Ivt,
    pub boot_data: BootData,
    pub dcd: Option<Dcd<'a>>,
}

impl<'a> Image<'a> {
    pub fn parse(data: &'a [u8]) -> Result<Image<'a>, ParseError> {
        let ivt = Ivt::locate(data)?;
        debug!("IVT at offset {:#x}, version {:#04x}", ivt.offset, ivt.version);

        let dcd = Dcd::parse(data, &ivt)?;
        if let Some(dcd) = &dcd {
            debug!("DCD at offset {:#x}, {} bytes", dcd.offset, dcd.length);
        }

        let boot_data = BootData::parse(data, &ivt)?;

        Ok(Image { ivt, boot_data, dcd })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dcd::CommandTag;

    const SELF_ADDR: u32 = 0x8780_0000;

    /// A minimal but complete image: IVT at offset 0, boot data right after
    /// it, then a DCD with one write command.
    fn build_image() -> Vec<u8> {
        let mut data = vec![0u8; 0x60];

        // IVT
        data[0] = 0xD1;
        data[1..3].copy_from_slice(&32u16.to_be_bytes());
        data[3] = 0x41;
        data[4..8].copy_from_slice(&0x8780_2000u32.to_le_bytes()); // entry
        data[12..16].copy_from_slice(&(SELF_ADDR + 0x40).to_le_bytes()); // dcd
        data[16..20].copy_from_slice(&(SELF_ADDR + 0x20).to_le_bytes()); // boot data
        data[20..24].copy_from_slice(&SELF_ADDR.to_le_bytes()); // self
        data[24..28].copy_from_slice(&0u32.to_le_bytes()); // csf

        // Boot data at 0x20
        data[0x20..0x24].copy_from_slice(&0x8780_0000u32.to_le_bytes());
        data[0x24..0x28].copy_from_slice(&0x0004_0000u32.to_le_bytes());
        data[0x28..0x2C].copy_from_slice(&0u32.to_le_bytes());

        // DCD at 0x40: header + one write command with one pair
        data[0x40] = 0xD2;
        data[0x41..0x43].copy_from_slice(&16u16.to_be_bytes());
        data[0x43] = 0x41;
        data[0x44] = 0xCC;
        data[0x45..0x47].copy_from_slice(&12u16.to_be_bytes());
        data[0x47] = 0x04;
        data[0x48..0x4C].copy_from_slice(&0x021B_0000u32.to_be_bytes());
        data[0x4C..0x50].copy_from_slice(&0x8419_0000u32.to_be_bytes());

        data
    }

    #[test]
    fn parses_a_complete_image() {
        let data = build_image();
        let image = Image::parse(&data).unwrap();

        assert_eq!(image.ivt.offset, 0);
        assert_eq!(image.ivt.entry, 0x8780_2000);
        assert_eq!(image.boot_data.start, 0x8780_0000);
        assert_eq!(image.boot_data.length, 0x0004_0000);

        let dcd = image.dcd.unwrap();
        assert_eq!(dcd.offset, 0x40);
        let commands: Vec<_> = dcd.commands().collect::<Result<_, _>>().unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].tag, CommandTag::WriteData);
        assert_eq!(commands[0].writes().collect::<Vec<_>>(),
            vec![(0x021B_0000, 0x8419_0000)]);
    }

    #[test]
    fn image_without_dcd_still_parses() {
        let mut data = build_image();
        data[12..16].copy_from_slice(&0u32.to_le_bytes());
        let image = Image::parse(&data).unwrap();
        assert!(image.dcd.is_none());
    }
}
