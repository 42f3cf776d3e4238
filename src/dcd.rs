// SPDX-License-Identifier: GPL-3.0-or-later

use bytes::Buf;
use num_enum::TryFromPrimitive;

use crate::error::ParseError;
use crate::ivt::Ivt;
use crate::util::slice_at;

pub const DCD_TAG: u8 = 0xD2;

/// The reference manual specifies 0x41, but shipped images are seen using
/// the neighboring versions and the ROM accepts them.
pub const DCD_VALID_VERSIONS: [u8; 4] = [0x40, 0x41, 0x42, 0x43];

/// Table and command headers share the tag/length/parameter shape.
const HEADER_LEN: usize = 4;
const WRITE_PAIR_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum CommandTag {
    /// The only command tag seen in the wild so far.
    WriteData = 0xCC,
}

/// Device Configuration Data table. The body stays borrowed from the raw
/// image; commands are decoded lazily while iterating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dcd<'a> {
    /// Byte offset of the table header within the image.
    pub offset: usize,
    /// Declared table length, its own header included.
    pub length: u16,
    pub version: u8,
    body: &'a [u8],
}

impl<'a> Dcd<'a> {
    /// Returns `None` when the IVT carries no DCD pointer. A pointer that
    /// leads to an invalid header is a hard error, never a guess.
    pub fn parse(data: &'a [u8], ivt: &Ivt) -> Result<Option<Dcd<'a>>, ParseError> {
        if ivt.dcd == 0 {
            return Ok(None);
        }

        let offset = ivt.image_offset(ivt.dcd)?;
        let mut buf = slice_at(data, offset, HEADER_LEN)?;
        let tag = buf.get_u8();
        let length = buf.get_u16();
        let version = buf.get_u8();

        if tag != DCD_TAG {
            return Err(ParseError::Malformed {
                offset,
                what: "DCD tag",
                expected: DCD_TAG as u32,
                actual: tag as u32,
            });
        }
        if !DCD_VALID_VERSIONS.contains(&version) {
            return Err(ParseError::Malformed {
                offset: offset + 3,
                what: "DCD version",
                expected: 0x41,
                actual: version as u32,
            });
        }
        if (length as usize) < HEADER_LEN {
            return Err(ParseError::Malformed {
                offset: offset + 1,
                what: "DCD length",
                expected: HEADER_LEN as u32,
                actual: length as u32,
            });
        }

        let body = slice_at(data, offset + HEADER_LEN, length as usize - HEADER_LEN)?;
        Ok(Some(Dcd { offset, length, version, body }))
    }

    pub fn commands(&self) -> Commands<'a> {
        Commands {
            body: self.body,
            base: self.offset + HEADER_LEN,
            pos: 0,
            done: false,
        }
    }
}

/// One decoded DCD command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command<'a> {
    pub tag: CommandTag,
    /// Declared command length, its own header included.
    pub length: u16,
    pub parameter: u8,
    payload: &'a [u8],
}

impl<'a> Command<'a> {
    /// The (address, value) write pairs of a WriteData command, in file
    /// order.
    pub fn writes(&self) -> Writes<'a> {
        Writes { payload: self.payload }
    }
}

pub struct Writes<'a> {
    payload: &'a [u8],
}

impl Iterator for Writes<'_> {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.payload.len() < WRITE_PAIR_LEN {
            return None;
        }
        let address = self.payload.get_u32();
        let value = self.payload.get_u32();
        Some((address, value))
    }
}

/// Walks the table body command by command. An unsupported or malformed
/// command fuses the iterator: skipping it would desynchronize the running
/// offset for everything after it.
pub struct Commands<'a> {
    body: &'a [u8],
    /// Image offset of the body start, for error reporting.
    base: usize,
    pos: usize,
    done: bool,
}

impl<'a> Iterator for Commands<'a> {
    type Item = Result<Command<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.pos >= self.body.len() {
            return None;
        }
        let r = self.parse_next();
        if r.is_err() {
            self.done = true;
        }
        Some(r)
    }
}

impl<'a> Commands<'a> {
    fn parse_next(&mut self) -> Result<Command<'a>, ParseError> {
        let mut buf = slice_at(self.body, self.pos, HEADER_LEN)
            .map_err(|e| e.rebase(self.base))?;
        let raw_tag = buf.get_u8();
        let length = buf.get_u16();
        let parameter = buf.get_u8();

        let tag = CommandTag::try_from(raw_tag).map_err(|_| ParseError::Unsupported {
            offset: self.base + self.pos,
            tag: raw_tag,
        })?;

        if (length as usize) < HEADER_LEN {
            return Err(ParseError::Malformed {
                offset: self.base + self.pos + 1,
                what: "DCD command length",
                expected: HEADER_LEN as u32,
                actual: length as u32,
            });
        }
        let payload_len = length as usize - HEADER_LEN;
        let payload = slice_at(self.body, self.pos + HEADER_LEN, payload_len)
            .map_err(|e| e.rebase(self.base))?;

        match tag {
            CommandTag::WriteData => {
                if payload_len % WRITE_PAIR_LEN != 0 {
                    return Err(ParseError::Malformed {
                        offset: self.base + self.pos,
                        what: "write command payload length",
                        expected: WRITE_PAIR_LEN as u32,
                        actual: payload_len as u32,
                    });
                }
            }
        }

        self.pos += length as usize;
        Ok(Command { tag, length, parameter, payload })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SELF_ADDR: u32 = 0x8000_0000;
    const DCD_ADDR: u32 = 0x8000_0020;

    fn test_ivt(dcd: u32) -> Ivt {
        Ivt {
            offset: 0,
            length: 32,
            version: 0x41,
            entry: 0,
            dcd,
            boot_data: 0,
            self_addr: SELF_ADDR,
            csf: 0,
        }
    }

    /// Image with a DCD table at offset 0x20 whose body is `body`.
    fn image_with_dcd(version: u8, body: &[u8]) -> Vec<u8> {
        let mut data = vec![0u8; 0x20];
        data.push(DCD_TAG);
        data.extend_from_slice(&((HEADER_LEN + body.len()) as u16).to_be_bytes());
        data.push(version);
        data.extend_from_slice(body);
        data
    }

    fn write_command(pairs: &[(u32, u32)]) -> Vec<u8> {
        let mut cmd = vec![0xCC];
        cmd.extend_from_slice(&((HEADER_LEN + pairs.len() * 8) as u16).to_be_bytes());
        cmd.push(0x04);
        for &(address, value) in pairs {
            cmd.extend_from_slice(&address.to_be_bytes());
            cmd.extend_from_slice(&value.to_be_bytes());
        }
        cmd
    }

    #[test]
    fn no_dcd_pointer_means_no_table() {
        let data = vec![0u8; 64];
        assert_eq!(Dcd::parse(&data, &test_ivt(0)).unwrap(), None);
    }

    #[test]
    fn wrong_tag_is_malformed() {
        let mut data = image_with_dcd(0x41, &[]);
        data[0x20] = 0xD3;
        let err = Dcd::parse(&data, &test_ivt(DCD_ADDR)).unwrap_err();
        assert!(matches!(err, ParseError::Malformed { offset: 0x20, .. }));
    }

    #[test]
    fn wrong_version_is_malformed() {
        let data = image_with_dcd(0x44, &[]);
        let err = Dcd::parse(&data, &test_ivt(DCD_ADDR)).unwrap_err();
        assert!(matches!(err, ParseError::Malformed { offset: 0x23, .. }));
    }

    #[test]
    fn all_field_observed_versions_are_accepted() {
        for &version in &DCD_VALID_VERSIONS {
            let data = image_with_dcd(version, &[]);
            let dcd = Dcd::parse(&data, &test_ivt(DCD_ADDR)).unwrap().unwrap();
            assert_eq!(dcd.version, version);
        }
    }

    #[test]
    fn table_overrunning_image_is_truncated() {
        let mut data = image_with_dcd(0x41, &[]);
        // Claim 0x100 bytes of body that the image does not have.
        data[0x21..0x23].copy_from_slice(&0x0104u16.to_be_bytes());
        let err = Dcd::parse(&data, &test_ivt(DCD_ADDR)).unwrap_err();
        assert!(matches!(err, ParseError::Truncated { .. }));
    }

    #[test]
    fn write_command_pairs_decode_in_order() {
        let body = write_command(&[(0x021B_0000, 0x8419_0000), (0x021B_001C, 0x0400_8032)]);
        let data = image_with_dcd(0x41, &body);
        let dcd = Dcd::parse(&data, &test_ivt(DCD_ADDR)).unwrap().unwrap();

        let commands: Vec<_> = dcd.commands().collect::<Result<_, _>>().unwrap();
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].tag, CommandTag::WriteData);
        assert_eq!(commands[0].parameter, 0x04);

        let writes: Vec<_> = commands[0].writes().collect();
        assert_eq!(writes, vec![
            (0x021B_0000, 0x8419_0000),
            (0x021B_001C, 0x0400_8032),
        ]);
    }

    #[test]
    fn multiple_commands_walk_cleanly() {
        let mut body = write_command(&[(0x021B_0000, 1)]);
        body.extend_from_slice(&write_command(&[(0x021B_0004, 2), (0x021B_0008, 3)]));
        let data = image_with_dcd(0x41, &body);
        let dcd = Dcd::parse(&data, &test_ivt(DCD_ADDR)).unwrap().unwrap();

        let commands: Vec<_> = dcd.commands().collect::<Result<_, _>>().unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].writes().count(), 1);
        assert_eq!(commands[1].writes().count(), 2);
    }

    #[test]
    fn unknown_command_tag_is_unsupported_and_fuses() {
        let mut body = write_command(&[(0x021B_0000, 1)]);
        let mut check = vec![0xCF, 0x00, 0x0C, 0x04];
        check.extend_from_slice(&[0; 8]);
        body.extend_from_slice(&check);
        // A further valid command that must never be reached.
        body.extend_from_slice(&write_command(&[(0x021B_0004, 2)]));

        let data = image_with_dcd(0x41, &body);
        let dcd = Dcd::parse(&data, &test_ivt(DCD_ADDR)).unwrap().unwrap();

        let mut commands = dcd.commands();
        assert!(commands.next().unwrap().is_ok());
        let err = commands.next().unwrap().unwrap_err();
        assert!(matches!(err, ParseError::Unsupported { tag: 0xCF, .. }));
        assert!(commands.next().is_none());
    }

    #[test]
    fn command_overrunning_body_is_truncated() {
        let mut body = write_command(&[(0x021B_0000, 1)]);
        // Inflate the declared command length past the table body.
        body[1..3].copy_from_slice(&0x40u16.to_be_bytes());
        let data = image_with_dcd(0x41, &body);
        let dcd = Dcd::parse(&data, &test_ivt(DCD_ADDR)).unwrap().unwrap();
        let err = dcd.commands().next().unwrap().unwrap_err();
        assert!(matches!(err, ParseError::Truncated { .. }));
    }

    #[test]
    fn ragged_write_payload_is_malformed() {
        // 4-byte header + 12-byte payload: not a whole number of pairs.
        let mut body = vec![0xCC, 0x00, 0x10, 0x04];
        body.extend_from_slice(&[0; 12]);
        let data = image_with_dcd(0x41, &body);
        let dcd = Dcd::parse(&data, &test_ivt(DCD_ADDR)).unwrap().unwrap();
        let err = dcd.commands().next().unwrap().unwrap_err();
        assert!(matches!(err, ParseError::Malformed { .. }));
    }
}
