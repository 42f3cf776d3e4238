// SPDX-License-Identifier: GPL-3.0-or-later

use std::collections::BTreeMap;

use super::bitfield::{Field, Transform::*};
use super::{binary_grouped, DefaultInterpreter, RegInterpreter};

lazy_static::lazy_static! {
    /// MMDC registers of interest for both controllers. Lookups are by
    /// exact address only; the map is never traversed for output.
    static ref MMDC_REGS: BTreeMap<u32, &'static str> = BTreeMap::from([
        (0x021B_0000, "MMDC0_MDCTL"),
        (0x021B_4000, "MMDC1_MDCTL"),
        (0x021B_0004, "MMDC0_MDPDC"),
        (0x021B_4004, "MMDC1_MDPDC"),
        (0x021B_0008, "MMDC0_MDOTC"),
        (0x021B_4008, "MMDC1_MDOTC"),
        (0x021B_000C, "MMDC0_MDCFG0"),
        (0x021B_400C, "MMDC1_MDCFG0"),
        (0x021B_0010, "MMDC0_MDCFG1"),
        (0x021B_4010, "MMDC1_MDCFG1"),
        (0x021B_0014, "MMDC0_MDCFG2"),
        (0x021B_4014, "MMDC1_MDCFG2"),
        (0x021B_0018, "MMDC0_MDMISC"),
        (0x021B_4018, "MMDC1_MDMISC"),
        (0x021B_001C, "MMDC0_MDSCR"),
        (0x021B_401C, "MMDC1_MDSCR"),
        (0x021B_0020, "MMDC0_MDREF"),
        (0x021B_4020, "MMDC1_MDREF"),
        (0x021B_002C, "MMDC0_MDRWD"),
        (0x021B_402C, "MMDC1_MDRWD"),
        (0x021B_0030, "MMDC0_MDOR"),
        (0x021B_4030, "MMDC1_MDOR"),
        (0x021B_0038, "MMDC0_MDCFG3LP"),
        (0x021B_4038, "MMDC1_MDCFG3LP"),
        (0x021B_003C, "MMDC0_MDMR4"),
        (0x021B_403C, "MMDC1_MDMR4"),
        (0x021B_0040, "MMDC0_MDASP"),
        (0x021B_4040, "MMDC1_MDASP"),
        (0x021B_0404, "MMDC0_MAPSR"),
        (0x021B_4404, "MMDC1_MAPSR"),
        (0x021B_0800, "MMDC0_MPZQHWCTRL"),
        (0x021B_4800, "MMDC1_MPZQHWCTRL"),
        (0x021B_0804, "MMDC0_MPZQSWCTRL"),
        (0x021B_4804, "MMDC1_MPZQSWCTRL"),
        (0x021B_0808, "MMDC0_MPWLGCR"),
        (0x021B_4808, "MMDC1_MPWLGCR"),
        (0x021B_080C, "MMDC0_MPWLDECTRL0"),
        (0x021B_480C, "MMDC1_MPWLDECTRL0"),
        (0x021B_0810, "MMDC0_MPWLDECTRL1"),
        (0x021B_4810, "MMDC1_MPWLDECTRL1"),
        (0x021B_0818, "MMDC0_MPODTCTRL"),
        (0x021B_4818, "MMDC1_MPODTCTRL"),
        (0x021B_081C, "MMDC0_MPRDDQBY0DL"),
        (0x021B_481C, "MMDC1_MPRDDQBY0DL"),
        (0x021B_0820, "MMDC0_MPRDDQBY1DL"),
        (0x021B_4820, "MMDC1_MPRDDQBY1DL"),
        (0x021B_0824, "MMDC0_MPRDDQBY2DL"),
        (0x021B_4824, "MMDC1_MPRDDQBY2DL"),
        (0x021B_0828, "MMDC0_MPRDDQBY3DL"),
        (0x021B_4828, "MMDC1_MPRDDQBY3DL"),
        (0x021B_082C, "MMDC0_MPWRDQBY0DL"),
        (0x021B_482C, "MMDC1_MPWRDQBY0DL"),
        (0x021B_0830, "MMDC0_MPWRDQBY1DL"),
        (0x021B_4830, "MMDC1_MPWRDQBY1DL"),
        (0x021B_0834, "MMDC0_MPWRDQBY2DL"),
        (0x021B_4834, "MMDC1_MPWRDQBY2DL"),
        (0x021B_0838, "MMDC0_MPWRDQBY3DL"),
        (0x021B_4838, "MMDC1_MPWRDQBY3DL"),
        (0x021B_083C, "MMDC0_MPDGCTRL0"),
        (0x021B_483C, "MMDC1_MPDGCTRL0"),
        (0x021B_0840, "MMDC0_MPDGCTRL1"),
        (0x021B_4840, "MMDC1_MPDGCTRL1"),
        (0x021B_0848, "MMDC0_MPRDDLCTL"),
        (0x021B_4848, "MMDC1_MPRDDLCTL"),
        (0x021B_0850, "MMDC0_MPWRDLCTL"),
        (0x021B_4850, "MMDC1_MPWRDLCTL"),
        (0x021B_0858, "MMDC0_MPSDCTRL"),
        (0x021B_4858, "MMDC1_MPSDCTRL"),
        (0x021B_0860, "MMDC0_MPRDDLHWCTL"),
        (0x021B_4860, "MMDC1_MPRDDLHWCTL"),
        (0x021B_0864, "MMDC0_MPWRDLHWCTL"),
        (0x021B_4864, "MMDC1_MPWRDLHWCTL"),
        (0x021B_088C, "MMDC0_MPPDCMPR1"),
        (0x021B_488C, "MMDC1_MPPDCMPR1"),
        (0x021B_0890, "MMDC0_MPPDCMPR2"),
        (0x021B_4890, "MMDC1_MPPDCMPR2"),
        (0x021B_08B8, "MMDC0_MPMUR0"),
        (0x021B_48B8, "MMDC1_MPMUR0"),
        (0x021B_08BC, "MMDC0_MPWRCADL"),
        (0x021B_48BC, "MMDC1_MPWRCADL"),
    ]);
}

pub fn register_name(address: u32) -> Option<&'static str> {
    MMDC_REGS.get(&address).copied()
}

// Timings are in memory clock cycles. Most counters are stored zero-based,
// hence the Plus(1) everywhere.

static MDCTL: &[Field] = &[
    Field { name: "SDE_0", mask: 0x8000_0000, transform: Raw },
    Field { name: "SDE_1", mask: 0x4000_0000, transform: Raw },
    Field { name: "ROW", mask: 0x0700_0000, transform: Plus(11) },
    Field { name: "COL", mask: 0x0070_0000, transform: Plus(9) },
    Field { name: "BL", mask: 0x0008_0000, transform: ScaleAdd { mul: 4, add: 4 } },
    Field { name: "DSIZ", mask: 0x0003_0000, transform: Shift { base: 16 } },
];

static MDPDC: &[Field] = &[
    Field { name: "PRCT_1", mask: 0x7000_0000, transform: ShiftOrDisabled { base: 1, bias: 0 } },
    Field { name: "PRCT_0", mask: 0x0700_0000, transform: ShiftOrDisabled { base: 1, bias: 0 } },
    Field { name: "tCKE", mask: 0x0007_0000, transform: Plus(1) },
    Field { name: "PWDT_1", mask: 0x0000_F000, transform: ShiftOrDisabled { base: 16, bias: 1 } },
    Field { name: "PWDT_0", mask: 0x0000_0F00, transform: ShiftOrDisabled { base: 16, bias: 1 } },
    Field { name: "SLOW_PD", mask: 0x0000_0080, transform: Raw },
    Field { name: "tCKSRX", mask: 0x0000_0038, transform: Raw },
    Field { name: "tCKSRE", mask: 0x0000_0007, transform: Raw },
];

static MDOTC: &[Field] = &[
    Field { name: "tAOFPD", mask: 0x3800_0000, transform: Plus(1) },
    Field { name: "tAONPD", mask: 0x0300_0000, transform: Plus(1) },
    Field { name: "tANPD", mask: 0x00F0_0000, transform: Plus(1) },
    Field { name: "tAXPD", mask: 0x000F_0000, transform: Plus(1) },
];

static MDCFG0: &[Field] = &[
    Field { name: "tRFC", mask: 0xFF00_0000, transform: Plus(1) },
    Field { name: "tXS", mask: 0x00FF_0000, transform: Plus(1) },
    Field { name: "tXP", mask: 0x0000_E000, transform: Plus(1) },
    Field { name: "tXPDLL", mask: 0x0000_1E00, transform: Plus(1) },
    Field { name: "tFAW", mask: 0x0000_01F0, transform: Plus(1) },
    Field { name: "tCL", mask: 0x0000_000F, transform: Plus(3) },
];

static MDCFG1: &[Field] = &[
    Field { name: "tRCD", mask: 0xE000_0000, transform: Plus(1) },
    Field { name: "tRP", mask: 0x1C00_0000, transform: Plus(1) },
    Field { name: "tRC", mask: 0x03E0_0000, transform: Plus(1) },
    Field { name: "tRAS", mask: 0x001F_0000, transform: Plus(1) },
    Field { name: "tRPA", mask: 0x0000_8000, transform: Enum {
        variants: &[(0, "tRP"), (1, "tRP+1")], fallback: "tRP",
    } },
    Field { name: "tWR", mask: 0x0000_0E00, transform: Plus(1) },
    Field { name: "tMRD", mask: 0x0000_01E0, transform: Plus(1) },
    Field { name: "_tCWL", mask: 0x0000_0007, transform: Custom(|f| format!("{:#x}", f + 1)) },
];

static MDCFG2: &[Field] = &[
    Field { name: "tDLLK", mask: 0x01FF_0000, transform: Plus(1) },
    Field { name: "tRTP", mask: 0x0000_01C0, transform: Plus(1) },
    Field { name: "tWTR", mask: 0x0000_0038, transform: Plus(1) },
    Field { name: "tRRD", mask: 0x0000_0007, transform: Plus(1) },
];

static MDMISC: &[Field] = &[
    Field { name: "CALIB_PER_CS", mask: 0x0010_0000, transform: Raw },
    Field { name: "ADDR_MIRROR", mask: 0x0008_0000, transform: Raw },
    Field { name: "LHD", mask: 0x0004_0000, transform: Raw },
    Field { name: "WALAT", mask: 0x0003_0000, transform: Raw },
    Field { name: "BI_ON", mask: 0x0000_1000, transform: Raw },
    Field { name: "LPDDR2_S2", mask: 0x0000_0800, transform: Raw },
    Field { name: "MIF3_MODE", mask: 0x0000_0600, transform: Hex },
    Field { name: "RALAT", mask: 0x0000_01C0, transform: Raw },
    Field { name: "DDR_4_BANK", mask: 0x0000_0020, transform: Raw },
    Field { name: "DDR_TYPE", mask: 0x0000_0018, transform: Enum {
        variants: &[(0, "DDR3"), (1, "LPDDR2")], fallback: "RESERVED",
    } },
    Field { name: "LPDDR2_2CH", mask: 0x0000_0004, transform: Raw },
    Field { name: "RST", mask: 0x0000_0002, transform: Raw },
];

static MDSCR: &[Field] = &[
    Field { name: "CMD_ADDR_MSB_MR_OP", mask: 0xFF00_0000, transform: Hex },
    Field { name: "CMD_ADDR_LSB_MR_OP", mask: 0x00FF_0000, transform: Hex },
    Field { name: "CON_REQ", mask: 0x0000_8000, transform: Raw },
    Field { name: "WL_EN", mask: 0x0000_0200, transform: Raw },
    Field { name: "CMD", mask: 0x0000_0070, transform: Enum {
        variants: &[
            (0, "normal op"),
            (1, "precharge all"),
            (2, "auto refresh cmd"),
            (3, "LMR/MRW"),
            (4, "ZQ calibration"),
            (5, "precharge all"),
            (6, "MRR"),
        ],
        fallback: "RESERVED",
    } },
    Field { name: "CMD_CS", mask: 0x0000_0008, transform: Raw },
    Field { name: "CMD_BA", mask: 0x0000_0007, transform: Raw },
];

static MDASP: &[Field] = &[
    Field { name: "CS0_END", mask: 0x0000_007F, transform: Custom(cs0_end) },
];

fn cs0_end(field: u32) -> String {
    let mbit = (field + 1) * 256;
    format!("{:#x}({}Mb, {}MB)", field, mbit, mbit / 8)
}

/// Bit 14 of the address distinguishes MMDC1 from MMDC0; the field layout
/// is shared between the two controllers.
fn detail_fields(address: u32) -> Option<&'static [Field]> {
    match address & !0x4000 {
        0x021B_0000 => Some(MDCTL),
        0x021B_0004 => Some(MDPDC),
        0x021B_0008 => Some(MDOTC),
        0x021B_000C => Some(MDCFG0),
        0x021B_0010 => Some(MDCFG1),
        0x021B_0014 => Some(MDCFG2),
        0x021B_0018 => Some(MDMISC),
        0x021B_001C => Some(MDSCR),
        0x021B_0040 => Some(MDASP),
        _ => None,
    }
}

/// Interpreter for the i.MX6 family: names the MMDC registers and breaks
/// the interesting ones down into their subfields.
pub struct Imx6Interpreter;

impl RegInterpreter for Imx6Interpreter {
    fn interpret(&self, address: u32, value: u32) -> String {
        let name = match register_name(address) {
            Some(name) => name,
            None => return DefaultInterpreter.interpret(address, value),
        };

        let mut out = format!("{:<18} = {:#010x}({})", name, value, binary_grouped(value));
        if let Some(fields) = detail_fields(address) {
            let details: Vec<String> = fields.iter().map(|f| f.decode(value)).collect();
            out.push_str("\n\t");
            out.push_str(&details.join(" "));
        }
        out
    }
}
