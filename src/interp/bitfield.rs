// SPDX-License-Identifier: GPL-3.0-or-later

/// Extracts the subfield selected by `mask`, shifted down to bit 0.
pub fn extract(value: u32, mask: u32) -> u32 {
    if mask == 0 {
        return 0;
    }
    (value & mask) >> mask.trailing_zeros()
}

/// How a raw subfield turns into the displayed value. These are the value
/// encodings the MMDC manual uses over and over.
#[derive(Debug, Clone, Copy)]
pub enum Transform {
    /// The bits as-is.
    Raw,
    /// The bits as-is, in hex.
    Hex,
    /// Hardware counts from zero: displayed = field + n.
    Plus(u32),
    /// displayed = field * mul + add.
    ScaleAdd { mul: u32, add: u32 },
    /// displayed = base << field.
    Shift { base: u32 },
    /// Zero means disabled; otherwise base << (field - bias).
    ShiftOrDisabled { base: u32, bias: u32 },
    /// Small enumerations; unlisted values render as the fallback.
    Enum {
        variants: &'static [(u32, &'static str)],
        fallback: &'static str,
    },
    /// Anything the variants above cannot express.
    Custom(fn(u32) -> String),
}

impl Transform {
    pub fn apply(&self, field: u32) -> String {
        match *self {
            Transform::Raw => field.to_string(),
            Transform::Hex => format!("{:#x}", field),
            Transform::Plus(n) => (field + n).to_string(),
            Transform::ScaleAdd { mul, add } => (field * mul + add).to_string(),
            Transform::Shift { base } => (base << field).to_string(),
            Transform::ShiftOrDisabled { base, bias } => {
                if field == 0 {
                    "DIS".to_string()
                } else {
                    (base << (field - bias)).to_string()
                }
            }
            Transform::Enum { variants, fallback } => variants
                .iter()
                .find(|(v, _)| *v == field)
                .map_or(fallback, |(_, name)| name)
                .to_string(),
            Transform::Custom(f) => f(field),
        }
    }
}

/// One named subfield of a 32-bit register.
pub struct Field {
    pub name: &'static str,
    pub mask: u32,
    pub transform: Transform,
}

impl Field {
    pub fn decode(&self, value: u32) -> String {
        format!("{}={}", self.name, self.transform.apply(extract(value, self.mask)))
    }
}
