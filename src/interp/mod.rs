// SPDX-License-Identifier: GPL-3.0-or-later

pub mod bitfield;
mod imx6;

pub use imx6::Imx6Interpreter;

use clap::ArgEnum;

/// Target device the image is meant for. Selects which register
/// interpreter annotates the DCD write commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ArgEnum)]
pub enum Device {
    Imx53,
    Imx6dq,
    Imx6sdl,
    Imx6sx,
    Imx6sl,
}

/// Describes one DCD register write. Pure: implementations return the
/// description, the dump layer prints it.
pub trait RegInterpreter {
    fn interpret(&self, address: u32, value: u32) -> String;
}

/// Devices without a register catalog get the raw hex/binary formatting.
pub fn interpreter_for(device: Device) -> Box<dyn RegInterpreter> {
    match device {
        Device::Imx53 => Box::new(DefaultInterpreter),
        Device::Imx6dq | Device::Imx6sdl | Device::Imx6sx | Device::Imx6sl => {
            Box::new(Imx6Interpreter)
        }
    }
}

pub struct DefaultInterpreter;

impl RegInterpreter for DefaultInterpreter {
    fn interpret(&self, address: u32, value: u32) -> String {
        format!("{:#010x}={:#010x}({})", address, value, binary_grouped(value))
    }
}

/// The 32 bits in space-separated 4-bit clusters, msb first, for eyeballing
/// fields against the reference manual.
pub fn binary_grouped(value: u32) -> String {
    let mut out = String::with_capacity(39);
    for nibble in (0..8).rev() {
        if nibble != 7 {
            out.push(' ');
        }
        for bit in (0..4).rev() {
            out.push(if value >> (nibble * 4 + bit) & 1 == 1 { '1' } else { '0' });
        }
    }
    out
}
