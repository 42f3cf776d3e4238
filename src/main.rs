mod boot_data;
mod dcd;
mod error;
mod image;
mod interp;
mod ivt;
mod util;

use std::io::prelude::*;
use clap::Parser;
use clap::AppSettings;
use anyhow::{Result, Context};
use env_logger::fmt::Color;
use log::LevelFilter;

use boot_data::BootData;
use dcd::Dcd;
use image::Image;
use interp::{interpreter_for, Device, RegInterpreter};
use ivt::Ivt;
use util::read_file;

#[macro_use]
extern crate log;

/// Parse and dump IVT/DCD data from an i.MX boot image
#[derive(Parser, Debug)]
#[clap(
    global_setting(AppSettings::DeriveDisplayOrder)
)]
pub struct Args {
    /// File containing the i.MX boot image
    image: String,

    /// Target device, selects the register interpreter
    #[clap(short, long, arg_enum, default_value = "imx6dq")]
    device: Device,

    /// Verbosity. Can be repeated
    #[clap(short, long, parse(from_occurrences))]
    verbose: u8,
}

fn init_logging(level: u8) {
    let lf = match level {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(lf)
        .target(env_logger::Target::Stdout)
        .format(|buf, record| {
            let mut style = buf.style();
            let level = match record.level() {
                log::Level::Error => style.set_color(Color::Red).set_intense(true).value("ERROR"),
                log::Level::Warn =>  style.set_color(Color::Yellow).set_intense(true).value("WARN "),
                log::Level::Info =>  style.set_color(Color::Green).set_intense(true).value("INFO "),
                log::Level::Debug => style.set_color(Color::Cyan).set_intense(true).value("DEBUG"),
                log::Level::Trace => style.set_color(Color::Blue).set_intense(true).value("TRACE"),
            };

            writeln!(buf, "{} {}", level, record.args())
        })
        .init();
}

fn dump_ivt(ivt: &Ivt) {
    println!("=================IVT data===================");
    println!("ivt_length={:X}", ivt.length);
    println!("ivt_entry={:X}", ivt.entry);
    println!("ivt_dcd={:X}", ivt.dcd);
    println!("ivt_boot_data={:X}", ivt.boot_data);
    println!("ivt_self={:X}", ivt.self_addr);
    println!("ivt_csf={:X}", ivt.csf);

    if ivt.csf != 0 {
        info!("CSF present, image is signed");
    }
}

fn dump_boot_data(boot_data: &BootData) {
    println!("================Boot data===================");
    println!("boot_data_start={:X}", boot_data.start);
    println!("boot_data_length={:X}", boot_data.length);
    println!("boot_data_plugin={:X}", boot_data.plugin);

    if boot_data.is_plugin() {
        info!("plugin image, runs before the main image");
    }
}

fn dump_dcd(dcd: &Dcd, interp: &dyn RegInterpreter) -> Result<()> {
    for command in dcd.commands() {
        let command = command?;
        println!("tag={:#04x} length={:#06x} param={:#04x}",
            command.tag as u8, command.length, command.parameter);

        for (address, value) in command.writes() {
            println!("{}", interp.interpret(address, value));
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let data = read_file(&args.image)?;
    let image = Image::parse(&data)
        .with_context(|| format!("Failed to parse {}", args.image))?;

    dump_ivt(&image.ivt);
    dump_boot_data(&image.boot_data);

    println!("=================DCD data===================");
    match &image.dcd {
        Some(dcd) => {
            let interp = interpreter_for(args.device);
            dump_dcd(dcd, interp.as_ref())
                .with_context(|| format!("Failed to dump DCD of {}", args.image))?;
        }
        None => println!("No DCD data in table"),
    }

    Ok(())
}
