use crate::cpu::Quirks;
use crate::scheduler::DEFAULT_RATE_HZ;
use clap::Parser;
use minifb::Scale;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chip8-vm")]
#[command(about = "A CHIP-8 virtual machine")]
pub struct Config {
    /// Program image to load at 0x200
    pub rom: PathBuf,

    /// Instructions executed per second
    #[arg(long, default_value_t = DEFAULT_RATE_HZ, value_parser = clap::value_parser!(u32).range(1..))]
    pub rate: u32,

    /// Start with the original COSMAC VIP semantics instead of the modern ones
    #[arg(long)]
    pub legacy: bool,

    /// Trace every executed instruction
    #[arg(long)]
    pub verbose: bool,

    /// Start with execution paused
    #[arg(long)]
    pub paused: bool,

    /// Window scale factor
    #[arg(long, default_value_t = 16, value_parser = parse_scale)]
    pub scale: usize,

    /// Disable the sound timer tone
    #[arg(long)]
    pub mute: bool,

    /// Seed for the random number instruction
    #[arg(long)]
    pub seed: Option<u64>,
}

fn parse_scale(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(scale @ (1 | 2 | 4 | 8 | 16 | 32)) => Ok(scale),
        _ => Err(format!("{} is not one of 1, 2, 4, 8, 16, 32", s)),
    }
}

impl Config {
    pub fn quirks(&self) -> Quirks {
        if self.legacy {
            Quirks::Legacy
        } else {
            Quirks::Modern
        }
    }

    pub fn window_scale(&self) -> Scale {
        match self.scale {
            1 => Scale::X1,
            2 => Scale::X2,
            4 => Scale::X4,
            8 => Scale::X8,
            32 => Scale::X32,
            _ => Scale::X16,
        }
    }
}
