use std::path::PathBuf;

use clap::Parser;

use octet_core::CYCLES_PER_FRAME;

mod keymap;
mod run;

/// A CHIP-8 interpreter
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the ROM file to run
    rom: PathBuf,

    /// Instructions executed per 1/60s frame
    #[arg(short, long, default_value_t = CYCLES_PER_FRAME)]
    cycles_per_frame: usize,

    /// Window pixels per CHIP-8 pixel
    #[arg(short, long, default_value_t = 10)]
    scale: u32,

    /// Seed for the random number generator
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let settings = run::Settings {
        rom: args.rom,
        cycles_per_frame: args.cycles_per_frame,
        scale: args.scale,
        seed: args.seed,
    };
    run::run(&settings)
}
