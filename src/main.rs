use anyhow::Result;
use clap::Parser;

mod icon_gen;
mod render;

use icon_gen::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    icon_gen::generate_icons(args)
}
