use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
pub struct Cli {
    /// Boot loader binary, at most one sector
    #[arg(long, short, default_value = "loader.bin")]
    pub loader: PathBuf,

    /// Data file to put in the root directory, may be repeated
    #[arg(long = "file", short = 'f', default_values = ["MSG1.TXT", "APP1.BIN"])]
    pub files: Vec<PathBuf>,

    /// Output image
    #[arg(long, short, default_value = "bootable_disk.img")]
    pub output: PathBuf,

    /// Write the layout as NASM `equ` constants to this file
    #[arg(long)]
    pub equ: Option<PathBuf>,
}
