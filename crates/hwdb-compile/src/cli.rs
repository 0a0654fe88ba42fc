use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Compile hardware description files into a binary match database"
)]
pub struct CompileArgs {
    /// Rebuild the database from the source directories
    #[arg(long)]
    pub update: bool,

    /// Where to write the database
    #[arg(short = 'o', long, default_value = "hwdb.bin")]
    pub output: PathBuf,

    /// Source directory scanned for .hwdb files (repeatable; later
    /// directories override earlier ones)
    #[arg(short = 'd', long = "dir")]
    pub dirs: Vec<PathBuf>,

    /// Verbose output
    #[arg(short = 'v', long)]
    pub verbose: bool,
}
