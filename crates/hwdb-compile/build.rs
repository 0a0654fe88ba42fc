use clap::CommandFactory;
use clap_complete::{Shell, generate_to};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::io::Result;
use std::path::PathBuf;

#[path = "src/cli.rs"]
mod cli;

const BIN_NAME: &str = "hwdb-compile";

fn main() -> Result<()> {
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR not set"));
    let mut cmd = cli::CompileArgs::command();

    // Man page
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;
    let mut man_buffer = Vec::new();
    Man::new(cmd.clone()).render(&mut man_buffer)?;
    fs::write(man_dir.join(format!("{BIN_NAME}.1")), man_buffer)?;

    // Shell completions
    let comp_dir = out_dir.join("completions");
    fs::create_dir_all(&comp_dir)?;
    for shell in [Shell::Bash, Shell::Fish, Shell::Zsh] {
        generate_to(shell, &mut cmd, BIN_NAME, &comp_dir)?;
    }

    println!(
        "cargo:warning=Generated man page and completions to {:?}",
        out_dir
    );

    Ok(())
}
