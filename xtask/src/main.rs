//! xtask for fim - build automation and tooling
//!
//! This binary provides development tasks like man page generation.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "xtask", about = "Build automation for fim")]
enum Task {
    /// Generate man pages from clap definitions
    GenerateManPages {
        /// Output directory for man pages (default: ./man)
        #[arg(short, long, default_value = "man")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let task = Task::parse();

    match task {
        Task::GenerateManPages { output } => generate_man_pages(&output)?,
    }

    Ok(())
}

fn generate_man_pages(output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create directory: {}", output_dir.display()))?;

    let mut cmd = fim::cli::Cli::command();
    render(cmd.clone(), &output_dir.join("fim.1"))?;

    // One page per subcommand, named like git's (fim-check.1)
    for subcmd_name in ["init", "check", "list", "config"] {
        if let Some(subcmd) = cmd.find_subcommand_mut(subcmd_name) {
            let page = subcmd.clone().name(format!("fim-{subcmd_name}"));
            render(page, &output_dir.join(format!("fim-{subcmd_name}.1")))?;
        }
    }

    println!("Man pages written to {}", output_dir.display());

    Ok(())
}

fn render(cmd: clap::Command, path: &Path) -> Result<()> {
    let file = fs::File::create(path)
        .with_context(|| format!("Failed to create man page: {}", path.display()))?;
    clap_mangen::Man::new(cmd).render(&mut std::io::BufWriter::new(file))?;

    println!("✓ Generated: {}", path.display());
    Ok(())
}
