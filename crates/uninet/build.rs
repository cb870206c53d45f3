use std::error::Error;
use std::fs;
use std::path::Path;

use clap::CommandFactory;

// cli.rs is self-contained (clap + clap_complete only), which lets the
// build script include it without compiling the rest of the crate.
#[path = "src/cli.rs"]
mod cli;

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo::rerun-if-changed=src/cli.rs");

    let out_dir = std::env::var_os("OUT_DIR").ok_or("OUT_DIR not set by Cargo")?;
    let man_dir = Path::new(&out_dir).join("man");
    fs::create_dir_all(&man_dir)?;

    // Walk the command tree; subcommand pages follow the man convention
    // of parent-child.1.
    let mut pending = vec![cli::Cli::command()];
    while let Some(cmd) = pending.pop() {
        let name = cmd.get_name().to_owned();

        for sub in cmd.get_subcommands() {
            if sub.is_hide_set() {
                continue;
            }
            pending.push(sub.clone().name(format!("{name}-{}", sub.get_name())));
        }

        let mut page = Vec::new();
        clap_mangen::Man::new(cmd).render(&mut page)?;
        fs::write(man_dir.join(format!("{name}.1")), page)?;
    }

    Ok(())
}
