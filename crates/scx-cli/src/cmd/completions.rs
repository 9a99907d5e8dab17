//! `scx completions`: shell completion scripts.

use clap::Args;
use clap_complete::{Shell, generate};
use std::io::Write;

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run_completions(
    args: &CompletionsArgs,
    mut command: clap::Command,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let name = command.get_name().to_string();
    generate(args.shell, &mut command, name, out);
    out.flush()?;
    Ok(())
}
