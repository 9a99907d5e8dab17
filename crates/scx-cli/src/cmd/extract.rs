//! `scx extract`: list the scripture citations found in a text file.

use crate::output::{
    CliError, OutputMode, pretty_kv, pretty_rule, render_error, render_json, render_mode,
};
use anyhow::Context;
use clap::Args;
use scx_core::error::ErrorCode;
use scx_core::timing::timed;
use scx_core::{PassageMention, mentions_for};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
#[command(
    about = "Extract scripture citations from a text file",
    after_help = "EXAMPLES:\n    # List citations in a commentary\n    scx extract notes.txt\n\n\
                  # Produce mention rows for explanation 42\n    scx extract notes.txt --explanation-id 42 --json\n\n\
                  # Read from stdin\n    echo 'See Jn 3:16' | scx extract -"
)]
pub struct ExtractArgs {
    /// Text file to scan, or `-` for stdin.
    pub file: PathBuf,

    /// Parent explanation id to attach to each mention.
    #[arg(long)]
    pub explanation_id: Option<String>,
}

pub fn run_extract(args: &ExtractArgs, output: OutputMode) -> anyhow::Result<()> {
    let text = match read_input(&args.file) {
        Ok(text) => text,
        Err(e) => {
            render_error(output, &CliError::new(ErrorCode::InputReadFailed, format!("{e:#}")))?;
            return Err(e);
        }
    };

    let id = args.explanation_id.as_deref().unwrap_or_default();
    let mentions = timed("extract", || mentions_for(id, &text));

    match (output.is_json(), args.explanation_id.is_some()) {
        (true, true) => render_json(&mentions),
        // Without an id, JSON output is the bare references.
        (true, false) => render_json(&mentions.iter().map(as_reference_json).collect::<Vec<_>>()),
        (false, _) => render_mode(
            output,
            &mentions,
            |m, w| render_text(m, w),
            |m, w| render_pretty(m, w),
        ),
    }
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("cannot read stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))
}

fn as_reference_json(mention: &PassageMention) -> serde_json::Value {
    serde_json::json!({
        "book": mention.book,
        "start_chapter": mention.start_chapter,
        "start_verse": mention.start_verse,
        "end_chapter": mention.end_chapter,
        "end_verse": mention.end_verse,
        "granularity": mention.granularity,
        "citation_text": mention.ref_citation,
    })
}

fn render_text(mentions: &[PassageMention], w: &mut dyn Write) -> std::io::Result<()> {
    for mention in mentions {
        writeln!(
            w,
            "{}\t{}\t{}",
            mention.span(),
            mention.granularity,
            mention.ref_citation
        )?;
    }
    Ok(())
}

fn render_pretty(mentions: &[PassageMention], w: &mut dyn Write) -> std::io::Result<()> {
    if mentions.is_empty() {
        return writeln!(w, "No citations found.");
    }
    writeln!(w, "Citations ({})", mentions.len())?;
    pretty_rule(w)?;
    for (i, mention) in mentions.iter().enumerate() {
        writeln!(w, "{:>2}. {}", i + 1, mention.span())?;
        pretty_kv(w, "  kind", mention.granularity.as_str())?;
        pretty_kv(w, "  matched", format!("\"{}\"", mention.ref_citation))?;
    }
    Ok(())
}
