//! `scx search`: hybrid passage search over file-backed stores.
//!
//! Lexical and vector rows are read from JSON files standing in for the
//! full-text and nearest-neighbour stores, then normalized, fused and
//! enriched exactly as a live store's rows would be.

use crate::fixtures::{FileBodies, FileLexical, FileVector, LoadError, NoopEmbedder};
use crate::output::{CliError, OutputMode, WRAP_WIDTH, pretty_rule, render_error, render_mode, wrap};
use clap::Args;
use scx_core::config::ProjectConfig;
use scx_core::error::ErrorCode;
use scx_search::{
    BodyLookup, Embedder, FusedHit, Providers, SearchError, SearchFilters, SearchRequest,
    SearchResponse, VectorSearch, search,
};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
#[command(
    about = "Search explanations by passage using hybrid ranking",
    long_about = "Fuse lexical and vector hits by passage identity and rank them by a weighted score.\n\n\
                  Weights come from .scx/config.toml and may be overridden with WEIGHT_FTS / WEIGHT_VEC.",
    after_help = "EXAMPLES:\n    # Lexical rows only\n    scx search 'grace' --lexical fts.json\n\n\
                  # Both channels plus bodies, preferring John\n    scx search 'born again' --lexical fts.json --vector vec.json --bodies bodies.json --book John\n\n\
                  # Machine-readable output\n    scx search 'grace' --lexical fts.json --json"
)]
pub struct SearchArgs {
    /// Free-text query.
    pub query: String,

    /// JSON array of lexical rows (`rank` higher is better).
    #[arg(long, value_name = "FILE")]
    pub lexical: PathBuf,

    /// JSON array of vector rows (`dist` lower is better).
    #[arg(long, value_name = "FILE")]
    pub vector: Option<PathBuf>,

    /// JSON array of `{id, body}` pairs.
    #[arg(long, value_name = "FILE")]
    pub bodies: Option<PathBuf>,

    /// Preferred book, passed to both stores.
    #[arg(long)]
    pub book: Option<String>,

    /// Preferred author, passed to both stores.
    #[arg(long)]
    pub author: Option<String>,

    /// Skip the vector channel even when `--vector` is given.
    #[arg(long)]
    pub lexical_only: bool,
}

pub fn run_search(
    args: &SearchArgs,
    output: OutputMode,
    config: &ProjectConfig,
) -> anyhow::Result<()> {
    if args.query.trim().is_empty() {
        return fail(output, ErrorCode::EmptyQuery, "search query must not be empty");
    }

    let lexical = load(output, &args.lexical, FileLexical::load)?;
    let vector = args
        .vector
        .as_deref()
        .map(|path| load(output, path, FileVector::load))
        .transpose()?;
    let bodies = args
        .bodies
        .as_deref()
        .map(|path| load(output, path, FileBodies::load))
        .transpose()?;

    let mut config = config.clone();
    if args.lexical_only {
        config.search.semantic = false;
    }

    let providers = Providers {
        lexical: &lexical,
        vector: vector.as_ref().map(|v| v as &dyn VectorSearch),
        embedder: vector.as_ref().map(|_| &NoopEmbedder as &dyn Embedder),
        bodies: bodies.as_ref().map(|b| b as &dyn BodyLookup),
    };
    let request = SearchRequest::new(args.query.as_str())
        .with_filters(SearchFilters::new(args.book.as_deref(), args.author.as_deref()));

    let response = match search(&request, providers, &config) {
        Ok(response) => response,
        Err(SearchError::EmptyQuery) => {
            return fail(output, ErrorCode::EmptyQuery, "search query must not be empty");
        }
        Err(e @ SearchError::Lexical { .. }) => {
            return fail(output, ErrorCode::LexicalSearchFailed, e.to_string());
        }
    };

    render_mode(output, &response, render_text, render_pretty)
}

fn fail(output: OutputMode, code: ErrorCode, message: impl Into<String>) -> anyhow::Result<()> {
    let error = CliError::new(code, message);
    render_error(output, &error)?;
    anyhow::bail!("{}", error.message)
}

fn load<T>(
    output: OutputMode,
    path: &Path,
    loader: impl FnOnce(&Path) -> Result<T, LoadError>,
) -> anyhow::Result<T> {
    loader(path).or_else(|e| {
        let code = match e {
            LoadError::Read(_) => ErrorCode::InputReadFailed,
            LoadError::Parse(_) => ErrorCode::InputParseFailed,
        };
        let source = e.into_inner();
        render_error(output, &CliError::new(code, format!("{source:#}")))?;
        Err(source)
    })
}

fn render_text(response: &SearchResponse, w: &mut dyn Write) -> std::io::Result<()> {
    for (i, hit) in response.results.iter().enumerate() {
        writeln!(
            w,
            "{}\t{}\t{:.3}\t{}",
            i + 1,
            hit.passage.span(),
            hit.score,
            hit.meta.title.as_deref().unwrap_or("")
        )?;
    }
    Ok(())
}

fn render_pretty(response: &SearchResponse, w: &mut dyn Write) -> std::io::Result<()> {
    if response.results.is_empty() {
        return writeln!(w, "No results.");
    }

    writeln!(w, "Query: {}", response.q)?;
    writeln!(
        w,
        "Weights → FTS: {}, Vector: {}",
        response.weights.fts, response.weights.vector
    )?;
    pretty_rule(w)?;
    for (i, hit) in response.results.iter().enumerate() {
        write_hit(w, i + 1, hit)?;
    }
    Ok(())
}

fn write_hit(w: &mut dyn Write, position: usize, hit: &FusedHit) -> std::io::Result<()> {
    writeln!(w, "{position:>2}. {}", hit.passage.span())?;
    writeln!(w, "    • {}", hit.meta.title.as_deref().unwrap_or("(untitled)"))?;
    if let Some(author) = &hit.meta.author {
        writeln!(w, "      author: {author}")?;
    }
    writeln!(w, "      score: {:.3}", hit.score)?;
    if let Some(body) = hit.body.as_deref().filter(|b| !b.trim().is_empty()) {
        writeln!(w, "      body: {}", wrap(body, WRAP_WIDTH, "      "))?;
    }
    writeln!(w)
}
