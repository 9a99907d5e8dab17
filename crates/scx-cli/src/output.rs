//! Shared output layer for pretty/text/JSON parity across CLI commands.
//!
//! The mode comes from the effective configuration, which applies the
//! precedence `--json` > `FORMAT` > user config > TTY detection.

use scx_core::config::ConfigError;
use scx_core::error::ErrorCode;
use serde::Serialize;
use std::io::{self, Write};

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

/// Column at which pretty output wraps long bodies.
pub const WRAP_WIDTH: usize = 88;

pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<12} {}", format!("{key}:"), value.as_ref())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-optimized output (sections, wrapped bodies).
    Pretty,
    /// Tab-separated rows for agents and pipes.
    Text,
    Json,
}

impl OutputMode {
    /// Map a resolved mode name; anything unrecognized is text.
    pub fn from_resolved(name: &str) -> Self {
        match name {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            _ => Self::Text,
        }
    }

    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Render a serializable value with explicit pretty/text renderers.
pub fn render_mode<T: Serialize>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    if mode.is_json() {
        return render_json(value);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if mode == OutputMode::Pretty {
        pretty_fn(value, &mut out)?;
    } else {
        text_fn(value, &mut out)?;
    }
    Ok(())
}

pub fn render_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

/// A structured error with a suggestion and stable codes.
#[derive(Debug, Serialize)]
pub struct CliError {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Snake-case error name, e.g. `empty_query`.
    pub error_code: &'static str,
    /// Stable `E####` identifier.
    pub code: &'static str,
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: code.hint().map(str::to_string),
            error_code: code.slug(),
            code: code.code(),
        }
    }
}

impl From<&ConfigError> for CliError {
    fn from(err: &ConfigError) -> Self {
        Self::new(ErrorCode::from(err), err.to_string())
    }
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    write_error(mode, error, &mut out)?;
    Ok(())
}

fn write_error(mode: OutputMode, error: &CliError, out: &mut dyn Write) -> anyhow::Result<()> {
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({ "error": error });
            serde_json::to_writer_pretty(&mut *out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            writeln!(out, "error: {}", error.message)?;
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

/// Greedy word wrap; continuation lines start with `indent`.
pub fn wrap(text: &str, width: usize, indent: &str) -> String {
    let mut out = String::new();
    let mut line_len = 0;
    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if line_len > 0 && line_len + 1 + word_len > width {
            out.push('\n');
            out.push_str(indent);
            line_len = indent.chars().count();
        } else if line_len > 0 {
            out.push(' ');
            line_len += 1;
        }
        out.push_str(word);
        line_len += word_len;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_names_map_to_modes() {
        assert_eq!(OutputMode::from_resolved("json"), OutputMode::Json);
        assert_eq!(OutputMode::from_resolved("pretty"), OutputMode::Pretty);
        assert_eq!(OutputMode::from_resolved("text"), OutputMode::Text);
        assert_eq!(OutputMode::from_resolved("yaml"), OutputMode::Text);
        assert!(OutputMode::Json.is_json());
    }

    #[test]
    fn json_error_is_wrapped_with_codes() {
        let error = CliError::new(ErrorCode::EmptyQuery, "search query must not be empty");
        let mut buf = Vec::new();
        write_error(OutputMode::Json, &error, &mut buf).expect("write");

        let value: serde_json::Value = serde_json::from_slice(&buf).expect("json");
        assert_eq!(value["error"]["error_code"], "empty_query");
        assert_eq!(value["error"]["code"], "E3001");
        assert_eq!(value["error"]["message"], "search query must not be empty");
        assert!(value["error"]["suggestion"].is_string());
    }

    #[test]
    fn text_error_has_suggestion_line() {
        let error = CliError::new(ErrorCode::InputReadFailed, "cannot read hits.json");
        let mut buf = Vec::new();
        write_error(OutputMode::Text, &error, &mut buf).expect("write");

        let text = String::from_utf8(buf).expect("utf8");
        assert!(text.starts_with("error: cannot read hits.json\n"));
        assert!(text.contains("  suggestion: Check the path"));
    }

    #[test]
    fn wrap_breaks_on_word_boundaries() {
        let wrapped = wrap("in the beginning was the word", 12, "  ");
        assert_eq!(wrapped, "in the\n  beginning\n  was the\n  word");
        assert_eq!(wrap("", 10, "  "), "");
    }
}
