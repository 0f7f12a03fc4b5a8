// src/input.rs
// =============================================================================
// Collects the list of target URLs.
//
// Sources, in order of precedence:
//   1. -u <url>    a single URL
//   2. -l <path>   a file with one URL per line
//   3. stdin       only when something is piped in (not a terminal)
//
// Blank lines are skipped and surrounding whitespace is trimmed. Duplicate
// URLs are kept: each occurrence is scanned on its own.
// =============================================================================

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use crate::cli::Cli;
use crate::error::FinderError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Single(String),
    List(PathBuf),
    Stdin,
    Missing,
}

impl InputSource {
    /// Picks the input source from the command line.
    ///
    /// `stdin_is_piped` is passed in rather than probed here so tests
    /// don't depend on how the test harness wires stdin.
    pub fn select(cli: &Cli, stdin_is_piped: bool) -> Self {
        match (&cli.url, &cli.list) {
            (Some(url), _) if !url.trim().is_empty() => InputSource::Single(url.trim().to_string()),
            (_, Some(path)) => InputSource::List(path.clone()),
            _ if stdin_is_piped => InputSource::Stdin,
            _ => InputSource::Missing,
        }
    }
}

/// Reads every target URL from the chosen source.
///
/// An empty result (no source, or only blank lines) is `InputUnavailable`.
pub fn read_targets(source: &InputSource) -> Result<Vec<String>, FinderError> {
    let targets = match source {
        InputSource::Single(url) => vec![url.clone()],
        InputSource::List(path) => {
            let file = File::open(path).map_err(|source| FinderError::InputFileMissing {
                path: path.clone(),
                source,
            })?;
            read_lines(BufReader::new(file))?
        }
        InputSource::Stdin => read_lines(std::io::stdin().lock())?,
        InputSource::Missing => Vec::new(),
    };

    if targets.is_empty() {
        return Err(FinderError::InputUnavailable);
    }

    tracing::debug!(count = targets.len(), "collected targets");
    Ok(targets)
}

/// Reads non-blank, trimmed lines from any buffered reader.
pub fn read_lines<R: BufRead>(reader: R) -> Result<Vec<String>, FinderError> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
    Ok(lines)
}
