// src/error.rs
// =============================================================================
// Error types for the endpoint finder.
//
// There are two families of errors:
// - FetchError: something went wrong for ONE target URL. These never stop the
//   scan; the URL is reported and contributes zero endpoints.
// - FinderError: something went wrong while setting the run up (no input,
//   unreadable list file, output file can't be created...). These are fatal
//   and end the process before any network activity.
//
// Rust concepts:
// - thiserror: derive macro that implements std::error::Error and Display
// - #[source] / #[from]: keep the underlying error attached for context
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Failure while fetching a single target.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The URL could not be turned into a request (malformed URL).
    #[error("could not create request: {0}")]
    RequestConstruction(#[source] reqwest::Error),

    /// DNS failure, refused connection, TLS failure, timeout...
    #[error("http request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with anything other than 200 OK.
    #[error("bad status code: {0}")]
    NonOkStatus(u16),

    /// The response started but the body could not be read.
    #[error("could not read response body: {0}")]
    BodyRead(#[source] reqwest::Error),
}

/// Fatal setup errors. Any of these aborts the run with a non-zero exit code.
#[derive(Debug, Error)]
pub enum FinderError {
    #[error("No input provided. Please use -u, -l, or pipe data from stdin.")]
    InputUnavailable,

    #[error("The file '{}' was not found: {source}", .path.display())]
    InputFileMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read input: {0}")]
    InputRead(#[from] std::io::Error),

    #[error("could not create output file '{}': {source}", .path.display())]
    OutputFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("could not build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("invalid endpoint pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_matches_console_format() {
        let err = FetchError::NonOkStatus(404);
        assert_eq!(err.to_string(), "bad status code: 404");
    }

    #[test]
    fn test_input_file_missing_names_the_path() {
        let err = FinderError::InputFileMissing {
            path: PathBuf::from("urls.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let message = err.to_string();
        assert!(message.contains("'urls.txt'"));
        assert!(message.contains("gone"));
    }
}
