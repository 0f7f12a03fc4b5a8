// src/report/mod.rs
// =============================================================================
// Everything the user sees.
//
// Three output modes:
// - human (default): progress lines while scanning + a summary at the end
// - quiet (-q):      just the sorted unique endpoints, one per line
// - json (--json):   one JSON document with endpoints and failures
//
// If -o was given, the sorted list is ALSO written to that file, whatever the
// mode. The file is created up front (see create_output_file) so a bad path
// fails before we send a single request.
// =============================================================================

mod theme;

pub use theme::Theme;

use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::ScanConfig;
use crate::error::{FetchError, FinderError};
use crate::scanner::{ScanFailure, ScanObserver, ScanOutcome};

/// The output file, opened before the scan starts.
pub struct OutputFile {
    path: PathBuf,
    file: File,
}

/// Creates (or truncates) the output file.
pub fn create_output_file(path: &Path) -> Result<OutputFile, FinderError> {
    let file = File::create(path).map_err(|source| FinderError::OutputFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(OutputFile {
        path: path.to_path_buf(),
        file,
    })
}

/// Writes one endpoint per line.
pub fn write_endpoints<W: Write>(writer: W, endpoints: &[String]) -> io::Result<()> {
    let mut writer = BufWriter::new(writer);
    for endpoint in endpoints {
        writeln!(writer, "{}", endpoint)?;
    }
    writer.flush()
}

/// One-line banner shown above the usage text when there is no input.
pub fn banner(theme: &Theme) -> String {
    theme.bold("endpoint-finder - A fast, concurrent endpoint finder for JavaScript files.")
}

/// Formats a fatal setup error for stderr.
pub fn fatal_line(theme: &Theme, message: &str) -> String {
    theme.red(&format!("[!] {}", message))
}

// Shape of the --json output
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    scanned: usize,
    total: usize,
    endpoints: &'a [String],
    errors: &'a [ScanFailure],
    interrupted: bool,
}

/// Console reporter. Implements ScanObserver so it can print discoveries
/// while results are still coming in.
#[derive(Debug)]
pub struct Reporter {
    theme: Theme,
    progress: bool,
    quiet: bool,
    json: bool,
}

impl Reporter {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            theme: config.theme,
            progress: config.streams_progress(),
            quiet: config.quiet,
            json: config.json,
        }
    }

    pub fn scan_started(&self, targets: usize, threads: usize) {
        if self.progress {
            println!("{}", self.started_line(targets, threads));
        }
    }

    /// Prints the final output and writes the output file, if any.
    pub fn finish(&self, outcome: &ScanOutcome, output: Option<OutputFile>) -> anyhow::Result<()> {
        self.finish_to(&mut io::stdout().lock(), outcome, output)
    }

    /// Same as `finish`, with the console side going to `out`.
    pub fn finish_to<W: Write>(
        &self,
        out: &mut W,
        outcome: &ScanOutcome,
        output: Option<OutputFile>,
    ) -> anyhow::Result<()> {
        if self.json {
            writeln!(out, "{}", self.json_report(outcome)?)?;
        } else if self.quiet {
            for endpoint in &outcome.endpoints {
                writeln!(out, "{}", endpoint)?;
            }
        }

        if let Some(OutputFile { path, file }) = output {
            if self.progress {
                writeln!(out, "{}", self.saving_line(outcome.endpoints.len(), &path))?;
            }
            write_endpoints(file, &outcome.endpoints)
                .map_err(|source| FinderError::OutputFile { path, source })?;
        }

        if self.progress {
            if outcome.interrupted {
                writeln!(out, "{}", self.interrupted_line(outcome.scanned, outcome.total))?;
            }
            writeln!(out, "{}", self.done_line(outcome.endpoints.len()))?;
        }
        out.flush()?;
        Ok(())
    }

    fn json_report(&self, outcome: &ScanOutcome) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&JsonReport {
            scanned: outcome.scanned,
            total: outcome.total,
            endpoints: &outcome.endpoints,
            errors: &outcome.failures,
            interrupted: outcome.interrupted,
        })
    }

    fn started_line(&self, targets: usize, threads: usize) -> String {
        self.theme.yellow(&format!(
            "[*] Scanning {} URL(s) with {} threads...",
            targets, threads
        ))
    }

    fn error_line(&self, url: &str, error: &FetchError) -> String {
        self.theme
            .red(&format!("[-] Error scanning {}: {}", url, error))
    }

    fn found_line(&self, url: &str) -> String {
        format!("\n{}", self.theme.blue(&format!("[+] Endpoints found in {}:", url)))
    }

    fn endpoint_line(&self, endpoint: &str) -> String {
        format!("  {}", self.theme.green(endpoint))
    }

    fn saving_line(&self, count: usize, path: &Path) -> String {
        format!(
            "\n{}",
            self.theme.yellow(&format!(
                "[*] Saving {} unique endpoints to '{}'...",
                count,
                path.display()
            ))
        )
    }

    fn interrupted_line(&self, scanned: usize, total: usize) -> String {
        format!(
            "\n{}",
            self.theme
                .yellow(&format!("[*] Interrupted after {} of {} URL(s).", scanned, total))
        )
    }

    fn done_line(&self, count: usize) -> String {
        format!(
            "\n{}",
            self.theme.bold_yellow(&format!(
                "[✔] Done. Found a total of {} unique endpoints.",
                count
            ))
        )
    }
}

impl ScanObserver for Reporter {
    fn scan_failed(&self, url: &str, error: &FetchError) {
        if self.progress {
            eprintln!("{}", self.error_line(url, error));
        }
    }

    fn endpoints_found(&self, url: &str) {
        if self.progress {
            println!("{}", self.found_line(url));
        }
    }

    fn new_endpoint(&self, endpoint: &str) {
        if self.progress {
            println!("{}", self.endpoint_line(endpoint));
        }
    }
}
