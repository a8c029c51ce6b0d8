//! Views that present test results to a human or to another program.
//!
//! Errors in the mechanics of running tests are reported through
//! [`TestView::diagnostics`]; failing conditions are test outcomes and are
//! reported through [`TestView::results`].

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::ValueEnum;
use confval_moduletest::diag::{Diagnostic, Severity};
use confval_moduletest::moduletest::{Status, Suite};
use serde::Serialize;
use tracing::debug;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Pretty,
    Json,
}

/// Output settings for the test results view.
#[derive(Clone, Debug, Default)]
pub struct TestOutput {
    pub format: Format,
    /// When set, results are also meant to be exported as JUnit XML here.
    pub junit_xml_file: Option<PathBuf>,
}

/// Output and error streams the view writes to.
pub struct Streams {
    pub stdout: Box<dyn Write + Send>,
    pub stderr: Box<dyn Write + Send>,
}

impl Streams {
    pub fn std() -> Self {
        Streams {
            stdout: Box::new(io::stdout()),
            stderr: Box::new(io::stderr()),
        }
    }
}

pub trait TestView {
    /// Presents the given results, keyed by suite name. Returned diagnostics
    /// describe problems presenting them.
    fn results(&mut self, results: &BTreeMap<String, Suite>) -> Vec<Diagnostic>;

    /// Reports problems with the mechanics of running tests.
    fn diagnostics(&mut self, diags: &[Diagnostic]);
}

/// Returns the view configured by `args`.
pub fn new_test(args: TestOutput, streams: Streams) -> Box<dyn TestView> {
    Box::new(TestHuman {
        streams,
        format: args.format,
        junit_xml_file: args.junit_xml_file,
    })
}

struct TestHuman {
    streams: Streams,
    format: Format,
    junit_xml_file: Option<PathBuf>,
}

/// Totals across all suites.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub pending: usize,
}

impl Summary {
    pub fn of(results: &BTreeMap<String, Suite>) -> Self {
        let mut summary = Summary::default();
        for (_, assertion) in results.values().flat_map(|suite| suite.assertions()) {
            match assertion.outcome {
                Status::Passed => summary.passed += 1,
                Status::Failed => summary.failed += 1,
                Status::Error => summary.errored += 1,
                Status::Pending => summary.pending += 1,
            }
        }
        summary
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    suites: Vec<JsonSuite<'a>>,
    summary: Summary,
}

#[derive(Serialize)]
struct JsonSuite<'a> {
    name: &'a str,
    status: Status,
    assertions: Vec<JsonAssertion<'a>>,
}

#[derive(Serialize)]
struct JsonAssertion<'a> {
    component: String,
    name: String,
    status: Status,
    description: &'a str,
    #[serde(skip_serializing_if = "is_empty_str")]
    message: &'a str,
    #[serde(skip_serializing_if = "is_empty_slice")]
    diagnostics: &'a [Diagnostic],
}

impl TestHuman {
    fn write_pretty(&mut self, results: &BTreeMap<String, Suite>) -> io::Result<()> {
        let out = &mut self.streams.stdout;
        for (suite_name, suite) in results {
            writeln!(out, "Suite: {} [{}]", suite_name, suite.status())?;
            for (component_name, component) in &suite.components {
                writeln!(out, "  Component: {}", component_name)?;
                for (name, assertion) in &component.assertions {
                    write!(out, "    [{}] {}", assertion.outcome, name)?;
                    if !assertion.description.is_empty() {
                        write!(out, ": {}", assertion.description)?;
                    }
                    writeln!(out)?;
                    if !assertion.message.is_empty() {
                        writeln!(out, "        {}", assertion.message)?;
                    }
                    for diag in &assertion.diagnostics {
                        writeln!(out, "        {}: {}", severity_label(diag.severity), diag.summary)?;
                    }
                }
            }
        }
        let s = Summary::of(results);
        writeln!(
            out,
            "Summary: {} passed, {} failed, {} errored, {} pending",
            s.passed, s.failed, s.errored, s.pending
        )?;
        out.flush()
    }

    fn write_json(&mut self, results: &BTreeMap<String, Suite>) -> io::Result<()> {
        let report = JsonReport {
            suites: results
                .iter()
                .map(|(name, suite)| JsonSuite {
                    name,
                    status: suite.status(),
                    assertions: suite
                        .assertions()
                        .map(|(key, a)| JsonAssertion {
                            component: key.component_name,
                            name: key.assertion_name,
                            status: a.outcome,
                            description: &a.description,
                            message: &a.message,
                            diagnostics: &a.diagnostics,
                        })
                        .collect(),
                })
                .collect(),
            summary: Summary::of(results),
        };
        let out = &mut self.streams.stdout;
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
        out.flush()
    }
}

impl TestView for TestHuman {
    fn results(&mut self, results: &BTreeMap<String, Suite>) -> Vec<Diagnostic> {
        debug!(suites = results.len(), format = ?self.format, "rendering test results");
        let mut diags = Vec::new();

        let written = match self.format {
            Format::Pretty => self.write_pretty(results),
            Format::Json => self.write_json(results),
        };
        if let Err(e) = written {
            diags.push(Diagnostic::error(
                "Failed to write test results",
                e.to_string(),
            ));
        }

        if let Some(path) = &self.junit_xml_file {
            diags.push(Diagnostic::warning(
                "JUnit XML output is not supported",
                format!("Test results were not written to {}.", path.display()),
            ));
        }

        diags
    }

    fn diagnostics(&mut self, diags: &[Diagnostic]) {
        if diags.is_empty() {
            return;
        }
        let err = &mut self.streams.stderr;
        for diag in diags {
            // Nowhere left to report a failure to write to stderr.
            let _ = writeln!(err, "{}: {}", severity_label(diag.severity), diag.summary);
            if !diag.detail.is_empty() {
                let _ = writeln!(err, "\n  {}", diag.detail);
            }
        }
        let _ = err.flush();
    }
}

fn is_empty_str(s: &&str) -> bool {
    s.is_empty()
}

fn is_empty_slice<T>(xs: &&[T]) -> bool {
    xs.is_empty()
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "Error",
        Severity::Warning => "Warning",
    }
}
