//! Tests for the test results view, writing into in-memory streams.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use confval_cli::views::{new_test, Format, Streams, Summary, TestOutput};
use confval_moduletest::diag::{Diagnostic, Severity};
use confval_moduletest::moduletest::{Assertion, AssertionKey, Status, Suite};

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).expect("utf-8 output")
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn streams() -> (Streams, SharedBuf, SharedBuf) {
    let out = SharedBuf::default();
    let err = SharedBuf::default();
    let streams = Streams {
        stdout: Box::new(out.clone()),
        stderr: Box::new(err.clone()),
    };
    (streams, out, err)
}

fn sample_results() -> BTreeMap<String, Suite> {
    let mut suite = Suite::default();
    suite.record(
        AssertionKey::new("network", "cidr_valid"),
        Assertion::new(Status::Passed, "CIDR block is valid"),
    );
    suite.record(
        AssertionKey::new("network", "has_name"),
        Assertion::new(Status::Failed, "name tag set")
            .with_message("tag \"Name\" is missing")
            .with_diagnostic(Diagnostic::warning("Deprecated attribute", "")),
    );
    suite.record(
        AssertionKey::new("storage", "encrypted"),
        Assertion::new(Status::Pending, ""),
    );
    BTreeMap::from([("default".to_string(), suite)])
}

#[test]
fn pretty_results_list_every_assertion() {
    let (streams, out, err) = streams();
    let mut view = new_test(TestOutput::default(), streams);
    let diags = view.results(&sample_results());
    assert!(diags.is_empty());

    let text = out.contents();
    assert!(text.contains("Suite: default [F]"), "{text}");
    assert!(text.contains("  Component: network"), "{text}");
    assert!(text.contains("    [P] cidr_valid: CIDR block is valid"), "{text}");
    assert!(text.contains("    [F] has_name: name tag set"), "{text}");
    assert!(text.contains("        tag \"Name\" is missing"), "{text}");
    assert!(text.contains("        Warning: Deprecated attribute"), "{text}");
    assert!(text.contains("    [?] encrypted\n"), "{text}");
    assert!(
        text.contains("Summary: 1 passed, 1 failed, 0 errored, 1 pending"),
        "{text}"
    );
    assert!(err.contents().is_empty());
}

#[test]
fn json_results_are_machine_readable() {
    let (streams, out, _err) = streams();
    let mut view = new_test(
        TestOutput {
            format: Format::Json,
            junit_xml_file: None,
        },
        streams,
    );
    assert!(view.results(&sample_results()).is_empty());

    let report: serde_json::Value = serde_json::from_str(&out.contents()).expect("valid json");
    assert_eq!(report["summary"]["failed"], 1);
    let suite = &report["suites"][0];
    assert_eq!(suite["name"], "default");
    assert_eq!(suite["status"], "F");
    let first = &suite["assertions"][0];
    assert_eq!(first["component"], "network");
    assert_eq!(first["name"], "cidr_valid");
    assert_eq!(first["status"], "P");
    assert!(first.get("message").is_none());
    assert!(first.get("diagnostics").is_none());
    assert_eq!(suite["assertions"][1]["diagnostics"][0]["severity"], "warning");
}

#[test]
fn junit_export_is_reported_as_unsupported() {
    let (streams, _out, err) = streams();
    let mut view = new_test(
        TestOutput {
            format: Format::Pretty,
            junit_xml_file: Some(PathBuf::from("report.xml")),
        },
        streams,
    );
    let diags = view.results(&sample_results());
    assert_eq!(diags.len(), 1);
    assert_eq!(diags[0].severity, Severity::Warning);
    assert!(diags[0].detail.contains("report.xml"));

    view.diagnostics(&diags);
    let text = err.contents();
    assert!(text.starts_with("Warning: JUnit XML output is not supported\n"), "{text}");
}

#[test]
fn no_diagnostics_writes_nothing() {
    let (streams, out, err) = streams();
    let mut view = new_test(TestOutput::default(), streams);
    view.diagnostics(&[]);
    assert!(out.contents().is_empty());
    assert!(err.contents().is_empty());
}

#[test]
fn summary_counts_outcomes() {
    assert_eq!(
        Summary::of(&sample_results()),
        Summary {
            passed: 1,
            failed: 1,
            errored: 0,
            pending: 1
        }
    );
}
