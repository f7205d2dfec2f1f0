//! Skipped parameters leave a structured-log trail instead of an error.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use queryfilter::{AllowedFilters, FilterConfig, FilterPass, MemorySchema};
use serde_json::{json, Map, Value as JsonValue};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// Collects formatted log lines so tests can assert on them.
#[derive(Clone, Default)]
struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn capture_logs(run: impl FnOnce()) -> String {
    let capture = LogCapture::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_writer(capture.clone())
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, run);
    capture.contents()
}

fn schema() -> MemorySchema {
    MemorySchema::new().entity("users", &["id", "name"])
}

fn params(pairs: &[(&str, JsonValue)]) -> Map<String, JsonValue> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect()
}

#[test]
fn lenient_allow_list_skip_emits_a_debug_line() {
    let schema = schema();
    let config = FilterConfig {
        validate_all_filters: false,
        ..FilterConfig::default()
    };
    let allowed = AllowedFilters::new(["name"]);

    let logs = capture_logs(|| {
        let outcome = FilterPass::new(&schema, "users", config).apply(
            &params(&[("email", json!("x@y.com")), ("name", json!("ada"))]),
            &allowed,
            &[],
        );
        assert_eq!(outcome.applied, 1);
        assert!(outcome.errors.is_empty());
    });

    assert!(
        logs.contains("skipping filter outside the allow-list"),
        "got: {logs}"
    );
    assert!(logs.contains("email"), "got: {logs}");
}

#[test]
fn search_drops_unknown_columns_with_a_debug_line() {
    let schema = schema();
    let allowed = AllowedFilters::new(["name", "ghost"]);

    let logs = capture_logs(|| {
        let outcome = FilterPass::new(&schema, "users", FilterConfig::default()).apply(
            &params(&[("abstract_search", json!("ada"))]),
            &allowed,
            &[],
        );
        assert_eq!(outcome.applied, 1);
        assert!(outcome.errors.is_empty());
    });

    assert!(
        logs.contains("dropping unknown column from search"),
        "got: {logs}"
    );
    assert!(logs.contains("ghost"), "got: {logs}");
}
