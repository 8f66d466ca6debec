//! Integration tests for the JSON logger
//!
//! These tests verify:
//! - Record shape and key order end to end
//! - Context fields attached with `with`
//! - Level gating without buffer traffic
//! - Log injection prevention
//! - File output
//! - Fatal termination

use rust_json_logger::prelude::*;
use rust_json_logger::{BufferProvider, ShardedBufferPool};
use serde_json::Value;
use std::fmt;
use std::fs;
use std::process::Command;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

#[derive(Default)]
struct CountingProvider {
    acquired: AtomicUsize,
    released: AtomicUsize,
}

impl BufferProvider for CountingProvider {
    fn acquire(&self) -> Vec<u8> {
        self.acquired.fetch_add(1, Ordering::SeqCst);
        Vec::new()
    }

    fn release(&self, _buf: Vec<u8>) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug)]
struct QueryError {
    table: &'static str,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "relation \"{}\" does not exist", self.table)
    }
}

impl std::error::Error for QueryError {}

fn capture(level: LogLevel) -> (Logger, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let logger = Logger::builder().level(level).output(sink.clone()).build();
    (logger, sink)
}

fn parse(line: &str) -> Value {
    serde_json::from_str(line).unwrap_or_else(|e| panic!("invalid JSON {:?}: {}", line, e))
}

/// Keys of a record in the order they were written.
fn keys_in_order(line: &str) -> Vec<String> {
    let parsed = parse(line);
    let object = parsed.as_object().expect("record is an object");
    let mut keys: Vec<(usize, String)> = object
        .keys()
        .map(|k| {
            let needle = format!("\"{}\":", k);
            (line.find(&needle).expect("key present in raw line"), k.clone())
        })
        .collect();
    keys.sort();
    keys.into_iter().map(|(_, k)| k).collect()
}

#[test]
fn test_server_started_record() {
    let (logger, sink) = capture(LogLevel::Info);
    logger.info(
        "server started",
        &[Field::string("addr", ":8080"), Field::int("workers", 4)],
    );

    let out = sink.contents_string();
    assert!(out.ends_with('\n'));
    assert_eq!(out.matches('\n').count(), 1);

    let line = out.trim_end();
    assert_eq!(keys_in_order(line), ["level", "ts", "msg", "addr", "workers"]);

    let record = parse(line);
    assert_eq!(record["level"], "INFO");
    assert_eq!(record["msg"], "server started");
    assert_eq!(record["addr"], ":8080");
    assert_eq!(record["workers"], 4);

    let ts = record["ts"].as_str().unwrap();
    assert!(ts.ends_with('Z'));
    assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
}

#[test]
fn test_context_precedes_call_fields() {
    let (logger, sink) = capture(LogLevel::Info);
    let api = logger.with(&[Field::string("service", "api")]);

    let err = QueryError { table: "users" };
    api.error(
        "query failed",
        &[Field::err(&err), Field::string("table", "users")],
    );

    let line = &sink.lines()[0];
    assert_eq!(
        keys_in_order(line),
        ["level", "ts", "msg", "service", "error", "table"]
    );

    let record = parse(line);
    assert_eq!(record["level"], "ERROR");
    assert_eq!(record["error"], "relation \"users\" does not exist");
    assert!(record["error"].is_string());
}

#[test]
fn test_missing_error_is_empty_string() {
    let (logger, sink) = capture(LogLevel::Info);
    logger.warn("no cause", &[Field::error::<QueryError>(None)]);
    assert!(sink.lines()[0].ends_with(r#""msg":"no cause","error":""}"#));
}

#[test]
fn test_duration_field_renders_seconds() {
    let (logger, sink) = capture(LogLevel::Info);
    logger.info(
        "request",
        &[Field::duration("elapsed", Duration::from_micros(1500))],
    );
    assert!(sink.lines()[0].ends_with(r#""elapsed":0.0015}"#));
}

#[test]
fn test_duration_and_timestamp_share_payload() {
    let (logger, sink) = capture(LogLevel::Info);
    let nanos = 1_500_000_000;
    logger.info(
        "same number",
        &[
            Field::new("d", FieldValue::Duration(nanos)),
            Field::new("t", FieldValue::Timestamp(nanos)),
        ],
    );
    let record = parse(&sink.lines()[0]);
    assert_eq!(record["d"], 1.5);
    assert_eq!(record["t"], "1970-01-01T00:00:01.5Z");
}

#[test]
fn test_every_field_kind() {
    let (logger, sink) = capture(LogLevel::Debug);
    let at = chrono::DateTime::parse_from_rfc3339("2024-03-01T12:00:00Z")
        .unwrap()
        .with_timezone(&chrono::Utc);
    logger.debug(
        "kinds",
        &[
            Field::string("s", "text"),
            Field::int("i", -7),
            Field::int64("i64", i64::MAX),
            Field::float64("f", 2.25),
            Field::bool("b", true),
            Field::duration("d", Duration::from_secs(2)),
            Field::timestamp("t", at),
            Field::bytes("raw", b"abc"),
        ],
    );

    let line = &sink.lines()[0];
    assert!(line.ends_with(
        r#""s":"text","i":-7,"i64":9223372036854775807,"f":2.25,"b":true,"d":2,"t":"2024-03-01T12:00:00Z","raw":"abc"}"#
    ));
}

#[test]
fn test_log_injection_prevention() {
    let (logger, sink) = capture(LogLevel::Info);

    let malicious = "User login\n{\"level\":\"ERROR\",\"msg\":\"forged\"}\r\n";
    logger.info(malicious, &[Field::string("user\"name", "eve\tx")]);

    let out = sink.contents_string();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 1, "record must stay on one line");

    let record = parse(lines[0]);
    assert_eq!(record["msg"], malicious);
    assert_eq!(record["user\"name"], "eve\tx");
    assert_eq!(record["level"], "INFO");
}

#[test]
fn test_invalid_utf8_bytes_are_replaced() {
    let (logger, sink) = capture(LogLevel::Info);
    logger.info("binary", &[Field::bytes("payload", b"ok\xff\xfe!")]);

    let line = &sink.lines()[0];
    assert!(line.contains("\"payload\":\"ok\\ufffd\\ufffd!\""));
    assert_eq!(parse(line)["payload"], "ok\u{fffd}\u{fffd}!");
}

#[test]
fn test_gated_calls_touch_no_buffers() {
    let sink = Arc::new(MemorySink::new());
    let provider = Arc::new(CountingProvider::default());
    let logger = Logger::builder()
        .level(LogLevel::Error)
        .output(sink.clone())
        .buffer_provider(provider.clone())
        .build();

    logger.debug("d", &[Field::string("k", "v")]);
    logger.info("i", &[]);
    logger.warn("w", &[Field::int("n", 3)]);

    assert_eq!(provider.acquired.load(Ordering::SeqCst), 0);
    assert_eq!(provider.released.load(Ordering::SeqCst), 0);
    assert!(sink.is_empty());
}

#[test]
fn test_concurrent_with_keeps_contexts_apart() {
    let (root, sink) = capture(LogLevel::Info);
    let parent = root.with(&[Field::string("service", "api")]);

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let parent = parent.clone();
            thread::spawn(move || {
                let id = format!("req-{}", t);
                let child = parent.with(&[Field::string("request_id", &id)]);
                for _ in 0..50 {
                    child.info("handled", &[Field::int("thread", t)]);
                }
                child.context().to_vec()
            })
        })
        .collect();

    let contexts: Vec<Vec<u8>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for (t, context) in contexts.iter().enumerate() {
        let expected = format!(",\"service\":\"api\",\"request_id\":\"req-{}\"", t);
        assert_eq!(context, expected.as_bytes());
    }
    assert_eq!(parent.context(), b",\"service\":\"api\"");

    let lines = sink.lines();
    assert_eq!(lines.len(), 400);
    for line in &lines {
        let record = parse(line);
        let thread = record["thread"].as_i64().unwrap();
        assert_eq!(record["request_id"], format!("req-{}", thread));
    }
}

#[test]
fn test_level_change_reaches_children() {
    let (root, sink) = capture(LogLevel::Info);
    let child = root.with(&[Field::string("component", "db")]);

    root.set_level(LogLevel::Error);
    child.warn("dropped", &[]);
    assert!(sink.is_empty());

    child.set_level(LogLevel::Debug);
    root.debug("kept", &[]);
    assert_eq!(sink.lines().len(), 1);
    assert!(child.enabled(LogLevel::Debug));
}

#[test]
fn test_pool_recycles_buffers() {
    let pool = Arc::new(ShardedBufferPool::new(
        PoolConfig::default().with_shard_count(1).with_pool_size(4),
    ));
    let logger = Logger::builder()
        .sink(NullSink)
        .buffer_provider(pool.clone())
        .build();

    for i in 0..100 {
        logger.info("tick", &[Field::int("i", i)]);
    }

    let metrics = pool.metrics();
    assert_eq!(metrics.acquisitions(), 100);
    assert_eq!(metrics.allocations(), 1);
    assert_eq!(metrics.reuses(), 99);
    assert_eq!(pool.idle_buffers(), 1);
}

#[test]
fn test_file_sink_end_to_end() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("app.log");

    let sink = FileSink::new(&log_file).expect("Failed to open log file");
    let logger = Logger::builder().level(LogLevel::Info).sink(sink).build();
    let worker = logger.with(&[Field::string("worker", "w1")]);

    worker.info("started", &[]);
    worker.debug("hidden", &[]);
    worker.error("stopped", &[Field::int("code", 2)]);
    logger.flush();

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(parse(lines[0])["worker"], "w1");
    assert_eq!(parse(lines[1])["code"], 2);
    assert_eq!(logger.metrics().records_written(), 2);
}

#[test]
fn test_logger_from_deserialized_config() {
    let sink = Arc::new(MemorySink::new());
    let config: LoggerConfig =
        serde_json::from_str(r#"{"level":"WARN","pool":{"shard_count":2,"pool_size":8}}"#)
            .unwrap();
    config.validate().unwrap();

    let logger = Logger::new(config.with_output(sink.clone()));
    logger.info("hidden", &[]);
    logger.warn("shown", &[]);
    assert_eq!(sink.lines().len(), 1);
}

const FATAL_CHILD_ENV: &str = "RUST_JSON_LOGGER_FATAL_CHILD";

#[test]
fn test_fatal_exits_after_writing() {
    if std::env::var_os(FATAL_CHILD_ENV).is_some() {
        let logger = Logger::builder().level(LogLevel::Info).sink(StderrSink).build();
        logger.fatal("unrecoverable", &[Field::string("reason", "disk full")]);
    }

    let exe = std::env::current_exe().expect("test binary path");
    let output = Command::new(exe)
        .args(["test_fatal_exits_after_writing", "--exact", "--nocapture", "--test-threads=1"])
        .env(FATAL_CHILD_ENV, "1")
        .output()
        .expect("failed to spawn child");

    assert_eq!(output.status.code(), Some(rust_json_logger::FATAL_EXIT_CODE));

    let stderr = String::from_utf8_lossy(&output.stderr);
    let line = stderr
        .lines()
        .find(|l| l.starts_with("{\"level\":\"FATAL\""))
        .unwrap_or_else(|| panic!("no FATAL record in child stderr: {}", stderr));
    let record = parse(line);
    assert_eq!(record["msg"], "unrecoverable");
    assert_eq!(record["reason"], "disk full");
}
