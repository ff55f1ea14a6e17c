use std::io::Write;
use std::sync::Arc;

use tg_log::{
    Channel, DebugBuffer, Dispatch, EventType, Level, LogRouter, MemoryLogger, MemoryRecorder,
    DEFAULT_TEMPLATE,
};

fn router() -> (LogRouter, MemoryLogger, MemoryRecorder) {
    let general = MemoryLogger::new();
    let recorder = MemoryRecorder::default();
    let router = LogRouter::builder()
        .general(Arc::new(general.clone()))
        .recorder(Arc::new(recorder.clone()))
        .build();
    (router, general, recorder)
}

#[test]
fn test_round_trip_with_template() {
    let (router, general, recorder) = router();
    let buffer = DebugBuffer::new();

    let mut stream = buffer.acquire().expect("stream available");
    stream.write_all(b"hello").unwrap();

    let dispatch = buffer.finalize(&router, "[%s]");

    assert_eq!(dispatch, Some(Dispatch::Delivered(Channel::General)));
    let entries = general.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, Level::Debug);
    assert_eq!(entries[0].message, "[hello]");
    assert_eq!(
        recorder.pairs(),
        vec![(EventType::Verbose, "[hello]".to_string())]
    );

    assert!(!buffer.is_active());
    let fresh = buffer.acquire().unwrap();
    assert!(!fresh.same_stream(&stream));
    assert_eq!(buffer.finalize(&router, "[%s]"), Some(Dispatch::Delivered(Channel::General)));
    assert_eq!(general.messages().last().unwrap(), "[]");
}

#[test]
fn test_finalize_without_stream_is_noop() {
    let (router, general, recorder) = router();
    let buffer = DebugBuffer::new();

    assert_eq!(buffer.finalize(&router, DEFAULT_TEMPLATE), None);
    assert!(general.is_empty());
    assert!(recorder.is_empty());
}

#[test]
fn test_redacts_bot_token() {
    let (router, general, _) = router();
    let buffer = DebugBuffer::new();

    let mut stream = buffer.acquire().unwrap();
    write!(
        stream,
        "* Connected\n> POST /bot123456789:AAHabcDEF-123/sendMessage HTTP/1.1\n"
    )
    .unwrap();
    buffer.finalize(&router, DEFAULT_TEMPLATE);

    assert_eq!(
        general.messages(),
        vec!["* Connected\n> POST /botBOT_TOKEN_REMOVED/sendMessage HTTP/1.1\n".to_string()]
    );
}

#[test]
fn test_redaction_disabled_passes_text_through() {
    let (router, general, _) = router();
    let buffer = DebugBuffer::new().with_redaction(false);

    let mut stream = buffer.acquire().unwrap();
    stream.write_all(b"/bot123456789:AAHabcDEF-123/").unwrap();
    buffer.finalize(&router, DEFAULT_TEMPLATE);

    assert_eq!(general.messages(), vec!["/bot123456789:AAHabcDEF-123/".to_string()]);
}

#[test]
fn test_template_is_not_interpolated_against_context() {
    let (router, general, _) = router();
    let buffer = DebugBuffer::new();

    let mut stream = buffer.acquire().unwrap();
    stream.write_all(b"{\"ok\":true}").unwrap();
    buffer.finalize(&router, "Verbose HTTP Request output:\n%s");

    assert_eq!(
        general.messages(),
        vec!["Verbose HTTP Request output:\n{\"ok\":true}".to_string()]
    );
}

#[test]
fn test_invalid_utf8_is_logged_lossily() {
    let (router, general, _) = router();
    let buffer = DebugBuffer::new();

    let mut stream = buffer.acquire().unwrap();
    stream.write_all(&[b'o', b'k', 0xff]).unwrap();
    buffer.finalize(&router, DEFAULT_TEMPLATE);

    assert_eq!(general.messages(), vec!["ok\u{fffd}".to_string()]);
}

#[test]
fn test_complete_request_logs_failures_only_by_default() {
    let (router, general, _) = router();
    let buffer = DebugBuffer::new();

    buffer.acquire().unwrap().write_all(b"success").unwrap();
    assert_eq!(buffer.complete_request(&router, true, DEFAULT_TEMPLATE), None);
    assert!(!buffer.is_active());
    assert!(general.is_empty());

    buffer.acquire().unwrap().write_all(b"failure").unwrap();
    assert!(buffer
        .complete_request(&router, false, DEFAULT_TEMPLATE)
        .is_some());
    assert_eq!(general.messages(), vec!["failure".to_string()]);
}

#[test]
fn test_complete_request_always_logs_when_enabled() {
    let (router, general, _) = router();
    let buffer = DebugBuffer::new().with_always_log_request_and_response(true);

    buffer.acquire().unwrap().write_all(b"success").unwrap();
    buffer.complete_request(&router, true, DEFAULT_TEMPLATE);

    assert_eq!(general.messages(), vec!["success".to_string()]);
}

#[test]
fn test_finalize_with_noop_logger_still_closes_stream() {
    let buffer = DebugBuffer::new();
    let router = LogRouter::default();

    let stream = buffer.acquire().unwrap();
    assert_eq!(
        buffer.finalize(&router, DEFAULT_TEMPLATE),
        Some(Dispatch::Discarded(Channel::General))
    );
    assert!(!stream.is_open());
}
