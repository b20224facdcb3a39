use base::StdoutLogger;
use base::logging::{format_record, format_timestamp};
use log::Log;

#[test]
fn test_stdout_logger_implements_log_trait() {
    let logger = StdoutLogger;

    let metadata = log::MetadataBuilder::new()
        .level(log::Level::Info)
        .target("test")
        .build();

    assert!(logger.enabled(&metadata));

    let record = log::RecordBuilder::new()
        .level(log::Level::Info)
        .target("test")
        .file(Some("test.rs"))
        .line(Some(42))
        .args(format_args!("test message"))
        .build();

    // This should not panic
    logger.log(&record);
    logger.flush();
}

#[test]
fn test_format_record_layout() {
    let record = log::RecordBuilder::new()
        .level(log::Level::Warn)
        .target("test")
        .file(Some("session.rs"))
        .line(Some(7))
        .args(format_args!("Ignoring empty camera frame."))
        .build();

    let line = format_record(&record);

    assert!(line.contains("[WARN]"));
    assert!(line.contains("session.rs:7"));
    assert!(line.ends_with("- Ignoring empty camera frame."));
}

#[test]
fn test_format_record_unknown_location() {
    let record = log::RecordBuilder::new()
        .level(log::Level::Error)
        .args(format_args!("boom"))
        .build();

    let line = format_record(&record);
    assert!(line.contains("unknown:0"));
}

#[test]
fn test_format_timestamp_shape() {
    let timestamp = format_timestamp();

    // YYYY-MM-DDTHH:MM:SS
    assert_eq!(timestamp.len(), 19);
    assert_eq!(&timestamp[4..5], "-");
    assert_eq!(&timestamp[10..11], "T");
}

#[test]
fn test_init_stdout_logger_is_idempotent() {
    base::init_stdout_logger();
    base::init_stdout_logger();
    log::info!("logger initialized twice");
}
