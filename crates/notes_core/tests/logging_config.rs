use notes_core::{init_logging_from_config, logging_status, LoggingError, NotesConfig};

#[test]
fn logging_uses_level_from_config() {
    let dir = tempfile::tempdir().unwrap();

    let bad = NotesConfig {
        log_level: "chatty".to_string(),
        ..NotesConfig::default()
    };
    let err = init_logging_from_config(&bad, dir.path()).unwrap_err();
    assert!(matches!(err, LoggingError::UnsupportedLevel(_)));
    assert!(logging_status().is_none());

    let config = NotesConfig {
        log_level: "WARN".to_string(),
        ..NotesConfig::in_dir(dir.path())
    };
    init_logging_from_config(&config, dir.path()).unwrap();

    let (level, log_dir) = logging_status().unwrap();
    assert_eq!(level, "warn");
    assert_eq!(log_dir, dir.path());
}
