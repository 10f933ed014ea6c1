//! Configuration scenarios

use slabbuf::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const STATE_TOML: &str = r#"
capacity = 3
shape = [2]
dtype = "int64"
namespace = ["x", "y", "z"]
"#;

#[test]
fn test_state_buffer_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(STATE_TOML.as_bytes()).unwrap();

    let config = BufferConfig::from_file(file.path()).unwrap();
    let mut state = StateBuffer::from_config(&config).unwrap();
    state.write(vec![1i64, 2], "y").unwrap();
    assert_eq!(
        state.read("y").unwrap().and_then(|e| e.to_f64_vec()),
        Some(vec![1.0, 2.0])
    );
}

#[test]
fn test_every_variant_builds_from_one_config() {
    let config = BufferConfig::from_toml_str("capacity = 4\noverwrite = true").unwrap();

    let ring = RingBuffer::from_config(&config).unwrap();
    let queue = QueueBuffer::from_config(&config).unwrap();
    let state = StateBuffer::from_config(&config).unwrap();

    assert_eq!(ring.size(), 4);
    assert!(queue.overwrites());
    assert!(state.namespace().is_none());
}

#[test]
fn test_invalid_documents() {
    for source in [
        "capacity = 0",
        "shape = [1]",
        "capacity = 2\ndtype = \"complex\"",
        "capacity = 2\nnamespace = [\"a\", \"a\"]",
        "capacity = 2\nunknown = 1",
    ] {
        let err = BufferConfig::from_toml_str(source).unwrap_err();
        assert!(matches!(err, BufferError::InvalidConfig { .. }), "{source}: {err}");
    }

    let err = BufferConfig::from_toml_str("capacity = 3\nnamespace = [\"a\"]").unwrap_err();
    assert!(matches!(err, BufferError::NamespaceLengthMismatch { .. }));
}

#[test]
fn test_written_config_reloads() {
    let config = BufferConfig::new(2)
        .shape([3])
        .dtype(DType::Float64)
        .layout(Layout::K)
        .namespace(["a", "b"]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("buffer.toml");
    std::fs::write(&path, config.to_toml_string().unwrap()).unwrap();

    assert_eq!(BufferConfig::from_file(&path).unwrap(), config);
}
