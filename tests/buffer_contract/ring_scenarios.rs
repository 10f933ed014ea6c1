//! RingBuffer scenarios

use crate::test_utils::*;
use serde_json::json;
use slabbuf::prelude::*;

#[test]
fn test_capacity_three_walkthrough() {
    init_tracing();
    let mut ring = int_ring(3);

    for v in [1i64, 2, 3] {
        assert!(ring.write(v).unwrap());
    }
    assert!(ring.is_full());

    ring.write(4i64).unwrap();
    assert_eq!(ring.read().unwrap(), Some(int(2)));
    assert_eq!(ring.read().unwrap(), Some(int(3)));
    assert_eq!(ring.read().unwrap(), Some(int(4)));
    assert_eq!(ring.read().unwrap(), None);
    assert!(ring.is_empty());
    assert_eq!(ring.occupancy(), Occupancy::Empty);
}

#[test]
fn test_matrix_elements() {
    let mut ring = RingBuffer::new(2, ElementSpec::new([2, 2], DType::Float64)).unwrap();
    ring.write(json!([[1, 2], [3, 4]])).unwrap();
    ring.write(vec![vec![0.5f64, 0.5], vec![0.5, 0.5]]).unwrap();

    let first = ring.read().unwrap().unwrap();
    assert_eq!(first.shape().dims(), &[2, 2]);
    assert_eq!(first.to_f64_vec(), Some(vec![1.0, 2.0, 3.0, 4.0]));

    let err = ring.write(json!([[1, 2], [3]])).unwrap_err();
    assert!(err.is_validation());
    let err = ring.write(json!([1, 2, 3, 4])).unwrap_err();
    assert!(matches!(err, BufferError::ShapeMismatch { .. }));
}

#[test]
fn test_string_ring() {
    let mut ring = RingBuffer::new(2, ElementSpec::scalar(DType::Str)).unwrap();
    ring.write("alpha").unwrap();
    ring.write(String::from("beta")).unwrap();
    ring.write("gamma").unwrap();
    assert_eq!(ring.read().unwrap(), Some(Element::scalar("beta")));

    let err = ring.write(1i64).unwrap_err();
    assert!(matches!(err, BufferError::TypeMismatch { .. }));
}

#[test]
fn test_narrowing_rejected() {
    let mut ring = int_ring(2);
    let err = ring.write(1.5f64).unwrap_err();
    assert!(matches!(err, BufferError::TypeMismatch { .. }));
    assert!(ring.write(true).is_ok());
    assert_eq!(ring.read().unwrap(), Some(int(1)));
}

#[test]
fn test_queries() {
    let ring = RingBuffer::new(5, ElementSpec::new([3], DType::Bool).with_layout(Layout::F)).unwrap();
    assert_eq!(ring.size(), 5);
    assert_eq!(ring.shape(), &Shape::new([3]));
    assert_eq!(ring.dtype(), DType::Bool);
    assert_eq!(ring.layout(), Layout::F);
    assert!(ring.is_empty());
    assert!(!ring.is_full());
    assert_eq!(ring.get_buffer(), vec![None; 5]);
}

#[test]
fn test_zero_capacity_rejected() {
    let err = RingBuffer::new(0, ElementSpec::default()).unwrap_err();
    assert!(matches!(err, BufferError::InvalidConfig { .. }));
}

#[test]
fn test_newest_tracks_last_write() {
    let mut ring = int_ring(2);
    assert_eq!(ring.newest(), None);
    for v in 1..=5i64 {
        ring.write(v).unwrap();
        assert_eq!(ring.newest(), Some(&int(v)));
    }
    assert_eq!(live_ints(&ring), vec![4, 5]);
}
