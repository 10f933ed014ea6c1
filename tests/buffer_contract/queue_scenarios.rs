//! QueueBuffer scenarios

use crate::test_utils::*;
use slabbuf::prelude::*;

#[test]
fn test_no_overwrite_keeps_slots() {
    init_tracing();
    let mut queue = int_queue(3, false);
    for v in [1i64, 2, 3] {
        assert!(queue.write(v).unwrap());
    }
    let snapshot = queue.get_buffer();

    for v in 4..10i64 {
        assert!(!queue.write(v).unwrap());
        assert_eq!(queue.get_buffer(), snapshot);
    }
    assert_eq!(live_ints(&queue), vec![1, 2, 3]);
}

#[test]
fn test_overwrite_drops_oldest() {
    let mut queue = int_queue(2, true);
    for v in 1..=4i64 {
        assert!(queue.write(v).unwrap());
    }
    assert_eq!(queue.read().unwrap(), Some(int(3)));
    assert_eq!(queue.read().unwrap(), Some(int(4)));
    assert_eq!(queue.read().unwrap(), None);
}

#[test]
fn test_drain_and_refill() {
    let mut queue = int_queue(3, false);
    for round in 0..4i64 {
        for v in 0..3 {
            queue.write(round * 10 + v).unwrap();
        }
        assert!(queue.is_full());
        let drained: Vec<_> = std::iter::from_fn(|| queue.read().unwrap()).collect();
        assert_eq!(
            drained,
            vec![int(round * 10), int(round * 10 + 1), int(round * 10 + 2)]
        );
        assert!(queue.is_empty());
    }
}

#[test]
fn test_occupancy_transitions() {
    let mut queue = int_queue(2, false);
    assert_eq!(queue.occupancy(), Occupancy::Empty);
    queue.write(1i64).unwrap();
    assert_eq!(queue.occupancy(), Occupancy::Partial);
    queue.write(2i64).unwrap();
    assert_eq!(queue.occupancy(), Occupancy::Full);
    queue.read().unwrap();
    assert_eq!(queue.occupancy(), Occupancy::Partial);
}
