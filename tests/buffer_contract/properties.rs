//! Property tests for the sequential variants

use crate::test_utils::*;
use proptest::prelude::*;
use slabbuf::prelude::*;

proptest! {
    #[test]
    fn prop_ring_full_after_exactly_capacity_writes(capacity in 1usize..16) {
        let mut ring = int_ring(capacity);
        prop_assert!(ring.is_empty());
        for i in 0..capacity {
            prop_assert!(!ring.is_full());
            ring.write(i as i64).unwrap();
            prop_assert!(!ring.is_empty());
        }
        prop_assert!(ring.is_full());
    }

    #[test]
    fn prop_fifo_round_trip(values in proptest::collection::vec(any::<i64>(), 1..32)) {
        let capacity = values.len();
        let mut ring = int_ring(capacity);
        let mut queue = int_queue(capacity, false);
        for &v in &values {
            ring.write(v).unwrap();
            queue.write(v).unwrap();
        }
        for &v in &values {
            prop_assert_eq!(ring.read().unwrap(), Some(int(v)));
            prop_assert_eq!(queue.read().unwrap(), Some(int(v)));
        }
        prop_assert_eq!(ring.read().unwrap(), None);
        prop_assert_eq!(queue.read().unwrap(), None);
    }

    #[test]
    fn prop_ring_never_returns_evicted(
        capacity in 1usize..10,
        extra in 1usize..20,
    ) {
        let mut ring = int_ring(capacity);
        let total = capacity + extra;
        for v in 0..total {
            ring.write(v as i64).unwrap();
        }
        let expected: Vec<i64> = ((total - capacity)..total).map(|v| v as i64).collect();
        prop_assert_eq!(live_ints(&ring), expected.clone());
        for v in expected {
            prop_assert_eq!(ring.read().unwrap(), Some(int(v)));
        }
    }

    #[test]
    fn prop_full_queue_rejects_without_mutation(
        capacity in 1usize..10,
        rejected in proptest::collection::vec(any::<i64>(), 1..10),
    ) {
        let mut queue = int_queue(capacity, false);
        for v in 0..capacity {
            queue.write(v as i64).unwrap();
        }
        let snapshot = queue.get_buffer();
        for v in rejected {
            prop_assert!(!queue.write(v).unwrap());
        }
        prop_assert_eq!(queue.get_buffer(), snapshot);
    }

    #[test]
    fn prop_interleaved_ops_match_model(
        capacity in 1usize..8,
        ops in proptest::collection::vec(any::<Option<i64>>(), 0..64),
    ) {
        let mut ring = int_ring(capacity);
        let mut model = std::collections::VecDeque::new();
        for op in ops {
            match op {
                Some(v) => {
                    ring.write(v).unwrap();
                    if model.len() == capacity {
                        model.pop_front();
                    }
                    model.push_back(v);
                }
                None => {
                    prop_assert_eq!(ring.read().unwrap(), model.pop_front().map(int));
                }
            }
            prop_assert_eq!(ring.len(), model.len());
            prop_assert_eq!(ring.is_empty(), model.is_empty());
            prop_assert_eq!(ring.is_full(), model.len() == capacity);
        }
    }
}
