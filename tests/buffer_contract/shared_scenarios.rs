//! Serialized access from several threads

use crate::test_utils::*;
use slabbuf::prelude::*;
use std::thread;

#[test]
fn test_concurrent_producers_through_shared_handle() {
    let shared = SharedBuffer::new(int_queue(400, false));

    let producers: Vec<_> = (0..4i64)
        .map(|p| {
            let shared = shared.clone();
            thread::spawn(move || {
                for i in 0..100 {
                    assert!(shared.with(|q| q.write(p * 1000 + i)).unwrap());
                }
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }

    let queue = shared.lock();
    assert!(queue.is_full());

    // Each producer's writes keep their relative order
    let values = live_ints(&*queue);
    for p in 0..4i64 {
        let mine: Vec<i64> = values.iter().copied().filter(|v| v / 1000 == p).collect();
        assert_eq!(mine, (0..100).map(|i| p * 1000 + i).collect::<Vec<_>>());
    }
}

#[test]
fn test_automations_run_under_the_lock() {
    let mut ring = RingBuffer::new(8, ElementSpec::scalar(DType::Int64)).unwrap();
    ring.add_automation(
        Automation::new("len", |ring: &mut RingBuffer| Ok(ring.len() as i64)).store_result_as("len"),
        Event::AfterWrite,
    )
    .unwrap();
    let shared = SharedBuffer::new(ring);

    let writers: Vec<_> = (0..2)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || {
                for v in 0..4i64 {
                    shared.with(|ring| ring.write(v)).unwrap();
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    let ring = shared.lock();
    let cells: Vec<i64> = ring
        .automation_results("len")
        .unwrap()
        .cells()
        .iter()
        .map(|cell| cell.as_ref().and_then(Scalar::as_i64).unwrap())
        .collect();
    assert_eq!(cells, (1..=8i64).collect::<Vec<_>>());
}
