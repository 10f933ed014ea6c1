//! Automation scenarios

use crate::test_utils::*;
use slabbuf::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn chk() -> Automation<RingBuffer> {
    Automation::new("chk", |ring: &mut RingBuffer| Ok(element_sum(ring.newest()) > 0.0))
        .store_result_as("chk")
}

#[test]
fn test_chk_marks_positive_sums() {
    init_tracing();
    let mut ring = RingBuffer::new(3, ElementSpec::new([3], DType::Float64)).unwrap();
    ring.add_automation(chk(), Event::AfterWrite).unwrap();

    ring.write(vec![1i64, 2, 3]).unwrap();
    ring.write(vec![-1i64, -2, -3]).unwrap();
    ring.write(vec![0.5f64, 0.5, 0.5]).unwrap();

    let column = ring.automation_results("chk").unwrap();
    assert_eq!(
        column.cells(),
        &[
            Some(Scalar::Bool(true)),
            Some(Scalar::Bool(false)),
            Some(Scalar::Bool(true)),
        ]
    );

    // Wrapping around replaces only the touched cell
    ring.write(vec![-5i64, 0, 0]).unwrap();
    let column = ring.automation_results("chk").unwrap();
    assert_eq!(column.get(0), Some(&Scalar::Bool(false)));
    assert_eq!(column.get(1), Some(&Scalar::Bool(false)));
    assert_eq!(column.get(2), Some(&Scalar::Bool(true)));
}

#[test]
fn test_before_write_sees_pending_slot() {
    let mut ring = int_ring(2);
    ring.add_automation(
        Automation::new("pending", |ring: &mut RingBuffer| Ok(ring.write_pointer() as i64))
            .store_result_as("pending"),
        Event::BeforeWrite,
    )
    .unwrap();

    ring.write(1i64).unwrap();
    ring.write(2i64).unwrap();
    let column = ring.automation_results("pending").unwrap();
    assert_eq!(column.get(0), Some(&Scalar::Int(0)));
    assert_eq!(column.get(1), Some(&Scalar::Int(1)));
}

#[test]
fn test_read_hooks_address_read_slot() {
    let mut ring = int_ring(3);
    ring.add_automation(
        Automation::new("before", |ring: &mut RingBuffer| Ok(ring.read_pointer() as i64))
            .store_result_as("before"),
        Event::BeforeRead,
    )
    .unwrap();
    ring.add_automation(
        Automation::new("after", |ring: &mut RingBuffer| Ok(ring.len() as i64))
            .store_result_as("after"),
        Event::AfterRead,
    )
    .unwrap();

    for v in [1i64, 2, 3] {
        ring.write(v).unwrap();
    }
    ring.read().unwrap();
    ring.read().unwrap();

    let before = ring.automation_results("before").unwrap();
    assert_eq!(before.get(0), Some(&Scalar::Int(0)));
    assert_eq!(before.get(1), Some(&Scalar::Int(1)));
    let after = ring.automation_results("after").unwrap();
    assert_eq!(after.get(0), Some(&Scalar::Int(2)));
    assert_eq!(after.get(1), Some(&Scalar::Int(1)));
    assert_eq!(after.get(2), None);
}

#[test]
fn test_read_with_results() {
    let mut ring = RingBuffer::new(2, ElementSpec::new([3], DType::Float64)).unwrap();
    ring.add_automation(chk(), Event::AfterWrite).unwrap();
    ring.write(vec![-1i64, -2, -3]).unwrap();

    let record = ring.read_with_results().unwrap().unwrap();
    assert_eq!(record.slot, 0);
    assert_eq!(record.results.get("chk"), Some(&Scalar::Bool(false)));
    assert_eq!(record.element.to_f64_vec(), Some(vec![-1.0, -2.0, -3.0]));
}

#[test]
fn test_guarded_automation() {
    let mut queue = int_queue(4, false);
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    queue
        .add_automation(
            Automation::effect("half-full", move |_: &mut QueueBuffer| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .when(|queue: &QueueBuffer| queue.len() * 2 >= queue.size()),
            Event::AfterWrite,
        )
        .unwrap();

    for v in 0..4i64 {
        queue.write(v).unwrap();
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_automation_may_mutate_results() {
    let mut ring = int_ring(2);
    ring.add_automation(chk(), Event::AfterWrite).unwrap();
    ring.add_automation(
        Automation::effect("reset", |ring: &mut RingBuffer| {
            if let Some(column) = ring.automation_results_mut("chk") {
                column.clear(0);
            }
            Ok(())
        }),
        Event::AfterRead,
    )
    .unwrap();

    ring.write(5i64).unwrap();
    assert!(ring.automation_results("chk").unwrap().get(0).is_some());
    ring.read().unwrap();
    assert!(ring.automation_results("chk").unwrap().get(0).is_none());
}

#[test]
fn test_failure_propagates_and_aborts_chain() {
    let mut ring = int_ring(2);
    let order = Arc::new(Mutex::new(Vec::new()));

    let log = order.clone();
    ring.add_automation(
        Automation::effect("first", move |_: &mut RingBuffer| {
            log.lock().unwrap().push("first");
            Ok(())
        }),
        Event::AfterWrite,
    )
    .unwrap();
    ring.add_automation(
        Automation::effect("fails", |_: &mut RingBuffer| {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "sensor offline").into())
        }),
        Event::AfterWrite,
    )
    .unwrap();
    let log = order.clone();
    ring.add_automation(
        Automation::effect("never", move |_: &mut RingBuffer| {
            log.lock().unwrap().push("never");
            Ok(())
        }),
        Event::AfterWrite,
    )
    .unwrap();

    let err = ring.write(1i64).unwrap_err();
    assert!(err.to_string().contains("fails"));
    assert!(std::error::Error::source(&err).is_some());
    assert_eq!(*order.lock().unwrap(), vec!["first"]);

    // Placement happened before AFTER_WRITE fired
    assert_eq!(ring.len(), 1);
}

#[test]
fn test_registration_errors() {
    let mut ring = int_ring(2);
    let err = ring
        .add_automation(
            Automation::effect("log", |_: &mut RingBuffer| Ok(())).store_result_as("log"),
            Event::AfterWrite,
        )
        .unwrap_err();
    assert!(matches!(err, BufferError::InvalidAutomationRegistration { .. }));

    assert!(matches!(
        Event::from_code(7),
        Err(BufferError::InvalidAutomationRegistration { .. })
    ));
    assert_eq!(Event::from_code(1).unwrap(), Event::AfterWrite);
}

#[test]
fn test_duplicate_registration_is_idempotent() {
    let mut ring = int_ring(2);
    assert!(ring.add_automation(chk(), Event::AfterWrite).unwrap());
    assert!(!ring.add_automation(chk(), Event::AfterWrite).unwrap());
    assert!(ring.add_automation(chk(), Event::AfterRead).unwrap());
    assert_eq!(ring.core().automations().len(Event::AfterWrite), 1);
}

#[test]
fn test_reentrant_read_is_refused() {
    let mut ring = int_ring(2);
    let refused = Arc::new(AtomicUsize::new(0));
    let counter = refused.clone();
    ring.add_automation(
        Automation::effect("drain", move |ring: &mut RingBuffer| {
            if let Err(BufferError::ReentrantAccess) = ring.read() {
                counter.fetch_add(1, Ordering::SeqCst);
            }
            Ok(())
        }),
        Event::AfterWrite,
    )
    .unwrap();

    ring.write(1i64).unwrap();
    ring.write(2i64).unwrap();
    assert_eq!(refused.load(Ordering::SeqCst), 2);
    assert_eq!(live_ints(&ring), vec![1, 2]);
}
