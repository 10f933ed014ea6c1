//! Shared helpers for the buffer contract suite

use slabbuf::prelude::*;

/// Install a fmt subscriber that writes through the test harness
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

/// Scalar int64 element
pub fn int(v: i64) -> Element {
    Element::scalar(v)
}

/// Scalar int64 ring of `capacity` slots
pub fn int_ring(capacity: usize) -> RingBuffer {
    RingBuffer::new(capacity, ElementSpec::scalar(DType::Int64)).unwrap()
}

/// Scalar int64 queue of `capacity` slots
pub fn int_queue(capacity: usize, overwrite: bool) -> QueueBuffer {
    QueueBuffer::new(capacity, ElementSpec::scalar(DType::Int64), overwrite).unwrap()
}

/// Sum of a numeric element, 0.0 if absent
pub fn element_sum(element: Option<&Element>) -> f64 {
    element
        .and_then(Element::to_f64_vec)
        .unwrap_or_default()
        .iter()
        .sum()
}

/// Live elements decoded as i64
pub fn live_ints<B: SequentialBuffer>(buffer: &B) -> Vec<i64> {
    buffer
        .live_elements()
        .iter()
        .filter_map(|e| e.to_scalar().and_then(|s| s.as_i64()))
        .collect()
}
