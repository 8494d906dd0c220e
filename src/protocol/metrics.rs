//! Process-wide send counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::Opcode;

/// Track client-side protocol metrics without external dependencies.
pub(crate) struct Metrics;

static FRAMES_SENT: AtomicU64 = AtomicU64::new(0);
static BYTES_SENT: AtomicU64 = AtomicU64::new(0);
static SEND_ERRORS: AtomicU64 = AtomicU64::new(0);
static SEND_LATENCY_TOTAL_NS: AtomicU64 = AtomicU64::new(0);
static SEND_LATENCY_MAX_NS: AtomicU64 = AtomicU64::new(0);

static OPCODE_COUNTERS: [AtomicU64; Opcode::ALL.len()] =
    [const { AtomicU64::new(0) }; Opcode::ALL.len()];

const NANOSECONDS_PER_MICROSECOND: u128 = 1_000;

impl Metrics {
    #[inline]
    pub(crate) fn record_frame(opcode: Opcode, len: usize, elapsed: Duration) {
        FRAMES_SENT.fetch_add(1, Ordering::Relaxed);
        BYTES_SENT.fetch_add(len as u64, Ordering::Relaxed);
        OPCODE_COUNTERS[opcode.index()].fetch_add(1, Ordering::Relaxed);

        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        SEND_LATENCY_TOTAL_NS.fetch_add(nanos, Ordering::Relaxed);
        update_max(&SEND_LATENCY_MAX_NS, nanos);
    }

    #[inline]
    pub(crate) fn record_error() {
        SEND_ERRORS.fetch_add(1, Ordering::Relaxed);
    }
}

fn update_max(target: &AtomicU64, candidate: u64) {
    let mut current = target.load(Ordering::Relaxed);
    while candidate > current {
        match target.compare_exchange_weak(
            current,
            candidate,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return,
            Err(old) => current = old,
        }
    }
}

/// Read the current counters.
#[must_use]
pub fn snapshot() -> MetricsSnapshot {
    let mut per_opcode = [0; Opcode::ALL.len()];
    for (slot, counter) in per_opcode.iter_mut().zip(OPCODE_COUNTERS.iter()) {
        *slot = counter.load(Ordering::Relaxed);
    }

    MetricsSnapshot {
        frames_sent: FRAMES_SENT.load(Ordering::Relaxed),
        bytes_sent: BYTES_SENT.load(Ordering::Relaxed),
        send_errors: SEND_ERRORS.load(Ordering::Relaxed),
        send_latency_total_ns: SEND_LATENCY_TOTAL_NS.load(Ordering::Relaxed),
        send_latency_max_ns: SEND_LATENCY_MAX_NS.load(Ordering::Relaxed),
        per_opcode,
    }
}

/// Lightweight snapshot of the send counters.
#[derive(Default, Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    /// Frames fully handed to a transport
    pub frames_sent: u64,
    /// Bytes of those frames
    pub bytes_sent: u64,
    /// Frames whose write failed
    pub send_errors: u64,
    /// Sum of per-frame write times
    pub send_latency_total_ns: u64,
    /// Slowest single frame write
    pub send_latency_max_ns: u64,
    per_opcode: [u64; Opcode::ALL.len()],
}

impl MetricsSnapshot {
    /// Frames sent with the given opcode.
    #[must_use]
    pub fn frames_for(&self, opcode: Opcode) -> u64 {
        self.per_opcode[opcode.index()]
    }

    /// Average send latency in microseconds.
    #[must_use]
    pub fn avg_send_latency_us(&self) -> Option<u64> {
        if self.frames_sent == 0 {
            return None;
        }

        let total = u128::from(self.send_latency_total_ns);
        let per_frame = total / (u128::from(self.frames_sent) * NANOSECONDS_PER_MICROSECOND);
        Some(u64::try_from(per_frame).unwrap_or(u64::MAX))
    }
}
