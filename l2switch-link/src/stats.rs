//! Transport statistics

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Snapshot of transport counters
#[derive(Debug, Clone, PartialEq)]
pub struct LinkStats {
    /// Frames handed to the switch
    pub frames_received: u64,
    /// Bytes handed to the switch
    pub bytes_received: u64,
    /// Frames written to an interface
    pub frames_sent: u64,
    /// Bytes written to an interface
    pub bytes_sent: u64,
    /// Failed writes
    pub send_errors: u64,
    /// Time since the transport was opened
    pub duration: Duration,
}

impl LinkStats {
    /// Failed writes as a percentage of attempted writes
    pub fn error_rate(&self) -> f64 {
        let attempts = self.frames_sent + self.send_errors;
        if attempts == 0 {
            return 0.0;
        }
        (self.send_errors as f64 / attempts as f64) * 100.0
    }

    /// Format statistics as human-readable string
    pub fn format(&self) -> String {
        format!(
            "Received: {} frames ({} bytes)\n\
             Sent: {} frames ({} bytes)\n\
             Send errors: {} ({:.2}%)\n\
             Duration: {:.2}s",
            self.frames_received,
            self.bytes_received,
            self.frames_sent,
            self.bytes_sent,
            self.send_errors,
            self.error_rate(),
            self.duration.as_secs_f64()
        )
    }
}

/// Thread-safe counters shared by a transport and its reader threads
#[derive(Debug, Clone)]
pub struct LinkCounters {
    frames_received: Arc<AtomicU64>,
    bytes_received: Arc<AtomicU64>,
    frames_sent: Arc<AtomicU64>,
    bytes_sent: Arc<AtomicU64>,
    send_errors: Arc<AtomicU64>,
    start_time: Instant,
}

impl LinkCounters {
    pub fn new() -> Self {
        Self {
            frames_received: Arc::new(AtomicU64::new(0)),
            bytes_received: Arc::new(AtomicU64::new(0)),
            frames_sent: Arc::new(AtomicU64::new(0)),
            bytes_sent: Arc::new(AtomicU64::new(0)),
            send_errors: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn record_received(&self, size: usize) {
        self.frames_received.fetch_add(1, Ordering::Relaxed);
        self.bytes_received
            .fetch_add(size as u64, Ordering::Relaxed);
    }

    pub fn record_sent(&self, size: usize) {
        self.frames_sent.fetch_add(1, Ordering::Relaxed);
        self.bytes_sent.fetch_add(size as u64, Ordering::Relaxed);
    }

    pub fn record_send_error(&self) {
        self.send_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current statistics snapshot
    pub fn snapshot(&self) -> LinkStats {
        LinkStats {
            frames_received: self.frames_received.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            frames_sent: self.frames_sent.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            send_errors: self.send_errors.load(Ordering::Relaxed),
            duration: self.start_time.elapsed(),
        }
    }
}

impl Default for LinkCounters {
    fn default() -> Self {
        Self::new()
    }
}
