//! Rolling throughput estimation for fetch scheduling
//!
//! One estimator is shared per session: throughput is a property of the
//! network path and the decoder, not of any one object.

use std::collections::VecDeque;

/// Samples kept per window
pub const SAMPLE_WINDOW: usize = 10;

/// Rate assumed before any sample exists (bytes per second)
///
/// Bootstraps the strategies on the first ticks of a session.
pub const DEFAULT_RATE: f32 = 100.0;

/// Rolling averages of download bandwidth and decode speed.
pub struct ThroughputEstimator {
    bandwidth: VecDeque<f32>,
    decode: VecDeque<f32>,
    capacity: usize,
}

impl ThroughputEstimator {
    pub fn new() -> Self {
        Self::with_capacity(SAMPLE_WINDOW)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bandwidth: VecDeque::with_capacity(capacity),
            decode: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record a download bandwidth sample (bytes per second).
    pub fn record_bandwidth(&mut self, bytes_per_second: f32) {
        Self::push_bounded(&mut self.bandwidth, self.capacity, bytes_per_second);
    }

    /// Record a decode speed sample (bytes per second).
    pub fn record_decode_rate(&mut self, bytes_per_second: f32) {
        Self::push_bounded(&mut self.decode, self.capacity, bytes_per_second);
    }

    fn push_bounded(window: &mut VecDeque<f32>, capacity: usize, sample: f32) {
        if window.len() == capacity {
            window.pop_front();
        }
        window.push_back(sample);
    }

    /// Mean of the bandwidth window, or the default when empty.
    pub fn bandwidth(&self) -> f32 {
        Self::mean(&self.bandwidth)
    }

    /// Mean of the decode-rate window, or the default when empty.
    pub fn decode_rate(&self) -> f32 {
        Self::mean(&self.decode)
    }

    fn mean(window: &VecDeque<f32>) -> f32 {
        if window.is_empty() {
            return DEFAULT_RATE;
        }
        window.iter().sum::<f32>() / window.len() as f32
    }

    /// Seconds to fetch and decode `size_bytes` at current estimates:
    /// `size × (1/bandwidth + 1/decode_rate)`.
    pub fn fetch_seconds(&self, size_bytes: u64) -> f32 {
        size_bytes as f32 * (1.0 / self.bandwidth() + 1.0 / self.decode_rate())
    }
}

impl Default for ThroughputEstimator {
    fn default() -> Self {
        Self::new()
    }
}

/// Harmonic mean of two rates; zero when either rate is zero.
pub fn harmonic_mean(a: f32, b: f32) -> f32 {
    if a + b <= 0.0 {
        return 0.0;
    }
    2.0 * a * b / (a + b)
}

/// Bytes fetchable-and-decodable within one buffering interval at the
/// estimator's current rates.
pub fn budget_bytes(estimator: &ThroughputEstimator, buffer_seconds: f32) -> f32 {
    harmonic_mean(estimator.bandwidth(), estimator.decode_rate()) * buffer_seconds
}
