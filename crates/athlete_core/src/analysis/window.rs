//! # Windowed Feature Calculator
//!
//! Trailing mean and sample standard deviation over the last `W`
//! observations of one athlete, current observation included.
//!
//! - The window counts observations, not readings: a row with a missing
//!   metric still occupies a slot, but contributes nothing to the mean or
//!   the variance.
//! - Cold start: with fewer than `W` observations so far, all of them are used.
//! - One available reading → stddev 0.
//! - No available reading in the window → no statistics (`None`).

use crate::models::{Metric, MetricValues};
use serde::{Deserialize, Serialize};

/// Fixed-capacity circular buffer backed by a flat `Vec<T>`.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    buffer: Vec<T>,
    head: usize,
    len: usize,
}

impl<T: Clone + Default> RingBuffer<T> {
    /// `capacity` is clamped to at least 1.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![T::default(); capacity.max(1)],
            head: 0,
            len: 0,
        }
    }

    pub fn push(&mut self, item: T) {
        let cap = self.buffer.len();
        self.buffer[self.head] = item;
        self.head = (self.head + 1) % cap;
        if self.len < cap {
            self.len += 1;
        }
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let cap = self.buffer.len();
        let start = if self.len < cap { 0 } else { self.head };
        (0..self.len).map(move |i| &self.buffer[(start + i) % cap])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_full(&self) -> bool {
        self.len == self.buffer.len()
    }
}

/// Rolling baseline at one observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingStats {
    pub mean: f64,
    /// Sample (n - 1) standard deviation; 0 for a single reading
    pub stddev: f64,
    /// Readings that contributed
    pub count: usize,
}

/// Single-pass mean and sample standard deviation (Welford).
///
/// A constant series yields exactly that constant as mean and exactly 0 as
/// stddev, so flat histories never produce spurious flags.
pub fn mean_stddev<'a>(values: impl IntoIterator<Item = &'a f64>) -> Option<RollingStats> {
    let mut count = 0usize;
    let mut mean = 0.0;
    let mut m2 = 0.0;

    for &x in values {
        count += 1;
        let delta = x - mean;
        mean += delta / count as f64;
        m2 += delta * (x - mean);
    }

    match count {
        0 => None,
        1 => Some(RollingStats {
            mean,
            stddev: 0.0,
            count,
        }),
        n => Some(RollingStats {
            mean,
            stddev: (m2 / (n - 1) as f64).sqrt(),
            count,
        }),
    }
}

/// Trailing window for one metric
#[derive(Debug, Clone)]
pub struct RollingWindow {
    slots: RingBuffer<Option<f64>>,
}

impl RollingWindow {
    pub fn new(size: usize) -> Self {
        Self {
            slots: RingBuffer::new(size),
        }
    }

    /// Add the next observation's reading and return the window's stats.
    pub fn push(&mut self, value: Option<f64>) -> Option<RollingStats> {
        self.slots.push(value);
        self.stats()
    }

    pub fn stats(&self) -> Option<RollingStats> {
        mean_stddev(self.slots.iter().flatten())
    }
}

/// One rolling window per tracked metric
#[derive(Debug, Clone)]
pub struct MetricWindows {
    windows: MetricValues<RollingWindow>,
}

impl MetricWindows {
    pub fn new(size: usize) -> Self {
        Self {
            windows: MetricValues::from_fn(|_| RollingWindow::new(size)),
        }
    }

    pub fn push(&mut self, readings: &MetricValues<Option<f64>>) -> MetricValues<Option<RollingStats>> {
        let mut out = MetricValues::default();
        for metric in Metric::ALL {
            *out.get_mut(metric) = self.windows.get_mut(metric).push(*readings.get(metric));
        }
        out
    }
}

/// Rolling stats for a whole ordered series.
pub fn rolling_series(values: &[Option<f64>], size: usize) -> Vec<Option<RollingStats>> {
    let mut window = RollingWindow::new(size);
    values.iter().map(|v| window.push(*v)).collect()
}
