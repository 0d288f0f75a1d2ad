use std::collections::HashMap;
use std::sync::Mutex;

use crate::color::ColorKey;

/// Concurrency-safe frequency map from color to occurrence count.
///
/// Scan tasks accumulate into slice-local maps and fold them in through
/// [`merge_counts`](ColorHistogram::merge_counts), so the lock is taken
/// once per slice instead of once per pixel. [`increment`](ColorHistogram::increment)
/// is the single-pixel path; each call is atomic, so concurrent callers
/// never lose an update.
pub struct ColorHistogram {
    counts: Mutex<HashMap<ColorKey, u64>>,
}

impl ColorHistogram {
    pub fn new() -> Self {
        Self {
            counts: Mutex::new(HashMap::new()),
        }
    }

    /// Record one occurrence of `key`.
    pub fn increment(&self, key: ColorKey) {
        let mut counts = self.counts.lock().unwrap();
        *counts.entry(key).or_insert(0) += 1;
    }

    /// Fold a slice-local count map into the histogram under a single lock
    /// acquisition.
    pub fn merge_counts(&self, local: HashMap<ColorKey, u64>) {
        let mut counts = self.counts.lock().unwrap();
        for (key, n) in local {
            *counts.entry(key).or_insert(0) += n;
        }
    }

    /// All (color, count) pairs currently recorded. Callers must ensure no
    /// writers remain in flight; the scanner's barrier provides that.
    pub fn snapshot(&self) -> Vec<(ColorKey, u64)> {
        let counts = self.counts.lock().unwrap();
        counts.iter().map(|(key, n)| (*key, *n)).collect()
    }

    /// Reset to empty so the instance can be reused for the next image.
    pub fn clear(&self) {
        self.counts.lock().unwrap().clear();
    }

    /// Sum of all counts; after a full scan this equals width * height.
    pub fn total(&self) -> u64 {
        self.counts.lock().unwrap().values().sum()
    }

    /// Number of distinct colors recorded.
    pub fn distinct(&self) -> usize {
        self.counts.lock().unwrap().len()
    }
}

impl Default for ColorHistogram {
    fn default() -> Self {
        Self::new()
    }
}
