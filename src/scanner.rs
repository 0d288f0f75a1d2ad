use std::collections::HashMap;

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::color::ColorKey;
use crate::errors::{PaletteError, Result};
use crate::histogram::ColorHistogram;
use crate::source::PixelSource;

/// Drives concurrent population of a [`ColorHistogram`] from a pixel grid.
///
/// The row range is split into `concurrency` contiguous slices and one
/// task per slice walks every pixel of its rows, counting colors into a
/// slice-local map that is folded into the shared histogram when the slice
/// finishes. `scan` returns only after every slice task is done, so no
/// partial results are ever observable. The worker pool is built once and
/// reused for every image in a batch.
pub struct ParallelScanner {
    pool: ThreadPool,
    concurrency: usize,
}

impl ParallelScanner {
    /// Build a scanner with `concurrency` worker threads (minimum 1).
    pub fn new(concurrency: usize) -> Result<Self> {
        let concurrency = concurrency.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(concurrency)
            .thread_name(|i| format!("scan-worker-{}", i))
            .build()
            .map_err(|e| PaletteError::Config {
                message: format!("Failed to build scan thread pool: {}", e),
            })?;
        Ok(Self { pool, concurrency })
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Scan every pixel of `source` into `histogram`.
    ///
    /// On error the histogram may hold counts from slices that finished
    /// before the failure; the caller must discard them (the pipeline
    /// clears the histogram on every exit path).
    pub fn scan(&self, source: &dyn PixelSource, histogram: &ColorHistogram) -> Result<()> {
        let width = source.width();
        let slices = row_slices(source.height(), self.concurrency);

        self.pool.install(|| {
            slices
                .par_iter()
                .map(|&(start, end)| {
                    let mut local: HashMap<ColorKey, u64> = HashMap::new();
                    for y in start..end {
                        for x in 0..width {
                            let key = source.color_at(x, y)?;
                            *local.entry(key).or_insert(0) += 1;
                        }
                    }
                    histogram.merge_counts(local);
                    Ok(())
                })
                .collect::<Result<()>>()
        })
    }
}

/// Split the row range [0, height) into contiguous non-overlapping slices
/// of ceil(height / concurrency) rows, the last truncated at `height`.
fn row_slices(height: u32, concurrency: usize) -> Vec<(u32, u32)> {
    if height == 0 {
        return Vec::new();
    }
    let step = height.div_ceil(concurrency as u32).max(1);
    (0..height)
        .step_by(step as usize)
        .map(|start| (start, (start + step).min(height)))
        .collect()
}
