use std::io::Write;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::color::RankedEntry;
use crate::config::PipelineConfig;
use crate::errors::{PaletteError, Result};
use crate::histogram::ColorHistogram;
use crate::output::{ImageRecord, RecordWriter};
use crate::scanner::ParallelScanner;
use crate::selector::{self, DOMINANT_COLORS};
use crate::source::{self, DecodedImage};

/// Outcome counters for one batch run, so callers can detect partial
/// success without parsing the output file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.processed + self.failed
    }
}

/// Per-URL batch driver: fetch, scan, rank, emit.
///
/// URLs are processed strictly in input order, one image at a time, and
/// the record for image N is written before image N+1 is touched. The only
/// overlap is that the next URL's fetch/decode is started while the
/// current image scans, which cannot reorder output. The scanner's worker
/// pool and the histogram are created once and reused; the histogram is
/// cleared after every image so no counts leak across images.
pub struct Pipeline {
    scanner: ParallelScanner,
    histogram: ColorHistogram,
    client: reqwest::Client,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let scanner = ParallelScanner::new(config.concurrency)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.fetch_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| PaletteError::Config {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            scanner,
            histogram: ColorHistogram::new(),
            client,
            config,
        })
    }

    /// Process `urls` in order, writing one record per input to `writer`.
    ///
    /// A fetch, decode, scan, or selection failure on one URL is logged,
    /// written as an error-marked record, counted, and the batch moves on.
    /// Only writer I/O errors abort the whole run.
    pub async fn run<W: Write>(
        &self,
        urls: &[String],
        writer: &mut RecordWriter<W>,
    ) -> Result<BatchSummary> {
        let mut summary = BatchSummary::default();
        let mut pending = self.spawn_fetch(urls.first());

        for (i, url) in urls.iter().enumerate() {
            let handle = pending.take().expect("a fetch is spawned for every url");
            let fetched = match handle.await {
                Ok(result) => result,
                Err(e) => Err(PaletteError::Fetch {
                    url: url.clone(),
                    message: format!("fetch task aborted: {}", e),
                }),
            };
            pending = self.spawn_fetch(urls.get(i + 1));

            match fetched.and_then(|image| self.rank_image(&image)) {
                Ok(colors) => {
                    writer.write_record(&ImageRecord {
                        url,
                        colors: &colors,
                    })?;
                    summary.processed += 1;
                    tracing::debug!(url = %url, "processed");
                }
                Err(err) if err.is_per_image() => {
                    tracing::warn!(url = %url, code = err.error_code(), error = %err, "skipping input");
                    writer.write_error(url, &err)?;
                    summary.failed += 1;
                }
                Err(err) => return Err(err),
            }
        }

        writer.flush()?;
        Ok(summary)
    }

    /// Scan one decoded image and rank its dominant colors. The histogram
    /// is cleared before returning on both the success and failure paths.
    fn rank_image(&self, image: &DecodedImage) -> Result<Vec<RankedEntry>> {
        let result = self
            .scanner
            .scan(image, &self.histogram)
            .and_then(|()| selector::select_top(self.histogram.snapshot(), DOMINANT_COLORS));
        self.histogram.clear();
        result
    }

    fn spawn_fetch(&self, url: Option<&String>) -> Option<JoinHandle<Result<DecodedImage>>> {
        let url = url?.clone();
        let client = self.client.clone();
        let max_megapixels = self.config.max_megapixels;
        Some(tokio::spawn(async move {
            source::load(&client, &url, max_megapixels).await
        }))
    }
}
