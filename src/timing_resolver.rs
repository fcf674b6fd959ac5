/*!
 * Verse timing resolution.
 *
 * Two strategies, tried in order of quality, not cost:
 *
 * 1. Authoritative: the catalog publishes a chapter-level recording together
 *    with per-verse timestamps measured against that recording. Sample-exact
 *    boundaries, so it always wins when available.
 * 2. Measured durations: one clip per verse, each clip's playback duration
 *    measured (with a persistent cache) and accumulated into consecutive
 *    segments. Approximates inter-verse silence as zero, so timings may drift
 *    when laid over a combined recording.
 *
 * Any failure on the authoritative path, whether data absence or transport,
 * degrades to the fallback rather than aborting the chapter. Only a fallback
 * failure fails the job.
 */

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::audio_probe::ClipMeasurer;
use crate::duration_cache::DurationCache;
use crate::errors::CatalogError;
use crate::providers::AudioCatalog;
use crate::subtitle_writer::VerseTiming;

/// Which strategy produced the timings, made explicit so callers and tests
/// never have to infer it from control flow
#[derive(Debug)]
pub enum TimingOutcome {
    /// Pre-computed segments from the catalog, with the combined recording URL
    Authoritative {
        /// Location of the combined chapter recording
        audio_url: String,
        /// Per-verse segments, sorted by start time
        timings: Vec<VerseTiming>,
    },

    /// Segments reconstructed from measured per-verse clip durations.
    /// No combined recording exists on this path.
    Reconstructed {
        /// Per-verse segments, consecutive by construction
        timings: Vec<VerseTiming>,
    },
}

impl TimingOutcome {
    /// The verse segments, regardless of strategy
    pub fn timings(&self) -> &[VerseTiming] {
        match self {
            Self::Authoritative { timings, .. } => timings,
            Self::Reconstructed { timings } => timings,
        }
    }

    /// Consume the outcome, yielding the segments
    pub fn into_timings(self) -> Vec<VerseTiming> {
        match self {
            Self::Authoritative { timings, .. } => timings,
            Self::Reconstructed { timings } => timings,
        }
    }

    /// Combined chapter recording URL, present only on the authoritative path
    pub fn audio_url(&self) -> Option<&str> {
        match self {
            Self::Authoritative { audio_url, .. } => Some(audio_url),
            Self::Reconstructed { .. } => None,
        }
    }
}

/// Resolves per-verse timings for a chapter/reciter pair
pub struct TimingResolver {
    /// Audio catalog queried by both strategies
    catalog: Arc<dyn AudioCatalog>,

    /// Duration measurement for the fallback strategy
    measurer: Arc<dyn ClipMeasurer>,

    /// Location of the persistent duration cache file
    cache_path: PathBuf,
}

impl TimingResolver {
    /// Create a resolver over the given catalog and measurer
    pub fn new(
        catalog: Arc<dyn AudioCatalog>,
        measurer: Arc<dyn ClipMeasurer>,
        cache_path: PathBuf,
    ) -> Self {
        Self {
            catalog,
            measurer,
            cache_path,
        }
    }

    /// Resolve timings for one chapter, authoritative strategy first
    pub async fn resolve(&self, chapter: u32, reciter: u32) -> Result<TimingOutcome> {
        match self.resolve_authoritative(chapter, reciter).await {
            Ok(outcome) => {
                info!("Using authoritative timestamps for chapter {} (perfect sync)", chapter);
                Ok(outcome)
            }
            Err(e) => {
                if e.is_data_absent() {
                    info!(
                        "No authoritative timestamps for chapter {} ({}), reconstructing from clip durations",
                        chapter, e
                    );
                } else {
                    warn!(
                        "Authoritative timing lookup failed for chapter {} ({}), falling back to measured durations",
                        chapter, e
                    );
                }
                self.resolve_measured(chapter, reciter)
                    .await
                    .with_context(|| {
                        format!("both timing strategies failed for chapter {}", chapter)
                    })
            }
        }
    }

    /// Strategy 1: chapter recording plus published per-verse timestamps.
    /// Requires both an audio URL and a non-empty timestamp list; anything
    /// less is a strategy failure, not a fatal error.
    async fn resolve_authoritative(
        &self,
        chapter: u32,
        reciter: u32,
    ) -> Result<TimingOutcome, CatalogError> {
        let chapter_audio = self.catalog.chapter_audio(reciter, chapter).await?;

        let audio_url = chapter_audio.audio_url.filter(|u| !u.is_empty()).ok_or_else(|| {
            CatalogError::SourceUnavailable("catalog lists no chapter recording URL".to_string())
        })?;

        if chapter_audio.timestamps.is_empty() {
            return Err(CatalogError::SourceUnavailable(
                "catalog lists no verse timestamps for this recording".to_string(),
            ));
        }

        // Expected sorted from the source, but not guaranteed
        let mut timings = chapter_audio.timestamps;
        timings.sort_by_key(|t| t.start_ms);

        Ok(TimingOutcome::Authoritative { audio_url, timings })
    }

    /// Strategy 2: accumulate measured per-verse clip durations. Each
    /// segment's start equals the previous segment's end, so the sequence is
    /// gapless and non-overlapping by construction.
    async fn resolve_measured(&self, chapter: u32, reciter: u32) -> Result<TimingOutcome> {
        let clips = self.catalog.verse_audio_list(reciter, chapter).await?;

        let mut cache = DurationCache::load(&self.cache_path);
        let mut timings = Vec::with_capacity(clips.len());
        let mut cumulative_ms: u64 = 0;

        for clip in &clips {
            let duration_ms = match cache.get(&clip.url) {
                Some(ms) => ms,
                None => {
                    let ms = self
                        .measurer
                        .measure_ms(&clip.url)
                        .await
                        .with_context(|| format!("failed to measure clip for {}", clip.verse_key))?;
                    cache.insert(&clip.url, ms);
                    ms
                }
            };

            if duration_ms == 0 {
                warn!("Verse {} measured as zero-length ({})", clip.verse_key, clip.url);
            }

            let start_ms = cumulative_ms;
            let end_ms = cumulative_ms + duration_ms;
            timings.push(VerseTiming::new(clip.verse_key.clone(), start_ms, end_ms));
            cumulative_ms = end_ms;
        }

        cache.save().context("failed to persist duration cache")?;

        info!(
            "Reconstructed {} verse segments for chapter {} from clip durations",
            timings.len(),
            chapter
        );

        Ok(TimingOutcome::Reconstructed { timings })
    }
}
