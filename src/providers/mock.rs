/*!
 * Mock provider implementations for testing.
 *
 * In-memory stand-ins for the text provider, audio catalog, and clip
 * measurer so the pipeline can be exercised without network access. Call
 * counts are tracked so tests can assert that cached paths skip external
 * calls.
 */

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::audio_probe::ClipMeasurer;
use crate::errors::CatalogError;
use crate::providers::{
    AudioCatalog, ChapterAudio, ReciterInfo, TextProvider, TranslationInfo, VerseAudio,
};
use crate::subtitle_writer::VerseTiming;

/// Text provider returning fixed verse lists
#[derive(Debug, Default)]
pub struct MockTextProvider {
    /// Arabic lines returned for any chapter
    pub arabic: Vec<String>,
    /// Translated lines returned for any chapter
    pub translated: Vec<String>,
}

impl MockTextProvider {
    /// Build from plain string slices
    pub fn new(arabic: &[&str], translated: &[&str]) -> Self {
        Self {
            arabic: arabic.iter().map(|s| s.to_string()).collect(),
            translated: translated.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn source_text(&self, _chapter: u32) -> Result<Vec<String>, CatalogError> {
        if self.arabic.is_empty() {
            return Err(CatalogError::SourceUnavailable("no arabic text configured".to_string()));
        }
        Ok(self.arabic.clone())
    }

    async fn translated_text(
        &self,
        _chapter: u32,
        _translation_id: u32,
    ) -> Result<Vec<String>, CatalogError> {
        if self.translated.is_empty() {
            return Err(CatalogError::SourceUnavailable(
                "no translated text configured".to_string(),
            ));
        }
        Ok(self.translated.clone())
    }
}

/// Audio catalog with configurable chapter-level and verse-level responses
#[derive(Debug, Default)]
pub struct MockAudioCatalog {
    /// Response for chapter_audio; None simulates "not listed"
    pub chapter: Option<ChapterAudio>,
    /// When set, chapter_audio fails with a transport error instead
    pub chapter_transport_failure: bool,
    /// Verse clips returned by verse_audio_list
    pub clips: Vec<VerseAudio>,
    /// Reciters known to the mock
    pub reciters: Vec<ReciterInfo>,
    /// Translations known to the mock
    pub translations: Vec<TranslationInfo>,
    /// Number of chapter_audio calls made
    chapter_calls: AtomicUsize,
    /// Number of verse_audio_list calls made
    clip_list_calls: AtomicUsize,
}

impl MockAudioCatalog {
    /// Catalog that only serves per-verse clips (authoritative path absent)
    pub fn verse_clips_only(chapter: u32, urls: &[&str]) -> Self {
        Self {
            clips: urls
                .iter()
                .enumerate()
                .map(|(i, url)| VerseAudio {
                    verse_key: format!("{}:{}", chapter, i + 1),
                    url: url.to_string(),
                })
                .collect(),
            ..Default::default()
        }
    }

    /// Catalog that serves a chapter recording with pre-computed timestamps
    pub fn with_timestamps(audio_url: &str, timestamps: Vec<VerseTiming>) -> Self {
        Self {
            chapter: Some(ChapterAudio {
                audio_url: Some(audio_url.to_string()),
                timestamps,
            }),
            ..Default::default()
        }
    }

    /// Number of chapter_audio calls observed
    pub fn chapter_calls(&self) -> usize {
        self.chapter_calls.load(Ordering::SeqCst)
    }

    /// Number of verse_audio_list calls observed
    pub fn clip_list_calls(&self) -> usize {
        self.clip_list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AudioCatalog for MockAudioCatalog {
    async fn chapter_audio(
        &self,
        reciter: u32,
        chapter: u32,
    ) -> Result<ChapterAudio, CatalogError> {
        self.chapter_calls.fetch_add(1, Ordering::SeqCst);

        if self.chapter_transport_failure {
            return Err(CatalogError::Transport("simulated network failure".to_string()));
        }

        self.chapter.clone().ok_or_else(|| {
            CatalogError::SourceUnavailable(format!(
                "no chapter recording for reciter {} chapter {}",
                reciter, chapter
            ))
        })
    }

    async fn verse_audio_list(
        &self,
        reciter: u32,
        chapter: u32,
    ) -> Result<Vec<VerseAudio>, CatalogError> {
        self.clip_list_calls.fetch_add(1, Ordering::SeqCst);

        if self.clips.is_empty() {
            return Err(CatalogError::SourceUnavailable(format!(
                "no verse clips for reciter {} chapter {}",
                reciter, chapter
            )));
        }
        Ok(self.clips.clone())
    }

    async fn list_reciters(&self) -> Result<Vec<ReciterInfo>, CatalogError> {
        Ok(self.reciters.clone())
    }

    async fn reciter_name(&self, reciter: u32) -> Result<String, CatalogError> {
        Ok(self
            .reciters
            .iter()
            .find(|r| r.id == reciter)
            .map(|r| r.name.clone())
            .unwrap_or_else(|| format!("reciter_{}", reciter)))
    }

    async fn list_translations(&self) -> Result<Vec<TranslationInfo>, CatalogError> {
        Ok(self.translations.clone())
    }

    async fn find_translation(&self, query: &str) -> Result<TranslationInfo, CatalogError> {
        let q = query.trim().to_lowercase();

        self.translations
            .iter()
            .find(|t| t.name.trim().to_lowercase() == q)
            .or_else(|| {
                self.translations
                    .iter()
                    .find(|t| t.name.trim().to_lowercase().contains(&q))
            })
            .cloned()
            .ok_or_else(|| {
                CatalogError::SourceUnavailable(format!("no translation matches query: {}", query))
            })
    }
}

/// Clip measurer returning canned durations and counting measurements
#[derive(Debug, Default)]
pub struct MockClipMeasurer {
    /// Canned duration per clip URL
    pub durations: HashMap<String, u64>,
    /// Number of measure_ms calls made
    calls: Arc<AtomicUsize>,
}

impl MockClipMeasurer {
    /// Build from (url, duration_ms) pairs
    pub fn new(durations: &[(&str, u64)]) -> Self {
        Self {
            durations: durations
                .iter()
                .map(|(url, ms)| (url.to_string(), *ms))
                .collect(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of measurements performed
    pub fn measure_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClipMeasurer for MockClipMeasurer {
    async fn measure_ms(&self, url: &str) -> Result<u64, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        self.durations.get(url).copied().ok_or_else(|| {
            CatalogError::UnreadableAudio(format!("no canned duration for {}", url))
        })
    }
}
