/*!
 * External data providers for verse text and recitation audio.
 *
 * This module defines the seams the pipeline depends on:
 * - `TextProvider`: ordered per-verse strings for a chapter, in two languages
 * - `AudioCatalog`: chapter- or verse-level audio locations, authoritative
 *   timestamps when available, and reciter/translation lookups
 *
 * Concrete clients:
 * - `quran_com`: Quran.com API v4 (catalog, translations, listings)
 * - `alquran_cloud`: AlQuran Cloud API (Arabic Uthmani text)
 * - `mock`: in-memory implementations with call tracking for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::CatalogError;
use crate::subtitle_writer::VerseTiming;

/// Chapter-level audio with optional authoritative per-verse timestamps
#[derive(Debug, Clone, Default)]
pub struct ChapterAudio {
    /// Location of the combined chapter recording, if one exists
    pub audio_url: Option<String>,

    /// Pre-computed verse segments; empty means "try the fallback"
    pub timestamps: Vec<VerseTiming>,
}

/// One verse's individual audio clip
#[derive(Debug, Clone)]
pub struct VerseAudio {
    /// Canonical "chapter:verse" key
    pub verse_key: String,

    /// Canonical absolute clip URL
    pub url: String,
}

/// A reciter listed by the catalog
#[derive(Debug, Clone)]
pub struct ReciterInfo {
    /// Catalog identifier
    pub id: u32,

    /// Display name
    pub name: String,

    /// Recitation style, when the catalog reports one
    pub style: Option<String>,
}

/// A translation resource listed by the catalog
#[derive(Debug, Clone)]
pub struct TranslationInfo {
    /// Catalog identifier
    pub id: u32,

    /// Translator/edition display name
    pub name: String,

    /// Language the translation is written in
    pub language_name: String,
}

/// Supplies ordered per-verse strings for a chapter
#[async_trait]
pub trait TextProvider: Send + Sync + Debug {
    /// Arabic source text, one entry per verse, 1-based correspondence
    async fn source_text(&self, chapter: u32) -> Result<Vec<String>, CatalogError>;

    /// Translated text for the given translation resource
    async fn translated_text(
        &self,
        chapter: u32,
        translation_id: u32,
    ) -> Result<Vec<String>, CatalogError>;
}

/// Supplies audio locations, timestamps, and reciter/translation lookups
#[async_trait]
pub trait AudioCatalog: Send + Sync + Debug {
    /// Chapter-level audio plus authoritative timestamps when published
    async fn chapter_audio(&self, reciter: u32, chapter: u32)
        -> Result<ChapterAudio, CatalogError>;

    /// One audio clip per verse, in verse order
    async fn verse_audio_list(
        &self,
        reciter: u32,
        chapter: u32,
    ) -> Result<Vec<VerseAudio>, CatalogError>;

    /// All reciters known to the catalog
    async fn list_reciters(&self) -> Result<Vec<ReciterInfo>, CatalogError>;

    /// Display name of a reciter
    async fn reciter_name(&self, reciter: u32) -> Result<String, CatalogError>;

    /// All translation resources known to the catalog
    async fn list_translations(&self) -> Result<Vec<TranslationInfo>, CatalogError>;

    /// Resolve a translator name query to a translation resource.
    /// Exact (case-insensitive) name match wins, then substring match.
    async fn find_translation(&self, query: &str) -> Result<TranslationInfo, CatalogError>;
}

pub mod alquran_cloud;
pub mod mock;
pub mod quran_com;
