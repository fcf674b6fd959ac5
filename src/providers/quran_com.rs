use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::errors::CatalogError;
use crate::providers::{AudioCatalog, ChapterAudio, ReciterInfo, TranslationInfo, VerseAudio};
use crate::subtitle_writer::VerseTiming;

/// Default Quran.com API v4 base URL
pub const DEFAULT_API_BASE: &str = "https://api.quran.com/api/v4";

/// Base URL that relative verse-clip paths are resolved against
pub const VERSES_AUDIO_BASE: &str = "https://verses.quran.com/";

/// Translations are requested page-less with a high per_page cap
const VERSES_PER_PAGE: u32 = 300;
const AUDIO_FILES_PER_PAGE: u32 = 500;

/// Quran.com API client for recitation audio, timestamps, translations,
/// and resource listings
#[derive(Debug)]
pub struct QuranComClient {
    /// Base URL of the API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
}

#[derive(Debug, Deserialize)]
struct RecitationsResponse {
    #[serde(default)]
    recitations: Vec<RecitationResource>,
}

#[derive(Debug, Deserialize)]
struct RecitationResource {
    id: u32,
    reciter_name: Option<String>,
    style: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranslationsResponse {
    #[serde(default)]
    translations: Vec<TranslationResource>,
}

#[derive(Debug, Deserialize)]
struct TranslationResource {
    id: u32,
    name: Option<String>,
    #[serde(default)]
    language_name: String,
}

#[derive(Debug, Deserialize)]
struct VersesResponse {
    #[serde(default)]
    verses: Vec<VerseResource>,
}

#[derive(Debug, Deserialize)]
struct VerseResource {
    #[serde(default)]
    translations: Vec<TranslationText>,
}

#[derive(Debug, Deserialize)]
struct TranslationText {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ChapterRecitationResponse {
    audio_file: Option<ChapterAudioFile>,
}

#[derive(Debug, Deserialize)]
struct ChapterAudioFile {
    audio_url: Option<String>,
    #[serde(default)]
    timestamps: Vec<TimestampResource>,
}

#[derive(Debug, Deserialize)]
struct TimestampResource {
    #[serde(default)]
    verse_key: String,
    timestamp_from: Option<u64>,
    timestamp_to: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct VerseAudioResponse {
    #[serde(default)]
    audio_files: Vec<VerseAudioFile>,
}

#[derive(Debug, Deserialize)]
struct VerseAudioFile {
    #[serde(default)]
    verse_key: String,
    url: Option<String>,
}

impl QuranComClient {
    /// Create a new client against the default API base
    pub fn new(timeout_secs: u64, max_retries: u32, backoff_base_ms: u64) -> Self {
        Self::with_base_url(DEFAULT_API_BASE, timeout_secs, max_retries, backoff_base_ms)
    }

    /// Create a new client against a custom base URL
    pub fn with_base_url(
        base_url: impl Into<String>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            max_retries,
            backoff_base_ms,
        }
    }

    /// GET a JSON document with retry on network errors and server errors.
    /// Client errors (4xx) are not retried.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let mut attempt = 0;
        let mut last_error = None;

        while attempt <= self.max_retries {
            let response_result = self.client.get(url).query(query).send().await;

            match response_result {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response.json::<T>().await.map_err(|e| {
                            CatalogError::Parse(format!("invalid JSON from {}: {}", url, e))
                        });
                    } else if status.is_server_error() {
                        last_error = Some(CatalogError::Api {
                            status_code: status.as_u16(),
                            message: url.to_string(),
                        });
                        error!(
                            "Server error {} from {} - attempt {}/{}",
                            status,
                            url,
                            attempt + 1,
                            self.max_retries + 1
                        );
                    } else {
                        return Err(CatalogError::Api {
                            status_code: status.as_u16(),
                            message: url.to_string(),
                        });
                    }
                }
                Err(e) => {
                    last_error = Some(CatalogError::Transport(format!("{}: {}", url, e)));
                    error!(
                        "Network error for {}: {} - attempt {}/{}",
                        url,
                        e,
                        attempt + 1,
                        self.max_retries + 1
                    );
                }
            }

            attempt += 1;
            if attempt <= self.max_retries {
                let backoff_ms = self.backoff_base_ms * (1u64 << (attempt - 1));
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| CatalogError::Transport(format!("request to {} failed", url))))
    }

    /// Make a possibly scheme-relative or site-relative URL absolute
    fn normalize_url(raw: &str) -> String {
        let raw = raw.trim();
        if raw.starts_with("http") {
            raw.to_string()
        } else if let Some(rest) = raw.strip_prefix("//") {
            format!("https://{}", rest)
        } else {
            Url::parse("https://quran.com")
                .and_then(|base| base.join(raw))
                .map(|u| u.to_string())
                .unwrap_or_else(|_| raw.to_string())
        }
    }

    /// Verse clips are returned as paths relative to the verses CDN
    fn normalize_verse_audio_url(raw: &str) -> String {
        let raw = raw.trim();
        if raw.starts_with("http") {
            raw.to_string()
        } else if let Some(rest) = raw.strip_prefix("//") {
            format!("https://{}", rest)
        } else {
            Url::parse(VERSES_AUDIO_BASE)
                .and_then(|base| base.join(raw.trim_start_matches('/')))
                .map(|u| u.to_string())
                .unwrap_or_else(|_| format!("{}{}", VERSES_AUDIO_BASE, raw))
        }
    }
}

#[async_trait]
impl AudioCatalog for QuranComClient {
    async fn chapter_audio(
        &self,
        reciter: u32,
        chapter: u32,
    ) -> Result<ChapterAudio, CatalogError> {
        let url = format!("{}/chapter_recitations/{}/{}", self.base_url, reciter, chapter);
        let response: ChapterRecitationResponse = self
            .get_json(&url, &[("segments", "true".to_string())])
            .await?;

        let audio_file = response.audio_file.ok_or_else(|| {
            CatalogError::SourceUnavailable(format!(
                "no chapter recording listed for reciter {} chapter {}",
                reciter, chapter
            ))
        })?;

        let timestamps = audio_file
            .timestamps
            .into_iter()
            .map(|t| VerseTiming {
                verse_key: t.verse_key,
                start_ms: t.timestamp_from.unwrap_or(0),
                end_ms: t.timestamp_to.unwrap_or(0),
            })
            .collect();

        Ok(ChapterAudio {
            audio_url: audio_file.audio_url.map(|u| Self::normalize_url(&u)),
            timestamps,
        })
    }

    async fn verse_audio_list(
        &self,
        reciter: u32,
        chapter: u32,
    ) -> Result<Vec<VerseAudio>, CatalogError> {
        let url = format!("{}/recitations/{}/by_chapter/{}", self.base_url, reciter, chapter);
        let response: VerseAudioResponse = self
            .get_json(&url, &[("per_page", AUDIO_FILES_PER_PAGE.to_string())])
            .await?;

        if response.audio_files.is_empty() {
            return Err(CatalogError::SourceUnavailable(format!(
                "no verse clips listed for reciter {} chapter {}",
                reciter, chapter
            )));
        }

        let mut clips = Vec::with_capacity(response.audio_files.len());
        for (idx, entry) in response.audio_files.into_iter().enumerate() {
            let raw_url = entry.url.ok_or_else(|| {
                CatalogError::SourceUnavailable(format!(
                    "missing clip URL for verse {} of chapter {}",
                    idx + 1,
                    chapter
                ))
            })?;

            clips.push(VerseAudio {
                verse_key: entry.verse_key,
                url: Self::normalize_verse_audio_url(&raw_url),
            });
        }

        debug!("Catalog lists {} verse clips for chapter {}", clips.len(), chapter);
        Ok(clips)
    }

    async fn list_reciters(&self) -> Result<Vec<ReciterInfo>, CatalogError> {
        let url = format!("{}/resources/recitations", self.base_url);
        let response: RecitationsResponse = self.get_json(&url, &[]).await?;

        Ok(response
            .recitations
            .into_iter()
            .map(|r| ReciterInfo {
                id: r.id,
                name: r.reciter_name.unwrap_or_else(|| format!("reciter_{}", r.id)),
                style: r.style,
            })
            .collect())
    }

    async fn reciter_name(&self, reciter: u32) -> Result<String, CatalogError> {
        let reciters = self.list_reciters().await?;

        Ok(reciters
            .into_iter()
            .find(|r| r.id == reciter)
            .map(|r| r.name)
            .unwrap_or_else(|| format!("reciter_{}", reciter)))
    }

    async fn list_translations(&self) -> Result<Vec<TranslationInfo>, CatalogError> {
        let url = format!("{}/resources/translations", self.base_url);
        let response: TranslationsResponse = self.get_json(&url, &[]).await?;

        Ok(response
            .translations
            .into_iter()
            .map(|t| TranslationInfo {
                id: t.id,
                name: t.name.unwrap_or_default(),
                language_name: t.language_name,
            })
            .collect())
    }

    async fn find_translation(&self, query: &str) -> Result<TranslationInfo, CatalogError> {
        let translations = self.list_translations().await?;
        if translations.is_empty() {
            return Err(CatalogError::SourceUnavailable(
                "no translations returned by the catalog".to_string(),
            ));
        }

        let q = query.trim().to_lowercase();

        if let Some(t) = translations
            .iter()
            .find(|t| t.name.trim().to_lowercase() == q)
        {
            return Ok(t.clone());
        }

        if let Some(t) = translations
            .iter()
            .find(|t| t.name.trim().to_lowercase().contains(&q))
        {
            return Ok(t.clone());
        }

        Err(CatalogError::SourceUnavailable(format!(
            "no translation matches query: {}",
            query
        )))
    }
}

impl QuranComClient {
    /// Translated verse text for a chapter, one line per verse.
    /// Arabic source text comes from a separate provider; this client only
    /// serves the translation side.
    pub async fn translated_text(
        &self,
        chapter: u32,
        translation_id: u32,
    ) -> Result<Vec<String>, CatalogError> {
        let url = format!("{}/verses/by_chapter/{}", self.base_url, chapter);
        let response: VersesResponse = self
            .get_json(
                &url,
                &[
                    ("translations", translation_id.to_string()),
                    ("per_page", VERSES_PER_PAGE.to_string()),
                ],
            )
            .await?;

        if response.verses.is_empty() {
            return Err(CatalogError::SourceUnavailable(format!(
                "no verses returned for chapter {}",
                chapter
            )));
        }

        Ok(response
            .verses
            .into_iter()
            .map(|v| v.translations.into_iter().next().map(|t| t.text).unwrap_or_default())
            .collect())
    }
}
