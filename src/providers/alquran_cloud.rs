use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::CatalogError;
use crate::providers::TextProvider;
use crate::providers::quran_com::QuranComClient;

/// Default AlQuran Cloud API base URL
pub const DEFAULT_API_BASE: &str = "https://api.alquran.cloud/v1";

/// AlQuran Cloud client serving the Arabic Uthmani script text
#[derive(Debug)]
pub struct AlQuranCloudClient {
    /// Base URL of the API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
}

#[derive(Debug, Deserialize)]
struct SurahResponse {
    data: Option<SurahData>,
}

#[derive(Debug, Deserialize)]
struct SurahData {
    #[serde(default)]
    ayahs: Vec<Ayah>,
}

#[derive(Debug, Deserialize)]
struct Ayah {
    #[serde(default)]
    text: String,
}

impl AlQuranCloudClient {
    /// Create a new client against the default API base
    pub fn new(timeout_secs: u64) -> Self {
        Self::with_base_url(DEFAULT_API_BASE, timeout_secs)
    }

    /// Create a new client against a custom base URL
    pub fn with_base_url(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Arabic Uthmani text for a chapter, one entry per verse
    pub async fn source_text(&self, chapter: u32) -> Result<Vec<String>, CatalogError> {
        let url = format!("{}/surah/{}/quran-uthmani", self.base_url, chapter);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Api {
                status_code: status.as_u16(),
                message: url,
            });
        }

        let parsed: SurahResponse = response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(format!("invalid JSON from {}: {}", url, e)))?;

        let ayahs = parsed
            .data
            .map(|d| d.ayahs)
            .filter(|a| !a.is_empty())
            .ok_or_else(|| {
                CatalogError::SourceUnavailable(format!("no ayahs returned for chapter {}", chapter))
            })?;

        debug!("Fetched {} Arabic verses for chapter {}", ayahs.len(), chapter);
        Ok(ayahs.into_iter().map(|a| a.text).collect())
    }
}

/// Text provider backed by the two live APIs: AlQuran Cloud for the Arabic
/// source script, Quran.com for translations.
#[derive(Debug)]
pub struct ApiTextProvider {
    /// Arabic source text client
    arabic: AlQuranCloudClient,
    /// Translation text client
    translations: Arc<QuranComClient>,
}

impl ApiTextProvider {
    /// Pair the Arabic client with a shared Quran.com client
    pub fn new(arabic: AlQuranCloudClient, translations: Arc<QuranComClient>) -> Self {
        Self {
            arabic,
            translations,
        }
    }
}

#[async_trait]
impl TextProvider for ApiTextProvider {
    async fn source_text(&self, chapter: u32) -> Result<Vec<String>, CatalogError> {
        self.arabic.source_text(chapter).await
    }

    async fn translated_text(
        &self,
        chapter: u32,
        translation_id: u32,
    ) -> Result<Vec<String>, CatalogError> {
        self.translations.translated_text(chapter, translation_id).await
    }
}
