use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use parking_lot::RwLock;

use crate::alignment::align;
use crate::app_config::Config;
use crate::audio_probe::{ClipMeasurer, HttpClipMeasurer};
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::providers::alquran_cloud::{AlQuranCloudClient, ApiTextProvider};
use crate::providers::quran_com::QuranComClient;
use crate::providers::{AudioCatalog, ReciterInfo, TextProvider, TranslationInfo};
use crate::subtitle_writer::SubtitleWriter;
use crate::text_cleaner;
use crate::timing_resolver::TimingResolver;

// @module: Chapter pipeline orchestration

/// Per-run options for chapter processing
#[derive(Debug, Clone)]
pub struct ChapterOptions {
    /// Clean translation text (HTML, footnotes, markers)
    pub clean_translation: bool,

    /// Add verse numbering to both text tracks
    pub add_numbers: bool,

    /// Download chapter or per-verse audio alongside the subtitles
    pub download_audio: bool,
}

impl Default for ChapterOptions {
    fn default() -> Self {
        Self {
            clean_translation: true,
            add_numbers: true,
            download_audio: false,
        }
    }
}

/// Outcome of a full sweep over all chapters
#[derive(Debug, Default)]
pub struct SweepSummary {
    /// Chapters processed successfully
    pub succeeded: u32,

    /// Per-chapter failures, as `AppError::SweepItem` values
    pub failed: Vec<AppError>,
}

/// Output directory layout for one reciter/translation pair
struct OutputLayout {
    csv_dir: PathBuf,
    arabic_srt_dir: PathBuf,
    translation_srt_dir: PathBuf,
    /// Shared across translations of the same reciter
    audio_dir: PathBuf,
}

/// Main application controller sequencing text fetch, timing resolution,
/// alignment, and output writing
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Verse text source
    text_provider: Arc<dyn TextProvider>,

    // @field: Audio catalog and lookups
    catalog: Arc<dyn AudioCatalog>,

    // @field: Timing resolution
    resolver: TimingResolver,

    // @field: Client for media downloads
    download_client: reqwest::Client,

    // Process-lifetime memoization of external lookups, owned here rather
    // than as process-wide state so tests get isolated instances.
    reciter_names: RwLock<HashMap<u32, String>>,
    translation_lookups: RwLock<HashMap<String, TranslationInfo>>,
}

impl Controller {
    /// Create a controller wired to the live APIs
    pub fn with_config(config: Config) -> Result<Self> {
        let quran_com = Arc::new(QuranComClient::with_base_url(
            &config.api.quran_com_base,
            config.api.timeout_secs,
            config.api.max_retries,
            config.api.backoff_base_ms,
        ));

        let arabic = AlQuranCloudClient::with_base_url(
            &config.api.alquran_cloud_base,
            config.api.timeout_secs,
        );

        let text_provider: Arc<dyn TextProvider> =
            Arc::new(ApiTextProvider::new(arabic, Arc::clone(&quran_com)));

        let measurer: Arc<dyn ClipMeasurer> =
            Arc::new(HttpClipMeasurer::new(config.api.timeout_secs));

        Ok(Self::with_components(
            config,
            text_provider,
            quran_com,
            measurer,
        ))
    }

    /// Create a controller over explicit components (used by tests)
    pub fn with_components(
        config: Config,
        text_provider: Arc<dyn TextProvider>,
        catalog: Arc<dyn AudioCatalog>,
        measurer: Arc<dyn ClipMeasurer>,
    ) -> Self {
        let resolver = TimingResolver::new(
            Arc::clone(&catalog),
            measurer,
            config.duration_cache_path(),
        );

        let download_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.api.timeout_secs.max(60)))
            .build()
            .unwrap_or_default();

        Self {
            config,
            text_provider,
            catalog,
            resolver,
            download_client,
            reciter_names: RwLock::new(HashMap::new()),
            translation_lookups: RwLock::new(HashMap::new()),
        }
    }

    /// All reciters known to the catalog
    pub async fn list_reciters(&self) -> Result<Vec<ReciterInfo>, AppError> {
        Ok(self.catalog.list_reciters().await?)
    }

    /// All translation resources known to the catalog
    pub async fn list_translations(&self) -> Result<Vec<TranslationInfo>, AppError> {
        Ok(self.catalog.list_translations().await?)
    }

    /// Process one chapter end-to-end: resolve identities, fetch both text
    /// tracks, resolve timings, align, and write the SRT pair plus the CSV
    /// table. Optionally downloads the chapter or per-verse audio.
    pub async fn process_chapter(
        &self,
        chapter: u32,
        reciter: u32,
        translation_query: &str,
        options: &ChapterOptions,
    ) -> Result<()> {
        let reciter_name = self.resolve_reciter_name(reciter).await?;
        let translation = self.resolve_translation(translation_query).await?;

        let layout = self.output_layout(&reciter_name, &translation.name);

        info!("Processing chapter {}", chapter);
        info!("Reciter: {} (id={})", reciter_name, reciter);
        info!(
            "Translation: {} (id={}) [{}]",
            translation.name, translation.id, translation.language_name
        );

        let arabic_texts = self.fetch_arabic(chapter, options).await?;
        let translated_texts = self.fetch_translation(chapter, translation.id, options).await?;

        let outcome = self.resolver.resolve(chapter, reciter).await?;
        let audio_url = outcome.audio_url().map(|u| u.to_string());

        let aligned = align(outcome.into_timings(), arabic_texts, translated_texts);
        if aligned.is_empty() {
            warn!("Chapter {} produced no aligned verses", chapter);
        }

        let csv_path =
            SubtitleWriter::write_csv(&layout.csv_dir, chapter, &aligned.arabic, &aligned.translated)?;
        let arabic_srt = SubtitleWriter::write_srt(
            &layout.arabic_srt_dir,
            &format!("{}_arabic.srt", chapter),
            &aligned.timings,
            &aligned.arabic,
            false,
        )?;
        let translation_srt = SubtitleWriter::write_srt(
            &layout.translation_srt_dir,
            &format!("{}_translation.srt", chapter),
            &aligned.timings,
            &aligned.translated,
            false,
        )?;

        info!("CSV: {}", csv_path.display());
        info!("Arabic SRT: {}", arabic_srt.display());
        info!("Translation SRT: {}", translation_srt.display());
        info!("Total verses written: {}", aligned.len());

        if options.download_audio {
            self.download_media(chapter, reciter, audio_url.as_deref(), &layout.audio_dir)
                .await?;
        }

        Ok(())
    }

    /// Process every chapter of the work. Each chapter's failure is isolated:
    /// reported with its cause, then the sweep continues. Never aborts early.
    pub async fn process_all(
        &self,
        reciter: u32,
        translation_query: &str,
        options: &ChapterOptions,
    ) -> Result<SweepSummary> {
        let total = self.config.total_chapters;
        let progress = ProgressBar::new(total as u64);
        progress.set_style(
            ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} chapters {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let mut summary = SweepSummary::default();

        for chapter in 1..=total {
            progress.set_message(format!("chapter {}", chapter));

            match self.process_chapter(chapter, reciter, translation_query, options).await {
                Ok(()) => summary.succeeded += 1,
                Err(e) => {
                    error!("Chapter {} failed: {:#}", chapter, e);
                    summary.failed.push(AppError::SweepItem {
                        chapter,
                        cause: format!("{:#}", e),
                    });
                }
            }

            progress.inc(1);

            // Courtesy rate-limit towards the external services
            if chapter < total {
                tokio::time::sleep(Duration::from_millis(self.config.sweep_delay_ms)).await;
            }
        }

        progress.finish_and_clear();

        info!(
            "Sweep finished: {} succeeded, {} failed",
            summary.succeeded,
            summary.failed.len()
        );
        for failure in &summary.failed {
            warn!("{}", failure);
        }

        Ok(summary)
    }

    /// Arabic text with optional verse markers appended
    async fn fetch_arabic(&self, chapter: u32, options: &ChapterOptions) -> Result<Vec<String>> {
        let verses = self
            .text_provider
            .source_text(chapter)
            .await
            .with_context(|| format!("failed to fetch Arabic text for chapter {}", chapter))?;

        Ok(verses
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                if options.add_numbers {
                    format!("{}{}", text, text_cleaner::arabic_verse_marker(i + 1))
                } else {
                    text
                }
            })
            .collect())
    }

    /// Translated text with optional cleaning and numbering
    async fn fetch_translation(
        &self,
        chapter: u32,
        translation_id: u32,
        options: &ChapterOptions,
    ) -> Result<Vec<String>> {
        let verses = self
            .text_provider
            .translated_text(chapter, translation_id)
            .await
            .with_context(|| format!("failed to fetch translation for chapter {}", chapter))?;

        Ok(verses
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let cleaned = if options.clean_translation {
                    text_cleaner::clean_translation_text(&text)
                } else {
                    text_cleaner::strip_html(&text)
                };

                if options.add_numbers {
                    text_cleaner::number_translation(i + 1, &cleaned)
                } else {
                    cleaned
                }
            })
            .collect())
    }

    /// Reciter display name, memoized for the process lifetime
    async fn resolve_reciter_name(&self, reciter: u32) -> Result<String> {
        if let Some(name) = self.reciter_names.read().get(&reciter) {
            return Ok(name.clone());
        }

        let name = self.catalog.reciter_name(reciter).await?;
        self.reciter_names.write().insert(reciter, name.clone());
        Ok(name)
    }

    /// Translation lookup, memoized by normalized query string
    async fn resolve_translation(&self, query: &str) -> Result<TranslationInfo> {
        let key = query.trim().to_lowercase();

        if let Some(info) = self.translation_lookups.read().get(&key) {
            return Ok(info.clone());
        }

        let info = self.catalog.find_translation(query).await?;
        self.translation_lookups.write().insert(key, info.clone());
        Ok(info)
    }

    /// Output directories for one reciter/translation pair. The audio folder
    /// sits at the reciter level so it is shared across translations.
    fn output_layout(&self, reciter_name: &str, translation_name: &str) -> OutputLayout {
        let reciter_folder = FileManager::sanitize_folder_name(reciter_name);
        let translation_folder = FileManager::sanitize_folder_name(translation_name);

        let root = Path::new(&self.config.output_root);
        let base = root.join(&reciter_folder).join(&translation_folder);

        OutputLayout {
            csv_dir: base.join("csv"),
            arabic_srt_dir: base.join("srt").join("arabic"),
            translation_srt_dir: base.join("srt").join("translation"),
            audio_dir: root.join(&reciter_folder).join("audio"),
        }
    }

    /// Retrieve the chapter recording, or each verse clip when no combined
    /// recording exists. Both paths skip files already on disk.
    async fn download_media(
        &self,
        chapter: u32,
        reciter: u32,
        chapter_audio_url: Option<&str>,
        audio_dir: &Path,
    ) -> Result<()> {
        FileManager::ensure_dir(audio_dir)?;

        if let Some(url) = chapter_audio_url {
            let dest = audio_dir.join(format!("{:03}.mp3", chapter));
            if FileManager::file_exists(&dest) {
                info!("Chapter recording already present: {}", dest.display());
                return Ok(());
            }

            info!("Downloading chapter recording to {}", dest.display());
            self.download_file(url, &dest)
                .await
                .with_context(|| format!("failed to download chapter recording {}", url))?;
            return Ok(());
        }

        info!("No combined recording; downloading per-verse clips to {}", audio_dir.display());

        let clips = self.catalog.verse_audio_list(reciter, chapter).await?;
        for (idx, clip) in clips.iter().enumerate() {
            let dest = audio_dir.join(format!("{:03}_{:03}.mp3", chapter, idx + 1));
            if FileManager::file_exists(&dest) {
                continue;
            }

            if let Err(e) = self.download_file(&clip.url, &dest).await {
                warn!("Failed to download clip for {}: {:#}", clip.verse_key, e);
            }
        }

        Ok(())
    }

    /// Stream a file to disk without holding it in memory
    async fn download_file(&self, url: &str, dest: &Path) -> Result<()> {
        if let Some(parent) = dest.parent() {
            FileManager::ensure_dir(parent)?;
        }

        let response = self
            .download_client
            .get(url)
            .send()
            .await
            .with_context(|| format!("request failed for {}", url))?
            .error_for_status()
            .with_context(|| format!("server rejected download of {}", url))?;

        let mut file = std::fs::File::create(dest)
            .with_context(|| format!("failed to create {}", dest.display()))?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.with_context(|| format!("failed while streaming {}", url))?;
            file.write_all(&chunk)?;
        }

        Ok(())
    }
}
