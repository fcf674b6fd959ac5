/*!
 * Clip duration measurement for the fallback timing strategy.
 *
 * Downloaded verse clips are probed with symphonia to find their playback
 * duration in milliseconds; the clip bytes are discarded afterwards. Only the
 * duration matters here — persisting the clip itself is the orchestrator's
 * concern.
 */

use std::io::Cursor;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::errors::CatalogError;

/// Measure the playback duration of an encoded audio clip in milliseconds.
///
/// Prefers the frame count declared in the codec parameters; CBR MP3 streams
/// without a Xing header don't carry one, so the packets are walked and their
/// durations summed in the track time base instead.
pub fn measure_duration_ms(bytes: Vec<u8>) -> Result<u64, CatalogError> {
    let stream = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

    let mut hint = Hint::new();
    hint.with_extension("mp3");

    let probed = symphonia::default::get_probe()
        .format(&hint, stream, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| CatalogError::UnreadableAudio(format!("unsupported format: {}", e)))?;

    let mut format = probed.format;

    let (track_id, time_base, n_frames) = {
        let track = format
            .default_track()
            .ok_or_else(|| CatalogError::UnreadableAudio("no audio track found".to_string()))?;
        (
            track.id,
            track.codec_params.time_base,
            track.codec_params.n_frames,
        )
    };

    let time_base = time_base
        .ok_or_else(|| CatalogError::UnreadableAudio("track carries no time base".to_string()))?;

    if let Some(frames) = n_frames {
        let time = time_base.calc_time(frames);
        return Ok(time.seconds * 1000 + (time.frac * 1000.0) as u64);
    }

    let mut total_ts: u64 = 0;
    loop {
        match format.next_packet() {
            Ok(packet) => {
                if packet.track_id() == track_id {
                    total_ts += packet.dur();
                }
            }
            Err(SymphoniaError::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(SymphoniaError::ResetRequired) => break,
            Err(e) => {
                return Err(CatalogError::UnreadableAudio(format!(
                    "failed while walking packets: {}",
                    e
                )));
            }
        }
    }

    let time = time_base.calc_time(total_ts);
    Ok(time.seconds * 1000 + (time.frac * 1000.0) as u64)
}

/// Measures the playback duration of a clip addressed by URL
#[async_trait]
pub trait ClipMeasurer: Send + Sync {
    /// Retrieve the clip and return its duration in milliseconds
    async fn measure_ms(&self, url: &str) -> Result<u64, CatalogError>;
}

/// ClipMeasurer that downloads the clip over HTTP and probes the bytes
pub struct HttpClipMeasurer {
    /// HTTP client for clip retrieval
    client: Client,
}

impl HttpClipMeasurer {
    /// Create a measurer with the given request timeout
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl ClipMeasurer for HttpClipMeasurer {
    async fn measure_ms(&self, url: &str) -> Result<u64, CatalogError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CatalogError::Transport(format!("failed to fetch clip {}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Api {
                status_code: status.as_u16(),
                message: format!("clip fetch failed for {}", url),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| CatalogError::Transport(format!("failed to read clip body: {}", e)))?;

        let duration_ms = measure_duration_ms(bytes.to_vec())?;
        debug!("Measured {} at {} ms", url, duration_ms);

        Ok(duration_ms)
    }
}
