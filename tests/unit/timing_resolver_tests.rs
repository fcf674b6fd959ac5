/*!
 * Tests for timing resolution strategies
 */

use std::sync::Arc;

use anyhow::Result;
use quran_srt::audio_probe::ClipMeasurer;
use quran_srt::providers::mock::{MockAudioCatalog, MockClipMeasurer};
use quran_srt::providers::AudioCatalog;
use quran_srt::subtitle_writer::VerseTiming;
use quran_srt::timing_resolver::{TimingOutcome, TimingResolver};
use crate::common;

fn resolver_with(
    catalog: Arc<MockAudioCatalog>,
    measurer: Arc<MockClipMeasurer>,
    cache_path: std::path::PathBuf,
) -> TimingResolver {
    TimingResolver::new(
        catalog as Arc<dyn AudioCatalog>,
        measurer as Arc<dyn ClipMeasurer>,
        cache_path,
    )
}

/// Fallback durations [1000, 1500, 2000] accumulate into consecutive segments
#[tokio::test]
async fn test_resolve_withMeasuredDurations_shouldAccumulateSegments() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let catalog = Arc::new(MockAudioCatalog::verse_clips_only(
        1,
        &["https://v.example/1.mp3", "https://v.example/2.mp3", "https://v.example/3.mp3"],
    ));
    let measurer = Arc::new(MockClipMeasurer::new(&[
        ("https://v.example/1.mp3", 1000),
        ("https://v.example/2.mp3", 1500),
        ("https://v.example/3.mp3", 2000),
    ]));

    let resolver = resolver_with(
        Arc::clone(&catalog),
        Arc::clone(&measurer),
        temp_dir.path().join("durations.json"),
    );

    let outcome = resolver.resolve(1, 7).await?;

    assert!(matches!(outcome, TimingOutcome::Reconstructed { .. }));
    assert!(outcome.audio_url().is_none());

    let expected = [(0u64, 1000u64), (1000, 2500), (2500, 4500)];
    let timings = outcome.timings();
    assert_eq!(timings.len(), 3);
    for (timing, (start, end)) in timings.iter().zip(expected.iter()) {
        assert_eq!(timing.start_ms, *start);
        assert_eq!(timing.end_ms, *end);
    }
    Ok(())
}

/// Fallback segments are gapless: each start equals the previous end
#[tokio::test]
async fn test_resolve_withFallback_shouldProduceGaplessSegments() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let urls: Vec<String> = (1..=5).map(|i| format!("https://v.example/{}.mp3", i)).collect();
    let url_refs: Vec<&str> = urls.iter().map(String::as_str).collect();
    let durations: Vec<(&str, u64)> =
        url_refs.iter().enumerate().map(|(i, u)| (*u, 700 + (i as u64) * 123)).collect();

    let catalog = Arc::new(MockAudioCatalog::verse_clips_only(2, &url_refs));
    let measurer = Arc::new(MockClipMeasurer::new(&durations));

    let resolver = resolver_with(catalog, measurer, temp_dir.path().join("durations.json"));
    let outcome = resolver.resolve(2, 7).await?;

    let timings = outcome.timings();
    for pair in timings.windows(2) {
        assert_eq!(pair[1].start_ms, pair[0].end_ms);
    }
    for timing in timings {
        assert!(timing.start_ms < timing.end_ms);
    }
    Ok(())
}

/// Authoritative timestamps win when the catalog publishes them
#[tokio::test]
async fn test_resolve_withAuthoritativeTimestamps_shouldUseThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let catalog = Arc::new(MockAudioCatalog::with_timestamps(
        "https://audio.example/001.mp3",
        vec![
            VerseTiming::new("1:1", 0, 5200),
            VerseTiming::new("1:2", 5200, 11000),
        ],
    ));
    let measurer = Arc::new(MockClipMeasurer::default());

    let resolver = resolver_with(
        Arc::clone(&catalog),
        Arc::clone(&measurer),
        temp_dir.path().join("durations.json"),
    );

    let outcome = resolver.resolve(1, 7).await?;

    assert_eq!(outcome.audio_url(), Some("https://audio.example/001.mp3"));
    assert_eq!(outcome.timings().len(), 2);
    // The fallback never ran
    assert_eq!(catalog.clip_list_calls(), 0);
    assert_eq!(measurer.measure_calls(), 0);
    Ok(())
}

/// Unsorted source timestamps come back sorted by start time
#[tokio::test]
async fn test_resolve_withUnsortedTimestamps_shouldSortByStart() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let catalog = Arc::new(MockAudioCatalog::with_timestamps(
        "https://audio.example/001.mp3",
        vec![
            VerseTiming::new("1:2", 5200, 11000),
            VerseTiming::new("1:1", 0, 5200),
        ],
    ));
    let measurer = Arc::new(MockClipMeasurer::default());

    let resolver = resolver_with(catalog, measurer, temp_dir.path().join("durations.json"));
    let outcome = resolver.resolve(1, 7).await?;

    let timings = outcome.timings();
    assert_eq!(timings[0].verse_key, "1:1");
    assert_eq!(timings[1].verse_key, "1:2");
    assert!(timings[0].start_ms <= timings[1].start_ms);
    Ok(())
}

/// An empty authoritative timestamp list falls through to the fallback,
/// and the chapter-level audio URL is absent from the final outcome
#[tokio::test]
async fn test_resolve_withEmptyTimestampList_shouldFallBack() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let mut catalog = MockAudioCatalog::with_timestamps("https://audio.example/001.mp3", Vec::new());
    catalog.clips = MockAudioCatalog::verse_clips_only(1, &["https://v.example/1.mp3"]).clips;
    let catalog = Arc::new(catalog);

    let measurer = Arc::new(MockClipMeasurer::new(&[("https://v.example/1.mp3", 900)]));

    let resolver = resolver_with(
        Arc::clone(&catalog),
        Arc::clone(&measurer),
        temp_dir.path().join("durations.json"),
    );

    let outcome = resolver.resolve(1, 7).await?;

    assert!(matches!(outcome, TimingOutcome::Reconstructed { .. }));
    assert!(outcome.audio_url().is_none());
    assert_eq!(catalog.clip_list_calls(), 1);
    Ok(())
}

/// A transport failure on the authoritative path degrades to the fallback
/// instead of aborting the chapter
#[tokio::test]
async fn test_resolve_withTransportFailureOnStrategyOne_shouldFallBack() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let mut catalog = MockAudioCatalog::verse_clips_only(1, &["https://v.example/1.mp3"]);
    catalog.chapter_transport_failure = true;
    let catalog = Arc::new(catalog);

    let measurer = Arc::new(MockClipMeasurer::new(&[("https://v.example/1.mp3", 1200)]));

    let resolver = resolver_with(catalog, measurer, temp_dir.path().join("durations.json"));
    let outcome = resolver.resolve(1, 7).await?;

    assert!(matches!(outcome, TimingOutcome::Reconstructed { .. }));
    assert_eq!(outcome.timings()[0].end_ms, 1200);
    Ok(())
}

/// Both strategies failing fails the chapter job
#[tokio::test]
async fn test_resolve_withBothStrategiesFailing_shouldReturnError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let catalog = Arc::new(MockAudioCatalog::default());
    let measurer = Arc::new(MockClipMeasurer::default());

    let resolver = resolver_with(catalog, measurer, temp_dir.path().join("durations.json"));
    assert!(resolver.resolve(1, 7).await.is_err());
    Ok(())
}

/// A pre-populated cache skips measurement entirely and yields the same
/// timings a fresh measurement would have
#[tokio::test]
async fn test_resolve_withWarmCache_shouldNotRemeasure() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let cache_path = temp_dir.path().join("durations.json");

    let urls = ["https://v.example/1.mp3", "https://v.example/2.mp3"];
    let durations = [("https://v.example/1.mp3", 1000u64), ("https://v.example/2.mp3", 1500)];

    // First run measures and persists
    let catalog = Arc::new(MockAudioCatalog::verse_clips_only(1, &urls));
    let measurer = Arc::new(MockClipMeasurer::new(&durations));
    let resolver = resolver_with(Arc::clone(&catalog), Arc::clone(&measurer), cache_path.clone());
    let first = resolver.resolve(1, 7).await?;
    assert_eq!(measurer.measure_calls(), 2);

    // Second run reuses the persisted cache; its measurer is never consulted
    let catalog2 = Arc::new(MockAudioCatalog::verse_clips_only(1, &urls));
    let measurer2 = Arc::new(MockClipMeasurer::default());
    let resolver2 = resolver_with(catalog2, Arc::clone(&measurer2), cache_path);
    let second = resolver2.resolve(1, 7).await?;

    assert_eq!(measurer2.measure_calls(), 0);
    assert_eq!(first.timings(), second.timings());
    Ok(())
}

/// Zero-length measurements are tolerated (warned about, not rejected)
#[tokio::test]
async fn test_resolve_withZeroDuration_shouldKeepSegment() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let catalog = Arc::new(MockAudioCatalog::verse_clips_only(
        1,
        &["https://v.example/1.mp3", "https://v.example/2.mp3"],
    ));
    let measurer = Arc::new(MockClipMeasurer::new(&[
        ("https://v.example/1.mp3", 0),
        ("https://v.example/2.mp3", 800),
    ]));

    let resolver = resolver_with(catalog, measurer, temp_dir.path().join("durations.json"));
    let outcome = resolver.resolve(1, 7).await?;

    let timings = outcome.timings();
    assert_eq!(timings[0].start_ms, 0);
    assert_eq!(timings[0].end_ms, 0);
    assert_eq!(timings[1].start_ms, 0);
    assert_eq!(timings[1].end_ms, 800);
    Ok(())
}
