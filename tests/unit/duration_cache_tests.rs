/*!
 * Tests for the persistent duration cache
 */

use anyhow::Result;
use quran_srt::duration_cache::DurationCache;
use crate::common;

/// Loading from a path with no file yields an empty cache, not an error
#[test]
fn test_load_withMissingFile_shouldReturnEmptyCache() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let cache = DurationCache::load(temp_dir.path().join("nope.json"));

    assert!(cache.is_empty());
    Ok(())
}

/// Corrupt cache content is silently recovered as empty
#[test]
fn test_load_withCorruptFile_shouldReturnEmptyCache() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "durations.json", "{not json at all")?;

    let cache = DurationCache::load(&path);
    assert!(cache.is_empty());
    Ok(())
}

/// save then load reproduces the mapping exactly
#[test]
fn test_save_then_load_shouldRoundTripEntries() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("durations.json");

    let mut cache = DurationCache::load(&path);
    cache.insert("https://verses.example.com/a/1.mp3", 1000);
    cache.insert("https://verses.example.com/a/2.mp3", 1500);
    cache.save()?;

    let reloaded = DurationCache::load(&path);
    assert_eq!(reloaded.len(), 2);
    assert_eq!(reloaded.get("https://verses.example.com/a/1.mp3"), Some(1000));
    assert_eq!(reloaded.get("https://verses.example.com/a/2.mp3"), Some(1500));
    Ok(())
}

/// save(load()) is idempotent: a second save/load cycle changes nothing
#[test]
fn test_save_withUnchangedCache_shouldBeIdempotent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("durations.json");

    let mut cache = DurationCache::load(&path);
    cache.insert("https://verses.example.com/a/1.mp3", 42_000);
    cache.save()?;

    let first_content = std::fs::read_to_string(&path)?;

    let reloaded = DurationCache::load(&path);
    reloaded.save()?;
    let second_content = std::fs::read_to_string(&path)?;

    // Key order is not guaranteed, but a single entry must serialize identically
    assert_eq!(first_content, second_content);
    Ok(())
}

/// Inserting the same key twice keeps the newest value
#[test]
fn test_insert_withSameKey_shouldOverwrite() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut cache = DurationCache::load(temp_dir.path().join("durations.json"));

    cache.insert("https://verses.example.com/a/1.mp3", 1000);
    cache.insert("https://verses.example.com/a/1.mp3", 2000);

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get("https://verses.example.com/a/1.mp3"), Some(2000));
    Ok(())
}

/// The save target's parent directory is created on demand
#[test]
fn test_save_withMissingParentDir_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("nested").join("cache").join("durations.json");

    let mut cache = DurationCache::load(&path);
    cache.insert("https://verses.example.com/a/1.mp3", 500);
    cache.save()?;

    assert!(path.exists());
    Ok(())
}
