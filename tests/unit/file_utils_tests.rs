/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use quran_srt::file_utils::FileManager;
use crate::common;

/// file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "present.tmp", "content")?;

    assert!(FileManager::file_exists(&test_file));
    Ok(())
}

/// file_exists returns false for non-existent files
#[test]
fn test_file_exists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.tmp"));
}

/// write_to_file creates missing parent directories
#[test]
fn test_write_to_file_withNestedPath_shouldCreateParents() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("a").join("b").join("out.txt");

    FileManager::write_to_file(&path, "hello")?;

    assert_eq!(std::fs::read_to_string(&path)?, "hello");
    Ok(())
}

/// Atomic writes replace the previous content completely
#[test]
fn test_write_atomic_withExistingFile_shouldReplaceContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("atomic.json");

    FileManager::write_atomic(&path, "first version, longer content")?;
    FileManager::write_atomic(&path, "second")?;

    assert_eq!(std::fs::read_to_string(&path)?, "second");
    Ok(())
}

/// Display names become safe folder names
#[test]
fn test_sanitize_folder_name_withPunctuation_shouldProduceSafeName() {
    assert_eq!(
        FileManager::sanitize_folder_name("Mishari Rashid al-`Afasy"),
        "Mishari_Rashid_al_Afasy"
    );
    assert_eq!(
        FileManager::sanitize_folder_name("T. Usmani"),
        "T_Usmani"
    );
}

/// Degenerate names fall back to a placeholder
#[test]
fn test_sanitize_folder_name_withEmptyOrSymbolic_shouldFallBack() {
    assert_eq!(FileManager::sanitize_folder_name(""), "Unknown");
    assert_eq!(FileManager::sanitize_folder_name("***"), "Unknown");
}
