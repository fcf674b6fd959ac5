/*!
 * Tests for the error taxonomy
 */

use quran_srt::errors::{AppError, CatalogError};

/// Absent data is distinguished from hard failures
#[test]
fn test_is_data_absent_withSourceUnavailable_shouldBeTrue() {
    let error = CatalogError::SourceUnavailable("no chapter recording".to_string());
    assert!(error.is_data_absent());
}

/// Transport, API, parse, and probe failures are not "data absent"
#[test]
fn test_is_data_absent_withHardFailures_shouldBeFalse() {
    assert!(!CatalogError::Transport("connection reset".to_string()).is_data_absent());
    assert!(
        !CatalogError::Api {
            status_code: 502,
            message: "bad gateway".to_string(),
        }
        .is_data_absent()
    );
    assert!(!CatalogError::Parse("truncated JSON".to_string()).is_data_absent());
    assert!(!CatalogError::UnreadableAudio("not an mp3".to_string()).is_data_absent());
}

/// Sweep failures render with the chapter number and cause
#[test]
fn test_sweep_item_display_shouldNameChapterAndCause() {
    let error = AppError::SweepItem {
        chapter: 9,
        cause: "timed out".to_string(),
    };

    assert_eq!(error.to_string(), "chapter 9 failed: timed out");
}

/// Catalog errors convert into the application error
#[test]
fn test_app_error_fromCatalogError_shouldWrap() {
    let error: AppError = CatalogError::Transport("refused".to_string()).into();

    assert!(matches!(error, AppError::Catalog(_)));
    assert_eq!(error.to_string(), "catalog error: transport failure: refused");
}
