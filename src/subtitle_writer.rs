use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use log::warn;

use crate::file_utils::FileManager;

// @module: Verse timing model and subtitle/table output

/// UTF-8 byte order mark, prepended on request for spreadsheet-friendly output
const BOM: &str = "\u{feff}";

// @struct: Timing segment for a single verse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseTiming {
    // @field: Canonical "chapter:verse" key
    pub verse_key: String,

    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End time in ms
    pub end_ms: u64,
}

impl VerseTiming {
    /// Creates a new verse timing segment
    pub fn new(verse_key: impl Into<String>, start_ms: u64, end_ms: u64) -> Self {
        VerseTiming {
            verse_key: verse_key.into(),
            start_ms,
            end_ms,
        }
    }

    // @creates: Validated timing segment
    // @validates: End not before start
    pub fn new_validated(verse_key: impl Into<String>, start_ms: u64, end_ms: u64) -> Result<Self> {
        if end_ms < start_ms {
            return Err(anyhow!(
                "Invalid time range: end time {} < start time {}",
                end_ms,
                start_ms
            ));
        }

        Ok(VerseTiming {
            verse_key: verse_key.into(),
            start_ms,
            end_ms,
        })
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_ms)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl fmt::Display for VerseTiming {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} --> {}", self.format_start_time(), self.format_end_time())
    }
}

/// Writer for SRT subtitle files and the CSV verse table
pub struct SubtitleWriter;

impl SubtitleWriter {
    /// Write an SRT file from parallel timing and text sequences.
    ///
    /// Emits one block per timing entry: 1-based index, time range line,
    /// text line, blank separator. If `texts` is shorter than `timings` the
    /// remaining blocks carry an empty text line; post-alignment this should
    /// not occur.
    ///
    /// Output is UTF-8, with a leading byte order mark only when `bom` is set.
    pub fn write_srt<P: AsRef<Path>>(
        output_dir: P,
        file_name: &str,
        timings: &[VerseTiming],
        texts: &[String],
        bom: bool,
    ) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        FileManager::ensure_dir(output_dir)?;
        let out_path = output_dir.join(file_name);

        if texts.len() < timings.len() {
            warn!(
                "Writing {} with {} timings but only {} text lines",
                file_name,
                timings.len(),
                texts.len()
            );
        }

        let mut file = File::create(&out_path)
            .with_context(|| format!("Failed to create subtitle file: {}", out_path.display()))?;

        if bom {
            write!(file, "{}", BOM)?;
        }

        for (i, timing) in timings.iter().enumerate() {
            let line = texts.get(i).map(String::as_str).unwrap_or("");
            writeln!(file, "{}", i + 1)?;
            writeln!(file, "{}", timing)?;
            writeln!(file, "{}", line)?;
            writeln!(file)?;
        }

        Ok(out_path)
    }

    /// Write the per-verse CSV table: header row plus one row per aligned
    /// verse, keyed `"{chapter}:{ordinal}"`. Written with a UTF-8 BOM so
    /// spreadsheet applications pick up the encoding.
    pub fn write_csv<P: AsRef<Path>>(
        output_dir: P,
        chapter: u32,
        arabic_texts: &[String],
        translated_texts: &[String],
    ) -> Result<PathBuf> {
        let output_dir = output_dir.as_ref();
        FileManager::ensure_dir(output_dir)?;
        let out_path = output_dir.join(format!("{}.csv", chapter));

        let rows = arabic_texts.len().min(translated_texts.len());

        let mut content = String::from(BOM);
        content.push_str("Ayah,Arabic,Translation\r\n");
        for i in 0..rows {
            content.push_str(&format!(
                "{},{},{}\r\n",
                Self::csv_field(&format!("{}:{}", chapter, i + 1)),
                Self::csv_field(&arabic_texts[i]),
                Self::csv_field(&translated_texts[i])
            ));
        }

        FileManager::write_to_file(&out_path, &content)?;
        Ok(out_path)
    }

    /// Quote a CSV field when it contains a delimiter, quote, or newline
    fn csv_field(value: &str) -> String {
        if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }
}
