/*!
 * Alignment of independently-sourced timing and text sequences.
 *
 * Timings, Arabic text, and translated text arrive from three different
 * sources and may disagree on verse count. The policy is deliberate leniency:
 * truncate all three to the common prefix length rather than failing the
 * chapter over one missing line. The shortfall is observable as a warning.
 */

use log::warn;

use crate::subtitle_writer::VerseTiming;

/// The three sequences truncated to a common usable length
#[derive(Debug)]
pub struct AlignedTriple {
    /// Verse timings, length k
    pub timings: Vec<VerseTiming>,

    /// Arabic verse text, length k
    pub arabic: Vec<String>,

    /// Translated verse text, length k
    pub translated: Vec<String>,
}

impl AlignedTriple {
    /// Common length of the three sequences
    pub fn len(&self) -> usize {
        self.timings.len()
    }

    /// Check if the aligned result is empty
    pub fn is_empty(&self) -> bool {
        self.timings.is_empty()
    }
}

/// Truncate the three sequences to `min(lengths)`, preserving order.
/// No interpolation, no padding.
pub fn align(
    mut timings: Vec<VerseTiming>,
    mut arabic: Vec<String>,
    mut translated: Vec<String>,
) -> AlignedTriple {
    let k = timings.len().min(arabic.len()).min(translated.len());

    if k < timings.len() || k < arabic.len() || k < translated.len() {
        warn!(
            "Sequence length mismatch (timings: {}, arabic: {}, translation: {}), truncating to {}",
            timings.len(),
            arabic.len(),
            translated.len(),
            k
        );
    }

    timings.truncate(k);
    arabic.truncate(k);
    translated.truncate(k);

    AlignedTriple {
        timings,
        arabic,
        translated,
    }
}
