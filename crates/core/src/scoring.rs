//! Scoring module - line clear points
//!
//! One settle can clear up to four rows. The points depend only on how many
//! rows went away together; there is no level multiplier and drops score
//! nothing.

use crate::types::LINE_SCORES;

/// Points for `lines` rows cleared by a single settle
pub fn line_clear_score(lines: usize) -> u32 {
    LINE_SCORES.get(lines).copied().unwrap_or(LINE_SCORES[4])
}
