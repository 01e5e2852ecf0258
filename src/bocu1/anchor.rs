// Anchor selection: the reference code point for the next difference.
//
// After each symbol the anchor moves to the middle of the script block the
// symbol belongs to, so runs of same-script text produce small differences.
// Most small scripts sit in 128-aligned blocks; Hiragana, CJK Unihan and
// Hangul get hand-picked centres.

use super::tables::{ASCII_ANCHOR, REACH_NEG_2};

/// Anchor after any Hiragana code point (the block is not 128-aligned).
pub const HIRAGANA_ANCHOR: u32 = 0x3070;

/// Anchor after any CJK Unihan code point. Placed so that the whole
/// U+4E00..=U+9FA5 block is reachable with two-byte differences.
pub const UNIHAN_ANCHOR: u32 = (0x4E00 - REACH_NEG_2) as u32;

/// Anchor after any Hangul syllable: middle of U+AC00..=U+D7A3.
pub const HANGUL_ANCHOR: u32 = 0xC1D1;

/// Compute the anchor that follows code point `c`.
#[inline]
pub const fn next_anchor(c: u32) -> u32 {
    match c {
        0x3040..=0x309F => HIRAGANA_ANCHOR,
        0x4E00..=0x9FA5 => UNIHAN_ANCHOR,
        0xAC00..=0xD7A3 => HANGUL_ANCHOR,
        _ => (c & !0x7F) + ASCII_ANCHOR,
    }
}
