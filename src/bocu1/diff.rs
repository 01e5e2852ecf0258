// Difference packing: signed code-point differences <-> 1..4 byte codes.
//
// Lead bytes are handed out outwards from MIDDLE (0x90): 128 single-byte
// codes for -64 <= diff <= 63, then 43 two-byte, 3 three-byte and 1 four-byte
// lead on each side. Trail bytes are base-243 digits, most significant
// first. Because lead bands and trail digits are both assigned in numeric
// order, comparing two codes byte-wise orders them like their differences.

use std::fmt;
use std::ops::Deref;

use super::tables::{
    MIDDLE, MIN_LEAD, REACH_NEG_1, REACH_NEG_2, REACH_NEG_3, REACH_POS_1, REACH_POS_2,
    REACH_POS_3, START_NEG_2, START_NEG_3, START_NEG_4, START_POS_2, START_POS_3, START_POS_4,
    TRAIL_COUNT, byte_to_trail, trail_to_byte,
};

/// Largest number of bytes one code point can take.
pub const MAX_PACKED_LEN: usize = 4;

// ---------------------------------------------------------------------------
// Packed byte sequence
// ---------------------------------------------------------------------------

/// The 1..4 wire bytes of one encoded symbol, in output order.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Packed {
    bytes: [u8; MAX_PACKED_LEN],
    len: u8,
}

impl Packed {
    /// A one-byte code (direct control, single-byte difference or reset).
    #[inline]
    pub const fn single(byte: u8) -> Self {
        Self {
            bytes: [byte, 0, 0, 0],
            len: 1,
        }
    }

    /// The encoded bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }

    /// The lead (first) byte.
    #[inline]
    pub const fn lead(&self) -> u8 {
        self.bytes[0]
    }

    #[inline]
    #[allow(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        self.len as usize
    }
}

impl Deref for Packed {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl AsRef<[u8]> for Packed {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl fmt::Debug for Packed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Packed[")?;
        for (i, b) in self.as_bytes().iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{b:02X}")?;
        }
        write!(f, "]")
    }
}

// ---------------------------------------------------------------------------
// Packing
// ---------------------------------------------------------------------------

/// Pack a difference in `-0x10FFFF..=0x10FFFF` into its wire bytes.
pub fn pack(diff: i32) -> Packed {
    debug_assert!((-0x10FFFF..=0x10FFFF).contains(&diff));

    // (bias, lead base, trail count)
    let (bias, lead, trails) = if diff >= REACH_NEG_1 {
        if diff <= REACH_POS_1 {
            return Packed::single((i32::from(MIDDLE) + diff) as u8);
        } else if diff <= REACH_POS_2 {
            (REACH_POS_1 + 1, START_POS_2, 1)
        } else if diff <= REACH_POS_3 {
            (REACH_POS_2 + 1, START_POS_3, 2)
        } else {
            (REACH_POS_3 + 1, START_POS_4, 3)
        }
    } else if diff >= REACH_NEG_2 {
        (REACH_NEG_1, START_NEG_2, 1)
    } else if diff >= REACH_NEG_3 {
        (REACH_NEG_2, START_NEG_3, 2)
    } else {
        (REACH_NEG_3, START_NEG_4, 3)
    };

    let mut bytes = [0u8; MAX_PACKED_LEN];
    let mut rest = diff - bias;

    // Digits come out least significant first; store them from the back.
    for slot in bytes[1..=trails].iter_mut().rev() {
        *slot = trail_to_byte(rest.rem_euclid(TRAIL_COUNT));
        rest = rest.div_euclid(TRAIL_COUNT);
    }

    let lead = i32::from(lead) + rest;
    debug_assert!((i32::from(MIN_LEAD)..=0xFE).contains(&lead));
    bytes[0] = lead as u8;

    Packed {
        bytes,
        len: trails as u8 + 1,
    }
}

/// Encoded length of a difference, without packing it.
pub const fn packed_len(diff: i32) -> usize {
    if diff >= REACH_NEG_1 {
        if diff <= REACH_POS_1 {
            1
        } else if diff <= REACH_POS_2 {
            2
        } else if diff <= REACH_POS_3 {
            3
        } else {
            4
        }
    } else if diff >= REACH_NEG_2 {
        2
    } else if diff >= REACH_NEG_3 {
        3
    } else {
        4
    }
}

// ---------------------------------------------------------------------------
// Unpacking
// ---------------------------------------------------------------------------

/// What a lead byte in `MIN_LEAD..=MAX_LEAD` says about its difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lead {
    /// The whole difference, no trail bytes.
    Single(i32),
    /// The lead's share of the difference and the number of trail bytes.
    Multi { partial: i32, trails: u8 },
}

impl Lead {
    /// Total length of the sequence this lead starts.
    pub const fn sequence_len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Multi { trails, .. } => *trails as usize + 1,
        }
    }
}

const TRAIL_COUNT_2: i32 = TRAIL_COUNT * TRAIL_COUNT;
const TRAIL_COUNT_3: i32 = TRAIL_COUNT_2 * TRAIL_COUNT;

/// Classify a lead byte. `lead` must not be a direct byte (<= 0x20) or the
/// reset byte; those are handled before differences are considered.
pub const fn classify_lead(lead: u8) -> Lead {
    let b = lead as i32;
    if lead >= START_NEG_2 {
        if lead < START_POS_2 {
            Lead::Single(b - MIDDLE as i32)
        } else if lead < START_POS_3 {
            Lead::Multi {
                partial: (b - START_POS_2 as i32) * TRAIL_COUNT + REACH_POS_1 + 1,
                trails: 1,
            }
        } else if lead < START_POS_4 {
            Lead::Multi {
                partial: (b - START_POS_3 as i32) * TRAIL_COUNT_2 + REACH_POS_2 + 1,
                trails: 2,
            }
        } else {
            Lead::Multi {
                partial: REACH_POS_3 + 1,
                trails: 3,
            }
        }
    } else if lead >= START_NEG_3 {
        Lead::Multi {
            partial: (b - START_NEG_2 as i32) * TRAIL_COUNT + REACH_NEG_1,
            trails: 1,
        }
    } else if lead > MIN_LEAD {
        Lead::Multi {
            partial: (b - START_NEG_3 as i32) * TRAIL_COUNT_2 + REACH_NEG_2,
            trails: 2,
        }
    } else {
        Lead::Multi {
            partial: -TRAIL_COUNT_3 + REACH_NEG_3,
            trails: 3,
        }
    }
}

/// Weight of a trail digit when `remaining` trail bytes (including this
/// one) are still expected.
#[inline]
pub const fn trail_weight(remaining: u8) -> i32 {
    match remaining {
        1 => 1,
        2 => TRAIL_COUNT,
        _ => TRAIL_COUNT_2,
    }
}

/// Trail digit of a byte, `None` if the byte is a reserved control.
#[inline]
pub const fn trail_digit(byte: u8) -> Option<i32> {
    byte_to_trail(byte)
}

/// Unpack one complete difference code from the front of `bytes`.
///
/// Returns the difference and the number of bytes consumed, or `None` if
/// the code is truncated, starts with a non-lead byte, or has a reserved
/// trail byte. The decoder drives the same arithmetic byte by byte; this
/// form is for inspecting codes.
pub fn unpack(bytes: &[u8]) -> Option<(i32, usize)> {
    let &lead = bytes.first()?;
    if !(MIN_LEAD..=super::tables::MAX_LEAD).contains(&lead) {
        return None;
    }
    match classify_lead(lead) {
        Lead::Single(diff) => Some((diff, 1)),
        Lead::Multi { partial, trails } => {
            let len = trails as usize + 1;
            let trail_bytes = bytes.get(1..len)?;
            let mut diff = partial;
            for (i, &b) in trail_bytes.iter().enumerate() {
                diff += trail_digit(b)? * trail_weight(trails - i as u8);
            }
            Some((diff, len))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
