// BOCU-1 wire-format constants and trail-byte tables.
//
// Every value here is part of the external wire contract: changing any of
// them breaks interoperability with ICU and every other BOCU-1 codec.
// Derived values are computed from their definitions and pinned to the
// published literals with compile-time assertions.

// ---------------------------------------------------------------------------
// Byte ranges
// ---------------------------------------------------------------------------

/// Initial anchor: middle of the ASCII block.
pub const ASCII_ANCHOR: u32 = 0x40;

/// Smallest lead byte. Bytes at or below 0x20 encode themselves.
pub const MIN_LEAD: u8 = 0x21;
/// Lead byte for a zero difference.
pub const MIDDLE: u8 = 0x90;
/// Largest lead byte (0xFF is the reset marker).
pub const MAX_LEAD: u8 = 0xFE;
pub const MAX_TRAIL: u8 = 0xFF;

/// Non-coding byte that only resets the anchor.
pub const RESET_BYTE: u8 = 0xFF;

/// Largest byte encoded directly (ASCII space).
pub const DIRECT_MAX: u8 = 0x20;

// ---------------------------------------------------------------------------
// Trail digits
// ---------------------------------------------------------------------------

/// Number of C0 control bytes that double as trail bytes.
pub const TRAIL_CONTROLS: i32 = 20;
/// Offset between a trail digit >= `TRAIL_CONTROLS` and its byte.
pub const TRAIL_BYTE_OFFSET: i32 = MIN_LEAD as i32 - TRAIL_CONTROLS;
/// Base of the trail-byte digits.
pub const TRAIL_COUNT: i32 = (MAX_TRAIL as i32 - MIN_LEAD as i32 + 1) + TRAIL_CONTROLS;

// ---------------------------------------------------------------------------
// Lead-byte allocation and difference reach
// ---------------------------------------------------------------------------

/// Single-byte codes on each side of `MIDDLE` (zero counts as positive).
pub const SINGLE: i32 = 64;

pub const LEAD_2: i32 = 43;
pub const LEAD_3: i32 = 3;
pub const LEAD_4: i32 = 1;

pub const REACH_POS_1: i32 = SINGLE - 1;
pub const REACH_NEG_1: i32 = -SINGLE;

pub const REACH_POS_2: i32 = REACH_POS_1 + LEAD_2 * TRAIL_COUNT;
pub const REACH_NEG_2: i32 = REACH_NEG_1 - LEAD_2 * TRAIL_COUNT;

pub const REACH_POS_3: i32 = REACH_POS_2 + LEAD_3 * TRAIL_COUNT * TRAIL_COUNT;
pub const REACH_NEG_3: i32 = REACH_NEG_2 - LEAD_3 * TRAIL_COUNT * TRAIL_COUNT;

pub const START_POS_2: u8 = (MIDDLE as i32 + REACH_POS_1 + 1) as u8;
pub const START_POS_3: u8 = START_POS_2 + LEAD_2 as u8;
pub const START_POS_4: u8 = START_POS_3 + LEAD_3 as u8;

pub const START_NEG_2: u8 = (MIDDLE as i32 + REACH_NEG_1) as u8;
pub const START_NEG_3: u8 = START_NEG_2 - LEAD_2 as u8;
pub const START_NEG_4: u8 = START_NEG_3 - LEAD_3 as u8;

const _: () = {
    assert!(TRAIL_BYTE_OFFSET == 0x0D);
    assert!(TRAIL_COUNT == 243);
    assert!(REACH_POS_2 == 10_512);
    assert!(REACH_NEG_2 == -10_513);
    assert!(REACH_POS_3 == 187_659);
    assert!(REACH_NEG_3 == -187_660);
    assert!(START_POS_2 == 0xD0);
    assert!(START_POS_3 == 0xFB);
    assert!(START_POS_4 == 0xFE);
    assert!(START_POS_4 as i32 + LEAD_4 - 1 == MAX_LEAD as i32);
    assert!(START_NEG_2 == 0x50);
    assert!(START_NEG_3 == 0x25);
    assert!(START_NEG_4 == 0x22);
    assert!(START_NEG_4 == MIN_LEAD + 1);
};

// ---------------------------------------------------------------------------
// Trail-byte mapping tables
// ---------------------------------------------------------------------------

/// Marker for bytes at or below 0x20 that never appear as trail bytes:
/// NUL, BEL, BS, TAB, LF, VT, FF, CR, SO, SI, SUB, ESC and SP.
pub const INVALID_TRAIL: i8 = -1;

/// Trail digit for each byte 0x00..=0x20, or `INVALID_TRAIL`.
pub const BYTE_TO_TRAIL: [i8; DIRECT_MAX as usize + 1] = [
    -1, 0x00, 0x01, 0x02, 0x03, 0x04, 0x05, -1, // 0x00..=0x07
    -1, -1, -1, -1, -1, -1, -1, -1, // 0x08..=0x0F
    0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, // 0x10..=0x17
    0x0E, 0x0F, -1, -1, 0x10, 0x11, 0x12, 0x13, // 0x18..=0x1F
    -1, // 0x20
];

/// Byte for each trail digit below `TRAIL_CONTROLS`.
pub const TRAIL_TO_BYTE: [u8; TRAIL_CONTROLS as usize] = [
    0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x10, 0x11, 0x12, 0x13, //
    0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1C, 0x1D, 0x1E, 0x1F,
];

/// Map a trail digit (0..243) to its wire byte.
#[inline]
pub const fn trail_to_byte(digit: i32) -> u8 {
    debug_assert!(digit >= 0 && digit < TRAIL_COUNT);
    if digit >= TRAIL_CONTROLS {
        (digit + TRAIL_BYTE_OFFSET) as u8
    } else {
        TRAIL_TO_BYTE[digit as usize]
    }
}

/// Map a wire byte to its trail digit, or `None` for the reserved controls.
#[inline]
pub const fn byte_to_trail(byte: u8) -> Option<i32> {
    if byte <= DIRECT_MAX {
        let digit = BYTE_TO_TRAIL[byte as usize];
        if digit == INVALID_TRAIL {
            None
        } else {
            Some(digit as i32)
        }
    } else {
        Some(byte as i32 - TRAIL_BYTE_OFFSET)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
