// Byte-sequence alignment.
//
// Turns two raw byte sequences into an ordered edit script:
//
// - `matcher` — Target index, longest-match search, matching blocks
// - `opcodes` — Opcode / OpKind and opcode generation from blocks

pub mod matcher;
pub mod opcodes;

pub use matcher::{MatchingBlock, TargetIndex};
pub use opcodes::{OpKind, Opcode};

use log::debug;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration for alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignOptions {
    /// Drop frequent byte values from match seeding on targets of at least
    /// [`matcher::AUTOJUNK_MIN_LEN`] bytes. Keeps large binaries tractable.
    pub autojunk: bool,
}

impl Default for AlignOptions {
    fn default() -> Self {
        Self { autojunk: true }
    }
}

impl AlignOptions {
    /// Always search for the true longest run, whatever the input size.
    pub fn exact() -> Self {
        Self { autojunk: false }
    }
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Summary of one alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignStats {
    /// Matching blocks after merging (sentinel excluded).
    pub blocks: usize,
    /// Bytes covered by `equal` opcodes.
    pub matched_bytes: usize,
    /// Byte values dropped by the popularity heuristic.
    pub popular_bytes: usize,
}

/// An opcode list together with its statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    pub opcodes: Vec<Opcode>,
    pub stats: AlignStats,
}

// ---------------------------------------------------------------------------
// High-level align
// ---------------------------------------------------------------------------

/// Align `source` against `target` with default options.
///
/// The returned opcodes cover both inputs exactly and in order. Defined for
/// all inputs: an empty source yields a single `insert`, an empty target a
/// single `delete`, and two empty inputs no opcodes at all.
pub fn align(source: &[u8], target: &[u8]) -> Vec<Opcode> {
    align_with_options(source, target, &AlignOptions::default())
}

/// Align with custom options.
pub fn align_with_options(source: &[u8], target: &[u8], opts: &AlignOptions) -> Vec<Opcode> {
    align_with_stats(source, target, opts).opcodes
}

/// Align and report statistics.
pub fn align_with_stats(source: &[u8], target: &[u8], opts: &AlignOptions) -> Alignment {
    let index = TargetIndex::build(target, opts.autojunk);
    let blocks = matcher::matching_blocks(source, target, &index);
    let opcodes = opcodes::from_matching_blocks(&blocks);

    debug_assert!(
        opcodes::is_valid_script(&opcodes, source.len(), target.len()),
        "alignment broke the coverage invariant"
    );

    let stats = AlignStats {
        blocks: blocks.len() - 1,
        matched_bytes: blocks.iter().map(|b| b.len).sum(),
        popular_bytes: index.popular_count(),
    };
    debug!(
        "aligned {} -> {} bytes: {} opcodes, {} blocks, {} bytes equal",
        source.len(),
        target.len(),
        opcodes.len(),
        stats.blocks,
        stats.matched_bytes
    );

    Alignment { opcodes, stats }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
