// Edit opcodes.
//
// Turns the ordered list of matching blocks into the full edit script:
//   - `equal`   for each matching block
//   - `replace` / `delete` / `insert` for the gaps between blocks
//
// The resulting opcodes cover both sequences exactly, in order.

use std::fmt;
use std::str::FromStr;

use super::matcher::MatchingBlock;

// ---------------------------------------------------------------------------
// OpKind
// ---------------------------------------------------------------------------

/// The kind of an edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    /// Source and target ranges hold identical bytes.
    Equal,
    /// Source range is replaced by the (non-empty) target range.
    Replace,
    /// Source range is removed; target range is empty.
    Delete,
    /// Target range is added; source range is empty.
    Insert,
}

impl OpKind {
    /// Lowercase name, also used as the HTML span class.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Replace => "replace",
            Self::Delete => "delete",
            Self::Insert => "insert",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OpKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equal" => Ok(Self::Equal),
            "replace" => Ok(Self::Replace),
            "delete" => Ok(Self::Delete),
            "insert" => Ok(Self::Insert),
            other => Err(format!("unknown opcode kind '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Opcode
// ---------------------------------------------------------------------------

/// One edit operation with the half-open ranges it covers in both sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode {
    pub kind: OpKind,
    pub source_start: usize,
    pub source_end: usize,
    pub target_start: usize,
    pub target_end: usize,
}

impl Opcode {
    pub fn new(
        kind: OpKind,
        source_start: usize,
        source_end: usize,
        target_start: usize,
        target_end: usize,
    ) -> Self {
        Self {
            kind,
            source_start,
            source_end,
            target_start,
            target_end,
        }
    }

    #[inline]
    pub fn source_len(&self) -> usize {
        self.source_end - self.source_start
    }

    #[inline]
    pub fn target_len(&self) -> usize {
        self.target_end - self.target_start
    }

    /// The source range as a slice index.
    #[inline]
    pub fn source_range(&self) -> std::ops::Range<usize> {
        self.source_start..self.source_end
    }

    /// The target range as a slice index.
    #[inline]
    pub fn target_range(&self) -> std::ops::Range<usize> {
        self.target_start..self.target_end
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<7} source[{}..{}] target[{}..{}]",
            self.kind.as_str(),
            self.source_start,
            self.source_end,
            self.target_start,
            self.target_end
        )
    }
}

// ---------------------------------------------------------------------------
// Opcode generation
// ---------------------------------------------------------------------------

/// Build the opcode list from matching blocks.
///
/// `blocks` must be sorted, non-overlapping, and end with the zero-length
/// sentinel block at `(source_len, target_len)`; see
/// [`super::matcher::matching_blocks`].
pub fn from_matching_blocks(blocks: &[MatchingBlock]) -> Vec<Opcode> {
    let mut opcodes = Vec::with_capacity(blocks.len() * 2);
    let (mut i, mut j) = (0usize, 0usize);

    for block in blocks {
        let kind = match (i < block.source_pos, j < block.target_pos) {
            (true, true) => Some(OpKind::Replace),
            (true, false) => Some(OpKind::Delete),
            (false, true) => Some(OpKind::Insert),
            (false, false) => None,
        };
        if let Some(kind) = kind {
            opcodes.push(Opcode::new(kind, i, block.source_pos, j, block.target_pos));
        }

        i = block.source_pos + block.len;
        j = block.target_pos + block.len;
        if block.len > 0 {
            opcodes.push(Opcode::new(
                OpKind::Equal,
                block.source_pos,
                i,
                block.target_pos,
                j,
            ));
        }
    }

    opcodes
}

/// Check the coverage invariant: ranges are contiguous, cover both lengths,
/// and no two neighbours share a kind.
pub fn is_valid_script(opcodes: &[Opcode], source_len: usize, target_len: usize) -> bool {
    let (mut i, mut j) = (0usize, 0usize);
    let mut prev: Option<OpKind> = None;

    for op in opcodes {
        if op.source_start != i || op.target_start != j {
            return false;
        }
        if op.source_end < op.source_start || op.target_end < op.target_start {
            return false;
        }
        if prev == Some(op.kind) {
            return false;
        }
        let shape_ok = match op.kind {
            OpKind::Equal => op.source_len() == op.target_len() && op.source_len() > 0,
            OpKind::Replace => op.source_len() > 0 && op.target_len() > 0,
            OpKind::Delete => op.source_len() > 0 && op.target_len() == 0,
            OpKind::Insert => op.source_len() == 0 && op.target_len() > 0,
        };
        if !shape_ok {
            return false;
        }
        i = op.source_end;
        j = op.target_end;
        prev = Some(op.kind);
    }

    i == source_len && j == target_len
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn block(source_pos: usize, target_pos: usize, len: usize) -> MatchingBlock {
        MatchingBlock {
            source_pos,
            target_pos,
            len,
        }
    }

    #[test]
    fn gaps_become_replace_delete_insert() {
        // source: AAxxBBCC   target: AAByyCC  (conceptually)
        let blocks = [
            block(0, 0, 2),
            block(4, 2, 2),
            block(7, 6, 1),
            block(8, 7, 0),
        ];
        let ops = from_matching_blocks(&blocks);
        assert_eq!(
            ops,
            vec![
                Opcode::new(OpKind::Equal, 0, 2, 0, 2),
                Opcode::new(OpKind::Delete, 2, 4, 2, 2),
                Opcode::new(OpKind::Equal, 4, 6, 2, 4),
                Opcode::new(OpKind::Replace, 6, 7, 4, 6),
                Opcode::new(OpKind::Equal, 7, 8, 6, 7),
            ]
        );
        assert!(is_valid_script(&ops, 8, 7));
    }

    #[test]
    fn sentinel_only_yields_single_gap() {
        assert_eq!(
            from_matching_blocks(&[block(0, 5, 0)]),
            vec![Opcode::new(OpKind::Insert, 0, 0, 0, 5)]
        );
        assert_eq!(
            from_matching_blocks(&[block(3, 0, 0)]),
            vec![Opcode::new(OpKind::Delete, 0, 3, 0, 0)]
        );
        assert!(from_matching_blocks(&[block(0, 0, 0)]).is_empty());
    }

    #[test]
    fn validator_rejects_broken_scripts() {
        let gap = vec![
            Opcode::new(OpKind::Equal, 0, 2, 0, 2),
            Opcode::new(OpKind::Equal, 3, 4, 3, 4),
        ];
        assert!(!is_valid_script(&gap, 4, 4));

        let repeated = vec![
            Opcode::new(OpKind::Equal, 0, 2, 0, 2),
            Opcode::new(OpKind::Equal, 2, 4, 2, 4),
        ];
        assert!(!is_valid_script(&repeated, 4, 4));

        let short = vec![Opcode::new(OpKind::Equal, 0, 2, 0, 2)];
        assert!(!is_valid_script(&short, 3, 2));
    }

    #[test]
    fn kind_names_roundtrip_through_from_str() {
        for kind in [
            OpKind::Equal,
            OpKind::Replace,
            OpKind::Delete,
            OpKind::Insert,
        ] {
            assert_eq!(kind.as_str().parse::<OpKind>().unwrap(), kind);
        }
        assert!("move".parse::<OpKind>().is_err());
    }

    #[test]
    fn display_is_padded() {
        let op = Opcode::new(OpKind::Insert, 3, 3, 3, 9);
        assert_eq!(op.to_string(), "insert  source[3..3] target[3..9]");
    }
}
