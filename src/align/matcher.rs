// Block matching for byte sequences.
//
// Finds the matching blocks between a source and a target:
//   1. Index every target position by byte value
//   2. Optionally drop "popular" byte values from the index (autojunk)
//   3. Longest common run search over a (source, target) region
//   4. Work-list over the regions left and right of each match
//   5. Sort and merge adjacent blocks
//
// The work-list is an explicit stack, so buffer size never affects call depth.

use log::trace;

/// Targets shorter than this never have popular bytes dropped.
pub const AUTOJUNK_MIN_LEN: usize = 200;

// ---------------------------------------------------------------------------
// Matching block
// ---------------------------------------------------------------------------

/// A run of `len` identical bytes at `source[source_pos..]` and
/// `target[target_pos..]`.
///
/// Field order matters: the derived `Ord` sorts by source position first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchingBlock {
    pub source_pos: usize,
    pub target_pos: usize,
    pub len: usize,
}

// ---------------------------------------------------------------------------
// Target index
// ---------------------------------------------------------------------------

/// Positions of each byte value in the target, ascending.
///
/// Byte values flagged as popular have an empty position list. They are
/// never used to seed a match but a seeded match still extends over them.
pub struct TargetIndex {
    positions: Vec<Vec<usize>>,
    popular: [bool; 256],
}

impl TargetIndex {
    /// Index `target`. With `autojunk`, a byte value occurring more than
    /// `len / 100 + 1` times in a target of at least [`AUTOJUNK_MIN_LEN`]
    /// bytes is marked popular.
    pub fn build(target: &[u8], autojunk: bool) -> Self {
        let mut positions: Vec<Vec<usize>> = vec![Vec::new(); 256];
        for (pos, &byte) in target.iter().enumerate() {
            positions[byte as usize].push(pos);
        }

        let mut popular = [false; 256];
        if autojunk && target.len() >= AUTOJUNK_MIN_LEN {
            let threshold = target.len() / 100 + 1;
            for (byte, list) in positions.iter_mut().enumerate() {
                if list.len() > threshold {
                    popular[byte] = true;
                    list.clear();
                    list.shrink_to_fit();
                }
            }
        }

        Self { positions, popular }
    }

    /// Target positions holding `byte`, or nothing if it is popular.
    #[inline]
    pub fn positions(&self, byte: u8) -> &[usize] {
        &self.positions[byte as usize]
    }

    #[inline]
    pub fn is_popular(&self, byte: u8) -> bool {
        self.popular[byte as usize]
    }

    /// Number of byte values dropped by the popularity heuristic.
    pub fn popular_count(&self) -> usize {
        self.popular.iter().filter(|&&p| p).count()
    }
}

// ---------------------------------------------------------------------------
// Longest match
// ---------------------------------------------------------------------------

/// Half-open region `source[alo..ahi]` x `target[blo..bhi]`.
#[derive(Debug, Clone, Copy)]
struct Region {
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
}

/// Find the longest run shared by `source[alo..ahi]` and `target[blo..bhi]`.
///
/// Among equally long runs the one starting earliest in the source wins,
/// then the one starting earliest in the target. Returns a zero-length block
/// at `(alo, blo)` when nothing matches.
pub fn find_longest_match(
    source: &[u8],
    target: &[u8],
    index: &TargetIndex,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> MatchingBlock {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);

    if alo < ahi && blo < bhi {
        // Run lengths ending at (i - 1, j) are kept in slot `j - blo + 1`;
        // slot 0 stands for `blo - 1` and always reads as zero.
        let width = bhi - blo + 1;
        let mut prev_row = vec![0usize; width];
        let mut row = vec![0usize; width];
        let mut prev_touched: Vec<usize> = Vec::new();
        let mut touched: Vec<usize> = Vec::new();

        for (i, &byte) in source.iter().enumerate().take(ahi).skip(alo) {
            let list = index.positions(byte);
            let start = list.partition_point(|&p| p < blo);
            for &j in &list[start..] {
                if j >= bhi {
                    break;
                }
                let slot = j - blo + 1;
                let k = prev_row[slot - 1] + 1;
                row[slot] = k;
                touched.push(slot);
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }

            for &slot in &prev_touched {
                prev_row[slot] = 0;
            }
            std::mem::swap(&mut prev_row, &mut row);
            std::mem::swap(&mut prev_touched, &mut touched);
            touched.clear();
        }
    }

    // Popular bytes never seed a match; grow the winner over them.
    while best_i > alo && best_j > blo && source[best_i - 1] == target[best_j - 1] {
        best_i -= 1;
        best_j -= 1;
        best_size += 1;
    }
    while best_i + best_size < ahi
        && best_j + best_size < bhi
        && source[best_i + best_size] == target[best_j + best_size]
    {
        best_size += 1;
    }

    MatchingBlock {
        source_pos: best_i,
        target_pos: best_j,
        len: best_size,
    }
}

// ---------------------------------------------------------------------------
// Matching blocks
// ---------------------------------------------------------------------------

/// All matching blocks between `source` and `target`, sorted, with adjacent
/// blocks merged, terminated by the zero-length sentinel
/// `(source.len(), target.len(), 0)`.
pub fn matching_blocks(source: &[u8], target: &[u8], index: &TargetIndex) -> Vec<MatchingBlock> {
    let mut found: Vec<MatchingBlock> = Vec::new();
    let mut pending = vec![Region {
        alo: 0,
        ahi: source.len(),
        blo: 0,
        bhi: target.len(),
    }];

    while let Some(r) = pending.pop() {
        let m = find_longest_match(source, target, index, r.alo, r.ahi, r.blo, r.bhi);
        if m.len == 0 {
            continue;
        }
        trace!(
            "match source[{}..{}] target[{}..{}]",
            m.source_pos,
            m.source_pos + m.len,
            m.target_pos,
            m.target_pos + m.len
        );
        found.push(m);

        if r.alo < m.source_pos && r.blo < m.target_pos {
            pending.push(Region {
                alo: r.alo,
                ahi: m.source_pos,
                blo: r.blo,
                bhi: m.target_pos,
            });
        }
        let (i, j) = (m.source_pos + m.len, m.target_pos + m.len);
        if i < r.ahi && j < r.bhi {
            pending.push(Region {
                alo: i,
                ahi: r.ahi,
                blo: j,
                bhi: r.bhi,
            });
        }
    }

    found.sort_unstable();

    let mut merged: Vec<MatchingBlock> = Vec::with_capacity(found.len() + 1);
    for block in found {
        match merged.last_mut() {
            Some(last)
                if last.source_pos + last.len == block.source_pos
                    && last.target_pos + last.len == block.target_pos =>
            {
                last.len += block.len;
            }
            _ => merged.push(block),
        }
    }

    merged.push(MatchingBlock {
        source_pos: source.len(),
        target_pos: target.len(),
        len: 0,
    });
    merged
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn longest(a: &[u8], b: &[u8]) -> MatchingBlock {
        let index = TargetIndex::build(b, false);
        find_longest_match(a, b, &index, 0, a.len(), 0, b.len())
    }

    #[test]
    fn longest_match_basic() {
        let m = longest(b"xxabcdyy", b"zabcdz");
        assert_eq!(
            m,
            MatchingBlock {
                source_pos: 2,
                target_pos: 1,
                len: 4
            }
        );
    }

    #[test]
    fn longest_match_prefers_earliest() {
        // "ab" occurs twice in both; the earliest pair wins.
        let m = longest(b"ab-ab", b"ab+ab");
        assert_eq!(
            m,
            MatchingBlock {
                source_pos: 0,
                target_pos: 0,
                len: 2
            }
        );

        // Same source position, two target candidates.
        let m = longest(b"q", b"xqyq");
        assert_eq!((m.source_pos, m.target_pos, m.len), (0, 1, 1));
    }

    #[test]
    fn longest_match_none() {
        let m = longest(b"aaa", b"bbb");
        assert_eq!(m.len, 0);
        assert_eq!((m.source_pos, m.target_pos), (0, 0));
    }

    #[test]
    fn longest_match_respects_region() {
        let a = b"abcabc";
        let b = b"abcabc";
        let index = TargetIndex::build(b, false);
        let m = find_longest_match(a, b, &index, 3, 6, 0, 2);
        assert_eq!((m.source_pos, m.target_pos, m.len), (3, 0, 2));
    }

    #[test]
    fn popular_bytes_are_dropped_from_index() {
        let mut target = vec![0u8; 300];
        target[10] = 7;
        let index = TargetIndex::build(&target, true);
        assert!(index.is_popular(0));
        assert!(index.positions(0).is_empty());
        assert_eq!(index.positions(7), &[10]);
        assert_eq!(index.popular_count(), 1);

        let exact = TargetIndex::build(&target, false);
        assert!(!exact.is_popular(0));
        assert_eq!(exact.positions(0).len(), 299);
    }

    #[test]
    fn short_targets_never_junk() {
        let target = vec![0u8; AUTOJUNK_MIN_LEN - 1];
        let index = TargetIndex::build(&target, true);
        assert_eq!(index.popular_count(), 0);
    }

    #[test]
    fn match_extends_over_popular_bytes() {
        let mut data = vec![0u8; 400];
        data[200] = 1;
        let index = TargetIndex::build(&data, true);
        assert!(index.is_popular(0));
        let m = find_longest_match(&data, &data, &index, 0, data.len(), 0, data.len());
        assert_eq!((m.source_pos, m.target_pos, m.len), (0, 0, 400));
    }

    #[test]
    fn blocks_are_merged_and_terminated() {
        let a = b"abcXdef";
        let b = b"abcYdef";
        let index = TargetIndex::build(b, false);
        let blocks = matching_blocks(a, b, &index);
        assert_eq!(
            blocks,
            vec![
                MatchingBlock {
                    source_pos: 0,
                    target_pos: 0,
                    len: 3
                },
                MatchingBlock {
                    source_pos: 4,
                    target_pos: 4,
                    len: 3
                },
                MatchingBlock {
                    source_pos: 7,
                    target_pos: 7,
                    len: 0
                },
            ]
        );
    }

    #[test]
    fn empty_inputs_yield_only_sentinel() {
        let index = TargetIndex::build(b"", false);
        assert_eq!(
            matching_blocks(b"", b"", &index),
            vec![MatchingBlock {
                source_pos: 0,
                target_pos: 0,
                len: 0
            }]
        );
    }
}
