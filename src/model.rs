// Object collection and diff orchestration.
//
// The model owns two append-only lists:
//   - objects: the byte buffers being compared (files, packets, records)
//   - diffs:   alignments between pairs of objects, by object index
//
// Diffs never own objects; they refer to them by index, and indices stay
// valid until `clear()` since objects are never removed or reordered.

use log::debug;

use crate::align::{self, AlignOptions, AlignStats, Opcode};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// One comparable artifact: raw bytes plus a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffObject {
    data: Vec<u8>,
    name: String,
    identifier: Option<u64>,
}

impl DiffObject {
    pub fn new(data: impl Into<Vec<u8>>, name: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            name: name.into(),
            identifier: None,
        }
    }

    pub fn with_identifier(mut self, identifier: u64) -> Self {
        self.identifier = Some(identifier);
        self
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identifier(&self) -> Option<u64> {
        self.identifier
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// The edit script relating `model.objects()[source]` to
/// `model.objects()[target]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diff {
    pub source: usize,
    pub target: usize,
    pub opcodes: Vec<Opcode>,
}

impl Diff {
    /// True when the two objects are byte-identical.
    pub fn is_identity(&self) -> bool {
        self.opcodes
            .iter()
            .all(|op| op.kind == align::OpKind::Equal)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("object index {index} out of range (model holds {len} objects)")]
    IndexOutOfRange { index: usize, len: usize },
}

// ---------------------------------------------------------------------------
// MultidiffModel
// ---------------------------------------------------------------------------

/// Ordered objects plus the diffs computed between them.
#[derive(Debug, Clone, Default)]
pub struct MultidiffModel {
    objects: Vec<DiffObject>,
    diffs: Vec<Diff>,
    align_opts: AlignOptions,
}

impl MultidiffModel {
    /// Create an empty model with default alignment options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty model that aligns with `opts`.
    pub fn with_align_options(opts: AlignOptions) -> Self {
        Self {
            align_opts: opts,
            ..Self::default()
        }
    }

    /// Create a model holding one unnamed object per buffer.
    pub fn from_datas<I, D>(datas: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<Vec<u8>>,
    {
        let mut model = Self::new();
        model.add_all(datas);
        model
    }

    pub fn align_options(&self) -> AlignOptions {
        self.align_opts
    }

    /// Append one object and return its index.
    pub fn add(&mut self, data: impl Into<Vec<u8>>, name: impl Into<String>) -> usize {
        self.push(DiffObject::new(data, name))
    }

    /// Append one object carrying a numeric identifier and return its index.
    pub fn add_with_id(
        &mut self,
        data: impl Into<Vec<u8>>,
        name: impl Into<String>,
        identifier: u64,
    ) -> usize {
        self.push(DiffObject::new(data, name).with_identifier(identifier))
    }

    /// Append a prepared object and return its index.
    pub fn push(&mut self, object: DiffObject) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    /// Append unnamed objects in order.
    pub fn add_all<I, D>(&mut self, datas: I)
    where
        I: IntoIterator<Item = D>,
        D: Into<Vec<u8>>,
    {
        for data in datas {
            self.add(data, "");
        }
    }

    /// Drop every object and every diff.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.diffs.clear();
    }

    pub fn objects(&self) -> &[DiffObject] {
        &self.objects
    }

    pub fn diffs(&self) -> &[Diff] {
        &self.diffs
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Look up an object by index.
    pub fn object(&self, index: usize) -> Result<&DiffObject, ModelError> {
        self.objects.get(index).ok_or(ModelError::IndexOutOfRange {
            index,
            len: self.objects.len(),
        })
    }

    /// Align two objects, store the resulting diff and return it.
    ///
    /// Nothing is cached: calling this twice with the same pair appends two
    /// equal diffs.
    pub fn diff(&mut self, source: usize, target: usize) -> Result<&Diff, ModelError> {
        self.diff_with_stats(source, target).map(|(diff, _)| diff)
    }

    /// [`diff`](Self::diff), also returning the statistics of the alignment.
    pub fn diff_with_stats(
        &mut self,
        source: usize,
        target: usize,
    ) -> Result<(&Diff, AlignStats), ModelError> {
        let (diff, stats) = self.compute(source, target)?;
        self.diffs.push(diff);
        Ok((&self.diffs[self.diffs.len() - 1], stats))
    }

    /// Diff every object against the next one: `(0, 1), (1, 2), ...`.
    ///
    /// Returns the number of diffs appended.
    pub fn diff_sequence(&mut self) -> usize {
        let pairs: Vec<(usize, usize)> = (1..self.objects.len()).map(|i| (i - 1, i)).collect();
        self.extend_pairs(&pairs)
    }

    /// Diff every object except `baseline` against `baseline`.
    ///
    /// Returns the number of diffs appended.
    pub fn diff_baseline(&mut self, baseline: usize) -> Result<usize, ModelError> {
        self.object(baseline)?;
        let pairs: Vec<(usize, usize)> = (0..self.objects.len())
            .filter(|&i| i != baseline)
            .map(|i| (baseline, i))
            .collect();
        Ok(self.extend_pairs(&pairs))
    }

    fn compute(&self, source: usize, target: usize) -> Result<(Diff, AlignStats), ModelError> {
        self.object(source)?;
        self.object(target)?;
        Ok(self.align_pair(source, target))
    }

    /// Both indices must already be known to be in range.
    fn align_pair(&self, source: usize, target: usize) -> (Diff, AlignStats) {
        let (src, tgt) = (&self.objects[source], &self.objects[target]);
        debug!(
            "diff #{source} '{}' ({} bytes) -> #{target} '{}' ({} bytes)",
            src.name(),
            src.len(),
            tgt.name(),
            tgt.len()
        );
        let alignment = align::align_with_stats(src.data(), tgt.data(), &self.align_opts);
        let diff = Diff {
            source,
            target,
            opcodes: alignment.opcodes,
        };
        (diff, alignment.stats)
    }

    #[cfg(not(feature = "parallel"))]
    fn extend_pairs(&mut self, pairs: &[(usize, usize)]) -> usize {
        for &(s, t) in pairs {
            let (diff, _) = self.align_pair(s, t);
            self.diffs.push(diff);
        }
        pairs.len()
    }

    #[cfg(feature = "parallel")]
    fn extend_pairs(&mut self, pairs: &[(usize, usize)]) -> usize {
        let computed: Vec<Diff> = pairs
            .par_iter()
            .map(|&(s, t)| self.align_pair(s, t).0)
            .collect();
        self.diffs.extend(computed);
        pairs.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
