// Output encoders.
//
// An encoder accumulates `(bytes, kind)` chunks, in opcode order, into the
// final rendered text. Each chunk is turned into text, passed through the
// highlighter, and appended.
//
// - `Utf8Encoder`    — chunks decoded as UTF-8 text
// - `HexEncoder`     — chunks as contiguous lowercase hex (`hex` crate)
// - `HexdumpEncoder` — see `hexdump.rs`

use std::str::Utf8Error;

use crate::align::OpKind;

use super::highlight::Highlight;

/// A chunk could not be decoded as text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("chunk is not valid UTF-8 after {valid_up_to} bytes")]
pub struct DecodeError {
    /// Bytes of the chunk that decoded cleanly.
    pub valid_up_to: usize,
    #[source]
    pub source: Utf8Error,
}

impl From<Utf8Error> for DecodeError {
    fn from(source: Utf8Error) -> Self {
        Self {
            valid_up_to: source.valid_up_to(),
            source,
        }
    }
}

/// Stateful accumulator for rendered output.
pub trait Encoder {
    /// Append one chunk produced by an opcode of `kind`.
    ///
    /// An empty chunk marks a position where the rendered side has no bytes.
    fn append(&mut self, data: &[u8], kind: OpKind) -> Result<(), DecodeError>;

    /// Consume the encoder and return the rendered text.
    fn finish(self) -> String;
}

// ---------------------------------------------------------------------------
// UTF-8
// ---------------------------------------------------------------------------

/// Renders chunks as decoded text.
pub struct Utf8Encoder {
    highlight: Highlight,
    output: String,
}

impl Utf8Encoder {
    pub fn new(highlight: Highlight) -> Self {
        Self {
            highlight,
            output: String::new(),
        }
    }
}

impl Encoder for Utf8Encoder {
    fn append(&mut self, data: &[u8], kind: OpKind) -> Result<(), DecodeError> {
        let text = std::str::from_utf8(data)?;
        self.highlight.paint(&mut self.output, text, kind);
        Ok(())
    }

    fn finish(self) -> String {
        self.output
    }
}

// ---------------------------------------------------------------------------
// Hex
// ---------------------------------------------------------------------------

/// Renders chunks as one continuous hex string.
pub struct HexEncoder {
    highlight: Highlight,
    output: String,
}

impl HexEncoder {
    pub fn new(highlight: Highlight) -> Self {
        Self {
            highlight,
            output: String::new(),
        }
    }
}

impl Encoder for HexEncoder {
    fn append(&mut self, data: &[u8], kind: OpKind) -> Result<(), DecodeError> {
        self.highlight.paint(&mut self.output, &hex::encode(data), kind);
        Ok(())
    }

    fn finish(self) -> String {
        self.output
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
