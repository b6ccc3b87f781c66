// Hexdump encoder.
//
// Produces the classic address-prefixed dump, 16 bytes per row:
//
//   000000: 48 65 6c 6c 6f 2c 20 57 6f 72 6c 64 21          |Hello, World!   |
//
// Chunks arrive with arbitrary lengths and rarely align to rows, so a chunk
// may be split across several rows; each piece is highlighted on its own in
// both the hex and the ASCII column.
//
// An empty chunk is a placeholder: the rendered side has no bytes where the
// other side has some. It shows up as one highlighted blank in the hex
// column, standing in for the separator that would precede the next byte.

use crate::align::OpKind;

use super::encoder::{DecodeError, Encoder};
use super::highlight::Highlight;

/// Bytes per row.
pub const ROW_WIDTH: usize = 16;

/// Hex column characters per byte slot: separator plus two digits.
const HEX_SLOT: usize = 3;

#[inline]
fn ascii_char(byte: u8) -> char {
    if (0x20..=0x7e).contains(&byte) {
        byte as char
    } else {
        '.'
    }
}

/// Append `bytes` as space separated lowercase hex pairs.
fn push_spaced_hex(out: &mut String, bytes: &[u8]) {
    let digits = hex::encode(bytes);
    for (n, pair) in digits.as_bytes().chunks_exact(2).enumerate() {
        if n > 0 {
            out.push(' ');
        }
        out.extend(pair.iter().map(|&d| char::from(d)));
    }
}

/// Row-addressed, per-byte-highlighted hexdump.
pub struct HexdumpEncoder {
    highlight: Highlight,
    /// Finished rows, newline separated.
    body: String,
    /// Address of the row in progress.
    address: usize,
    /// Bytes placed in the row in progress (0..=ROW_WIDTH).
    row_len: usize,
    hex_column: String,
    ascii_column: String,
    /// Set by a placeholder: the next separator is already on the row.
    skip_separator: bool,
    scratch: String,
}

impl HexdumpEncoder {
    pub fn new(highlight: Highlight) -> Self {
        Self {
            highlight,
            body: String::new(),
            address: 0,
            row_len: 0,
            hex_column: String::new(),
            ascii_column: String::new(),
            skip_separator: false,
            scratch: String::new(),
        }
    }

    /// Put a chunk that fits in the current row.
    fn put_chunk(&mut self, chunk: &[u8], kind: OpKind) {
        debug_assert!(!chunk.is_empty() && self.row_len + chunk.len() <= ROW_WIDTH);
        self.separator();

        self.scratch.clear();
        push_spaced_hex(&mut self.scratch, chunk);
        self.highlight.paint(&mut self.hex_column, &self.scratch, kind);

        self.scratch.clear();
        self.scratch.extend(chunk.iter().copied().map(ascii_char));
        self.highlight.paint(&mut self.ascii_column, &self.scratch, kind);

        self.row_len += chunk.len();
    }

    fn put_placeholder(&mut self, kind: OpKind) {
        self.highlight.paint(&mut self.hex_column, " ", kind);
        self.skip_separator = true;
    }

    fn separator(&mut self) {
        if self.skip_separator {
            self.skip_separator = false;
        } else {
            self.hex_column.push(' ');
        }
    }

    fn finish_row(&mut self) {
        self.separator();
        if self.address != 0 {
            self.body.push('\n');
        }
        self.body.push_str(&format!("{:06x}:", self.address));
        self.body.push_str(&self.hex_column);
        self.body.push('|');
        self.body.push_str(&self.ascii_column);
        self.body.push('|');

        self.address += ROW_WIDTH;
        self.row_len = 0;
        self.hex_column.clear();
        self.ascii_column.clear();
    }
}

impl Encoder for HexdumpEncoder {
    fn append(&mut self, data: &[u8], kind: OpKind) -> Result<(), DecodeError> {
        if data.is_empty() {
            self.put_placeholder(kind);
            return Ok(());
        }

        let mut rest = data;
        while !rest.is_empty() {
            if self.row_len == ROW_WIDTH {
                self.finish_row();
            }
            let take = (ROW_WIDTH - self.row_len).min(rest.len());
            let (chunk, tail) = rest.split_at(take);
            self.put_chunk(chunk, kind);
            rest = tail;
        }
        Ok(())
    }

    fn finish(mut self) -> String {
        let missing = ROW_WIDTH - self.row_len;
        self.hex_column.extend(std::iter::repeat_n(' ', HEX_SLOT * missing));
        self.ascii_column.extend(std::iter::repeat_n(' ', missing));
        self.finish_row();
        self.body
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
