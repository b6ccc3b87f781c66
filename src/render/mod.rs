// Diff rendering.
//
// A `Renderer` replays a diff's opcodes against one side's bytes and feeds
// each slice, tagged with its opcode kind, into an encoder:
//
// - `highlight` — Highlighter backends (ANSI, HTML, plain)
// - `encoder`   — Encoder trait, UTF-8 and hex encoders
// - `hexdump`   — Row-addressed hexdump encoder
//
// Encoding and highlighting are closed enums resolved once when the
// renderer is built.

pub mod encoder;
pub mod hexdump;
pub mod highlight;

pub use encoder::{DecodeError, Encoder, HexEncoder, Utf8Encoder};
pub use hexdump::HexdumpEncoder;
pub use highlight::Highlight;

use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::model::{Diff, ModelError, MultidiffModel};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Output encoding for rendered bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Address-prefixed hex + ASCII rows.
    #[default]
    Hexdump,
    /// Continuous lowercase hex.
    Hex,
    /// Bytes decoded as UTF-8 text.
    Utf8,
}

/// Which side of a diff gets rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    Source,
    #[default]
    Target,
}

/// Renderer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub encoding: Encoding,
    pub highlight: Highlight,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// An unrecognised configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown encoding '{0}' (expected hexdump, hex or utf8)")]
    UnknownEncoding(String),
    #[error("unknown color mode '{0}' (expected ansi or html)")]
    UnknownColor(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Model(#[from] ModelError),
    /// Opcode `opcode` covers bytes that are not valid UTF-8, starting at
    /// `offset` in the rendered object.
    #[error("opcode {opcode}: invalid UTF-8 at offset {offset}")]
    Decode {
        opcode: usize,
        offset: usize,
        #[source]
        source: DecodeError,
    },
}

impl FromStr for Encoding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hexdump" => Ok(Self::Hexdump),
            "hex" => Ok(Self::Hex),
            "utf8" => Ok(Self::Utf8),
            other => Err(ConfigError::UnknownEncoding(other.to_string())),
        }
    }
}

impl FromStr for Highlight {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ansi" => Ok(Self::Ansi),
            "html" => Ok(Self::Html),
            other => Err(ConfigError::UnknownColor(other.to_string())),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hexdump => "hexdump",
            Self::Hex => "hex",
            Self::Utf8 => "utf8",
        })
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Renders diffs of a model into strings.
#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    opts: RenderOptions,
}

impl Renderer {
    pub fn new(opts: RenderOptions) -> Self {
        Self { opts }
    }

    /// Build from configuration names, e.g. `("hexdump", "ansi")`.
    pub fn from_names(encode: &str, color: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(RenderOptions {
            encoding: encode.parse()?,
            highlight: color.parse()?,
        }))
    }

    pub fn options(&self) -> RenderOptions {
        self.opts
    }

    /// Render the target side of `diff`.
    pub fn render(&self, model: &MultidiffModel, diff: &Diff) -> Result<String, RenderError> {
        self.render_side(model, diff, Side::Target)
    }

    /// Render the source side of `diff`, in the same layout.
    pub fn render_source(
        &self,
        model: &MultidiffModel,
        diff: &Diff,
    ) -> Result<String, RenderError> {
        self.render_side(model, diff, Side::Source)
    }

    pub fn render_side(
        &self,
        model: &MultidiffModel,
        diff: &Diff,
        side: Side,
    ) -> Result<String, RenderError> {
        let index = match side {
            Side::Source => diff.source,
            Side::Target => diff.target,
        };
        let data = model.object(index)?.data();
        debug!(
            "render {:?} #{index} as {} ({} opcodes)",
            side,
            self.opts.encoding,
            diff.opcodes.len()
        );

        let h = self.opts.highlight;
        match self.opts.encoding {
            Encoding::Hexdump => replay(HexdumpEncoder::new(h), data, diff, side),
            Encoding::Hex => replay(HexEncoder::new(h), data, diff, side),
            Encoding::Utf8 => replay(Utf8Encoder::new(h), data, diff, side),
        }
    }

    /// Render every diff of the model, in order, each followed by a newline.
    pub fn dump_all(&self, model: &MultidiffModel) -> Result<String, RenderError> {
        let rendered = self.render_all(model)?;
        let mut out = String::with_capacity(rendered.iter().map(|r| r.len() + 1).sum());
        for r in rendered {
            out.push_str(&r);
            out.push('\n');
        }
        Ok(out)
    }

    #[cfg(not(feature = "parallel"))]
    fn render_all(&self, model: &MultidiffModel) -> Result<Vec<String>, RenderError> {
        model
            .diffs()
            .iter()
            .map(|diff| self.render(model, diff))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn render_all(&self, model: &MultidiffModel) -> Result<Vec<String>, RenderError> {
        model
            .diffs()
            .par_iter()
            .map(|diff| self.render(model, diff))
            .collect()
    }
}

/// Feed each opcode's slice of `data` into `encoder`.
fn replay<E: Encoder>(
    mut encoder: E,
    data: &[u8],
    diff: &Diff,
    side: Side,
) -> Result<String, RenderError> {
    for (n, op) in diff.opcodes.iter().enumerate() {
        let range = match side {
            Side::Source => op.source_range(),
            Side::Target => op.target_range(),
        };
        let start = range.start;
        encoder
            .append(&data[range], op.kind)
            .map_err(|source| RenderError::Decode {
                opcode: n,
                offset: start + source.valid_up_to,
                source,
            })?;
    }
    Ok(encoder.finish())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
