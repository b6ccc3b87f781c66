//! Multidiff: byte-aligned, colorized diffs across sets of binary objects.
//!
//! The crate provides:
//! - Byte-sequence alignment into edit opcodes (`align`)
//! - An append-only object/diff model with sequence and baseline
//!   orchestration (`model`)
//! - Renderers producing hexdump, hex or UTF-8 output with ANSI or HTML
//!   highlighting (`render`)
//! - File-oriented helpers (`io`)
//! - An optional CLI (`cli` feature)
//!
//! # Quick Start
//!
//! ```
//! use multidiff::model::MultidiffModel;
//! use multidiff::render::Renderer;
//!
//! let mut model = MultidiffModel::new();
//! model.add(b"Hello, World!".to_vec(), "old");
//! model.add(b"Hello, Earth!".to_vec(), "new");
//! model.diff_sequence();
//!
//! let renderer = Renderer::from_names("hexdump", "html").unwrap();
//! let out = renderer.dump_all(&model).unwrap();
//! assert!(out.starts_with("000000: 48 65 6c 6c 6f 2c 20"));
//! assert!(out.contains("<span class='replace'>"));
//! ```

pub mod align;
pub mod io;
pub mod model;
pub mod render;

pub use align::{AlignOptions, OpKind, Opcode, align};
pub use model::{Diff, DiffObject, ModelError, MultidiffModel};
pub use render::{ConfigError, Encoding, Highlight, RenderError, RenderOptions, Renderer};

#[cfg(feature = "cli")]
pub mod cli;
