//! Layered documents: parsing, the layer tree, and the tree walker.
//!
//! # Modules
//!
//! - [`node`]: the layer tree a parser produces
//! - [`parser`]: the [`PsdParser`] seam and its implementations
//! - [`binary`]: binary `.psd` reading via the `psd` crate
//! - [`tree_json`]: exported layer-tree JSON reading
//! - [`walker`]: explicit-stack traversal into output records
//! - [`classify`]: layer-name text conventions

pub mod binary;
pub mod classify;
pub mod node;
pub mod parser;
pub mod tree_json;
pub mod walker;

pub use classify::{classify_layer_name, NameBucket};
pub use node::{ColorSources, FontInfo, LayerKind, LayerNode, PsdDocument, TextPayload};
pub use parser::{AutoPsdParser, BinaryPsdParser, PsdParser, TreeJsonParser};
pub use walker::{walk, BucketedText, WalkOutput};

/// Tracing target for document parsing and walking.
pub const TRACING_TARGET: &str = "adlens::psd";
