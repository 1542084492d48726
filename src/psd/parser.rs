//! Parsers that turn document bytes into a [`PsdDocument`].

use std::path::Path;

use super::binary::{from_psd_slice, is_psd_signature};
use super::node::PsdDocument;
use super::tree_json::from_tree_json_slice;
use crate::error::AdlensError;

/// Turns document bytes into a layer tree.
///
/// One parser is built at startup and shared by every extraction; `path` is
/// used for error reporting only.
pub trait PsdParser: Send + Sync {
    fn parse(&self, path: &Path, bytes: &[u8]) -> Result<PsdDocument, AdlensError>;
}

/// Reads binary Photoshop documents.
#[derive(Clone, Copy, Debug, Default)]
pub struct BinaryPsdParser;

impl PsdParser for BinaryPsdParser {
    fn parse(&self, path: &Path, bytes: &[u8]) -> Result<PsdDocument, AdlensError> {
        from_psd_slice(bytes).map_err(|message| AdlensError::parse(path, message))
    }
}

/// Reads exported layer-tree JSON.
#[derive(Clone, Copy, Debug, Default)]
pub struct TreeJsonParser;

impl PsdParser for TreeJsonParser {
    fn parse(&self, path: &Path, bytes: &[u8]) -> Result<PsdDocument, AdlensError> {
        from_tree_json_slice(bytes).map_err(|source| AdlensError::LayerTreeJsonParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Picks the binary reader for `8BPS` content and the tree reader otherwise.
#[derive(Clone, Copy, Debug, Default)]
pub struct AutoPsdParser;

impl PsdParser for AutoPsdParser {
    fn parse(&self, path: &Path, bytes: &[u8]) -> Result<PsdDocument, AdlensError> {
        if is_psd_signature(bytes) {
            BinaryPsdParser.parse(path, bytes)
        } else {
            TreeJsonParser.parse(path, bytes)
        }
    }
}
