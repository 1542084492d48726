//! Fuzz target for exported layer-tree JSON.
//!
//! Parses arbitrary bytes and, when they form a document, walks it, so the
//! walker sees every tree shape the reader accepts.

#![no_main]

use adlens::psd::tree_json::from_tree_json_slice;
use adlens::psd::walk;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    if let Ok(document) = from_tree_json_slice(data) {
        let _ = walk(&document);
    }
});
