//! Fuzz target for binary PSD reading.
//!
//! Inputs are forced to start with the `8BPS` signature so the fuzzer spends
//! its time inside the header and layer sections.

#![no_main]

use adlens::psd::binary::{from_psd_slice, PSD_SIGNATURE};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let mut bytes = PSD_SIGNATURE.to_vec();
    bytes.extend_from_slice(data);
    let _ = from_psd_slice(&bytes);
});
