//! Fuzz target for the text-to-binary pipeline.
//!
//! Any input must parse, encode to exactly the predicted size, and decode
//! back with the same tree count. Nothing may panic.
//!
//! Run with:
//! ```sh
//! cargo +nightly fuzz run fuzz_transcode
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

use hydrogen_tools::compat::lightgbm::parse;
use hydrogen_tools::io::native::{decode, encode, encoded_len};

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let model = parse(&text);

    let bytes = encode(&model);
    assert_eq!(bytes.len(), encoded_len(&model));

    let decoded = decode(&bytes).expect("encoder output decodes");
    assert_eq!(decoded.num_trees(), model.num_trees());

    // Raw input as a binary model must never panic either.
    let _ = decode(data);
});
