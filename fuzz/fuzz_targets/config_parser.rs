//! Fuzz target for the `canopy.toml` parser.
//!
//! This target feeds arbitrary TOML strings to the config parser
//! to find crashes and panics.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_config_parser
//! ```

#![no_main]

use canopy_query::CanopyConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // The parser should never panic, only return errors
        if let Ok(config) = CanopyConfig::from_str(input) {
            // A config that loads must also produce services and a scope.
            let _ = config.services();
            let _ = config.scope.query_scope();
        }
    }
});
