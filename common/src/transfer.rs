//! Constants for the card catalog cache shared between invocations of the tool.

use bincode::Options;

/// Conventional file ending for the catalog cache.
pub const CACHE_FILE_ENDING: &str = "bin";

/// Bincode settings for the catalog cache.
#[must_use]
pub fn bincode_options() -> impl bincode::Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .allow_trailing_bytes()
}
