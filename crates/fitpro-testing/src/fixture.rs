//! Contract fixture loader.
//!
//! Loads golden files from `contracts/` for contract assertion tests.

use std::path::{Path, PathBuf};

use serde_json::Value;

/// Load a JSON fixture file relative to the workspace root.
///
/// # Example
/// ```no_run
/// use fitpro_testing::fixture::Fixture;
/// let event = Fixture::load("contracts/webhook/payment_intent_succeeded.json");
/// ```
pub struct Fixture;

impl Fixture {
    /// Load and parse a fixture JSON file at `workspace_root/path`.
    ///
    /// Panics if the file is missing or invalid JSON.
    pub fn load(relative_path: &str) -> Value {
        let contents = Self::load_raw(relative_path);
        serde_json::from_str(&contents)
            .unwrap_or_else(|e| panic!("invalid JSON in fixture {relative_path}: {e}"))
    }

    /// Load a fixture verbatim. Webhook tests sign these exact bytes.
    ///
    /// Panics if the file is missing.
    pub fn load_raw(relative_path: &str) -> String {
        let full_path = workspace_root().join(relative_path);
        std::fs::read_to_string(&full_path)
            .unwrap_or_else(|e| panic!("fixture not found at {}: {e}", full_path.display()))
    }
}

/// Walk up from the crate under test to the directory holding `contracts/`.
fn workspace_root() -> PathBuf {
    let start = std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .or_else(|_| std::env::current_dir())
        .unwrap_or_else(|e| panic!("cannot determine working directory: {e}"));
    start
        .ancestors()
        .find(|a| a.join("contracts").is_dir())
        .map(Path::to_path_buf)
        .unwrap_or(start)
}
