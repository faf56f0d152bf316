//! Developer tooling: animation inspector for the debug panel and CLI.
//!
//! # Invariants
//! - Tools only read animation state.

mod inspector;

pub use inspector::{AnimationInspector, AnimationSummary, Phase};

pub fn crate_info() -> &'static str {
    "prism-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
