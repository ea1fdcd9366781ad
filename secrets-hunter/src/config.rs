//! Layered rule-set compiler.
//!
//! Rule sources are TOML files: two built-in base files always load first,
//! then user overlays in caller order. Each file may add entries and remove
//! entries accumulated by *earlier* files; the merged result is compiled
//! into an immutable [`RuleSet`].

mod cache;
mod loader;
mod models;

pub use cache::RuleSetCache;
pub use loader::load_rule_set;
pub use models::{CompiledPattern, RuleSet, SecretPattern};
