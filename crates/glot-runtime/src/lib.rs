#![forbid(unsafe_code)]

//! Runtime localization resolver.
//!
//! # Role in glot
//! `glot-runtime` owns session state and policy: which region is active,
//! how misses degrade, when observers fire. It drives the pure data
//! structures from `glot-core` (lookup table, key trie, escape markup).
//!
//! # Primary responsibilities
//! - **Localizer**: init/load/reload lifecycle, exact resolution, escape
//!   expansion with bounded recursion, missing-key policy, overrides,
//!   autocomplete queries, loaded/missing observer registries.
//! - **Collaborator traits**: [`LanguageSource`] supplies regions and
//!   entry lists (plus resolver settings); [`LocalizableContext`] answers
//!   `#{name}` context escapes at the call site.
//! - **Coverage**: cross-region key coverage reporting for tooling.
//!
//! # Example
//!
//! ```
//! use glot_runtime::{Localizer, StaticSource};
//!
//! let source = StaticSource::new("EN_US").region(
//!     "EN_US",
//!     [("ui.menu.start", "Start"), ("ui.greet", "Hello {0}!")],
//! );
//!
//! let mut loc = Localizer::new();
//! loc.init(Box::new(source));
//! loc.load("EN_US").expect("default region must load");
//!
//! assert_eq!(loc.resolve("ui.menu.start"), "Start");
//! assert_eq!(loc.resolve_with("ui.greet", &["Ada"]), "Hello Ada!");
//! assert_eq!(loc.options_of("ui", true), vec!["menu", "greet"]);
//! ```

/// Cross-region key coverage reporting.
pub mod coverage;
/// The resolver state machine.
pub mod resolver;
/// Collaborator traits and the in-memory language source.
pub mod source;

pub use coverage::{CoverageReport, RegionCoverage};
pub use resolver::{
    LocalizeError, Localizer, MAX_EXPANSION_DEPTH, MissingKeyPolicy, ResolveSettings,
};
pub use source::{LanguageSource, LocalizableContext, StaticSource};
