//! The resolver state machine.
//!
//! [`Localizer`] orchestrates the dual index from `glot-core`: exact
//! lookup through the flat table, enumeration through the key trie, and
//! escape expansion over resolved values. Misses never fail the caller;
//! they degrade through the configured [`MissingKeyPolicy`].
//!
//! # Invariants
//!
//! 1. **Atomic region swap**: the lookup table and trie for a region are
//!    built fully aside and installed with a single assignment. A caller
//!    observes either the old pair or the new pair, never a mix.
//!
//! 2. **Bounded expansion**: recursive `@{key}` references carry an
//!    explicit depth counter capped at [`MAX_EXPANSION_DEPTH`]; past the
//!    bound the placeholder is emitted unexpanded.
//!
//! 3. **Identity degrade**: every resolve-family call on a resolver with
//!    no loaded region returns the input key unchanged.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | No source | `load` before `init` | `Err(NotInitialized)` |
//! | No region file | requested and default both unavailable | `Err(RegionUnavailable)` |
//! | Missing key | key not in the active table | policy fallback + once-per-key event |
//! | Placeholder failure | bad index, unknown name, depth bound | placeholder left literal |
//! | Observer panic | subscriber fault | caught, logged, others still run |

use std::cell::RefCell;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use rustc_hash::FxHashSet;

use glot_core::color::SGR_RESET;
use glot_core::key;
use glot_core::markup::{self, Token};
use glot_core::table::LookupTable;
use glot_core::trie::KeyTrie;

use crate::coverage::{self, CoverageReport};
use crate::source::{LanguageSource, LocalizableContext};

/// Upper bound on recursive `@{key}` expansion depth.
pub const MAX_EXPANSION_DEPTH: usize = 8;

/// How the resolver substitutes a key that cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingKeyPolicy {
    /// Return the key itself, unmodified.
    #[default]
    RawDisplay,
    /// Return an empty string.
    Empty,
    /// Return a title-cased rendering of the key's last segment.
    ForceDisplay,
}

/// Settings captured from the language source at `init` time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveSettings {
    /// Fallback behavior for unresolvable keys.
    pub policy: MissingKeyPolicy,
    /// Treat entries with an empty value as missing.
    pub disable_empty_entries: bool,
}

/// Errors from resolver lifecycle operations.
///
/// Per-key misses are never errors; they resolve through the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalizeError {
    /// `load` or `reload` was called before `init` supplied a source.
    NotInitialized,
    /// Neither the requested region nor the default region has a language
    /// file. This is an unrecoverable configuration fault.
    RegionUnavailable { requested: String, default: String },
}

impl fmt::Display for LocalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "localizer not initialized"),
            Self::RegionUnavailable { requested, default } => write!(
                f,
                "no language file for region '{requested}' or default '{default}'"
            ),
        }
    }
}

impl std::error::Error for LocalizeError {}

/// The table + trie pair for one loaded region. Always swapped as a unit.
struct ActiveRegion {
    region: String,
    table: LookupTable,
    trie: KeyTrie,
}

type Observer = Box<dyn Fn(&str)>;

/// Runtime localization resolver.
///
/// One explicit object per session, passed by reference to callers (no
/// process-wide state). Single-threaded cooperative model: all operations
/// run to completion on the caller's thread.
///
/// # Example
///
/// ```
/// use glot_runtime::{Localizer, StaticSource};
///
/// let source = StaticSource::new("EN_US")
///     .region("EN_US", [("ui.hello", "Hello {0}!")]);
///
/// let mut loc = Localizer::new();
/// loc.init(Box::new(source));
/// loc.load("EN_US")?;
///
/// assert_eq!(loc.resolve_with("ui.hello", &["world"]), "Hello world!");
/// assert_eq!(loc.resolve("ui.absent"), "ui.absent");
/// # Ok::<(), glot_runtime::LocalizeError>(())
/// ```
pub struct Localizer {
    source: Option<Box<dyn LanguageSource>>,
    settings: ResolveSettings,
    active: Option<ActiveRegion>,
    loaded_observers: Vec<Observer>,
    missing_observers: Vec<Observer>,
    /// Keys already diagnosed this session; cleared on load.
    warned: RefCell<FxHashSet<String>>,
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Localizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Localizer")
            .field("initialized", &self.source.is_some())
            .field("region", &self.region())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Localizer {
    /// Create an uninitialized resolver.
    #[must_use]
    pub fn new() -> Self {
        Self {
            source: None,
            settings: ResolveSettings::default(),
            active: None,
            loaded_observers: Vec::new(),
            missing_observers: Vec::new(),
            warned: RefCell::new(FxHashSet::default()),
        }
    }

    /// Store the language source and capture its resolver settings.
    pub fn init(&mut self, source: Box<dyn LanguageSource>) {
        self.settings = source.settings();
        self.source = Some(source);
    }

    /// Load a region, falling back to the source's default region when the
    /// requested one has no language file.
    ///
    /// Rebuilds the lookup table and trie wholesale, discarding any
    /// overrides, then notifies loaded-observers. Fails only on setup
    /// errors: no source, or neither region resolvable.
    pub fn load(&mut self, region: &str) -> Result<(), LocalizeError> {
        let source = self.source.as_deref().ok_or(LocalizeError::NotInitialized)?;
        let default = source.default_region();
        let (region, entries) = match source.entries(region) {
            Some(entries) => (region.to_string(), entries),
            None => {
                tracing::debug!(
                    requested = region,
                    default = %default,
                    "region unavailable, falling back to default"
                );
                match source.entries(&default) {
                    Some(entries) => (default.clone(), entries),
                    None => {
                        return Err(LocalizeError::RegionUnavailable {
                            requested: region.to_string(),
                            default,
                        });
                    }
                }
            }
        };

        // Color tags never depend on call-site parameters; bake them now.
        let baked: Vec<(String, String)> = entries
            .into_iter()
            .map(|(k, v)| (k, markup::bake_colors(&v)))
            .collect();

        // Build the replacement pair fully aside, then install it with a
        // single assignment so in-flight readers see old or new, never a
        // mix.
        let table = LookupTable::build(baked.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        let trie = KeyTrie::build(baked.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        let entry_count = table.len();
        self.active = Some(ActiveRegion {
            region: region.clone(),
            table,
            trie,
        });
        self.warned.borrow_mut().clear();

        tracing::info!(region = %region, entries = entry_count, "localization loaded");
        self.notify(&self.loaded_observers, &region, "localization-loaded");
        Ok(())
    }

    /// Reload the active region (or the default region when nothing was
    /// loaded yet), discarding overrides.
    pub fn reload(&mut self) -> Result<(), LocalizeError> {
        let region = match &self.active {
            Some(active) => active.region.clone(),
            None => self
                .source
                .as_deref()
                .ok_or(LocalizeError::NotInitialized)?
                .default_region(),
        };
        self.load(&region)
    }

    /// Resolve a key with no parameters and no call-site context.
    #[must_use]
    pub fn resolve(&self, k: &str) -> String {
        self.resolve_depth(k, &[], None, 0)
    }

    /// Resolve a key with positional parameters for `{N}` escapes.
    #[must_use]
    pub fn resolve_with(&self, k: &str, params: &[&str]) -> String {
        self.resolve_depth(k, params, None, 0)
    }

    /// Resolve a key with parameters and a context for `#{name}` escapes.
    #[must_use]
    pub fn resolve_with_context(
        &self,
        k: &str,
        params: &[&str],
        ctx: &dyn LocalizableContext,
    ) -> String {
        self.resolve_depth(k, params, Some(ctx), 0)
    }

    /// Whether the active table has an entry for `k`. `false` before load.
    #[must_use]
    pub fn contains(&self, k: &str) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| active.table.contains(k))
    }

    /// Patch a single entry in the live table. Color tags are baked like
    /// load-time values. Harmless no-op before load; lost on reload.
    pub fn set_override(&mut self, k: &str, value: &str) {
        let Some(active) = &mut self.active else {
            tracing::debug!(key = k, "override before load ignored");
            return;
        };
        active.table.insert(k, markup::bake_colors(value));
    }

    /// Keys (or, with `first_level_only`, next segments) under a partial
    /// key. Empty when no region is loaded or the prefix is unknown.
    #[must_use]
    pub fn options_of(&self, partial: &str, first_level_only: bool) -> Vec<String> {
        let Some(active) = &self.active else {
            return Vec::new();
        };
        let Some(sub) = active.trie.subtrie(partial) else {
            return Vec::new();
        };
        if first_level_only {
            sub.first_level()
        } else {
            sub.keys()
        }
    }

    /// Whether a region is loaded and resolution is live.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.active.is_some()
    }

    /// The active region id, if any.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.active.as_ref().map(|active| active.region.as_str())
    }

    /// Regions the source can provide. Empty before `init`.
    #[must_use]
    pub fn available_regions(&self) -> Vec<String> {
        self.source
            .as_deref()
            .map(|source| source.regions())
            .unwrap_or_default()
    }

    /// Settings captured at `init` time.
    #[must_use]
    pub fn settings(&self) -> ResolveSettings {
        self.settings
    }

    /// Register an observer for successful (re)loads. The payload is the
    /// region id that was loaded.
    pub fn on_loaded(&mut self, observer: impl Fn(&str) + 'static) {
        self.loaded_observers.push(Box::new(observer));
    }

    /// Register an observer for missing keys. Fires once per key per load
    /// session; the payload is the missing key.
    pub fn on_key_missing(&mut self, observer: impl Fn(&str) + 'static) {
        self.missing_observers.push(Box::new(observer));
    }

    /// Key coverage report across every region the source provides.
    pub fn coverage_report(&self) -> Result<CoverageReport, LocalizeError> {
        let source = self.source.as_deref().ok_or(LocalizeError::NotInitialized)?;
        Ok(coverage::coverage_report(source))
    }

    fn resolve_depth(
        &self,
        k: &str,
        params: &[&str],
        ctx: Option<&dyn LocalizableContext>,
        depth: usize,
    ) -> String {
        let Some(active) = &self.active else {
            tracing::debug!(key = k, "resolve before load, returning key unchanged");
            return k.to_string();
        };
        match self.usable_value(active, k) {
            Some(value) => self.expand(value, params, ctx, depth),
            None => {
                self.note_missing(k);
                self.fallback(k)
            }
        }
    }

    /// Entry value for `k`, treating empty values as missing when the
    /// settings say so.
    fn usable_value<'a>(&self, active: &'a ActiveRegion, k: &str) -> Option<&'a str> {
        let value = active.table.get(k)?;
        if value.is_empty() && self.settings.disable_empty_entries {
            return None;
        }
        Some(value)
    }

    fn fallback(&self, k: &str) -> String {
        match self.settings.policy {
            MissingKeyPolicy::RawDisplay => k.to_string(),
            MissingKeyPolicy::Empty => String::new(),
            MissingKeyPolicy::ForceDisplay => key::display_name(k),
        }
    }

    /// Materialize escapes in a resolved value. Placeholder failures of
    /// every class re-emit the placeholder literally.
    fn expand(
        &self,
        template: &str,
        params: &[&str],
        ctx: Option<&dyn LocalizableContext>,
        depth: usize,
    ) -> String {
        let mut out = String::with_capacity(template.len());
        for token in markup::tokenize(template) {
            match token {
                Token::Text(text) => out.push_str(&text),
                Token::Param(index) => match params.get(index) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&format!("{{{index}}}")),
                },
                Token::KeyRef(target) => match self.expand_key_ref(target, params, ctx, depth) {
                    Some(value) => out.push_str(&value),
                    None => out.push_str(&format!("@{{{target}}}")),
                },
                Token::Context(name) => match ctx.and_then(|c| c.localized_value(name)) {
                    Some(value) => out.push_str(&value),
                    None => out.push_str(&format!("#{{{name}}}")),
                },
                Token::ColorOpen(color) => out.push_str(&color.sgr()),
                Token::ColorReset => out.push_str(SGR_RESET),
            }
        }
        out
    }

    /// Expand an `@{key}` reference, forwarding the caller's parameter
    /// list. `None` (emit literally) on depth bound or unresolvable key.
    fn expand_key_ref(
        &self,
        target: &str,
        params: &[&str],
        ctx: Option<&dyn LocalizableContext>,
        depth: usize,
    ) -> Option<String> {
        if depth >= MAX_EXPANSION_DEPTH {
            tracing::warn!(
                key = target,
                bound = MAX_EXPANSION_DEPTH,
                "expansion depth bound hit, leaving key reference unexpanded"
            );
            return None;
        }
        let active = self.active.as_ref()?;
        let Some(value) = self.usable_value(active, target) else {
            self.note_missing(target);
            return None;
        };
        Some(self.expand(value, params, ctx, depth + 1))
    }

    /// Once-per-key-per-session miss diagnostic plus observer event.
    fn note_missing(&self, k: &str) {
        let first = self.warned.borrow_mut().insert(k.to_string());
        if !first {
            return;
        }
        tracing::warn!(key = k, "missing localization key");
        self.notify(&self.missing_observers, k, "key-missing");
    }

    /// Invoke observers one by one behind a panic boundary. A panicking
    /// observer is logged and must not stop the rest.
    fn notify(&self, observers: &[Observer], payload: &str, what: &str) {
        for observer in observers {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| observer(payload))) {
                tracing::error!(
                    event = what,
                    payload,
                    panic = panic_message(&panic),
                    "observer panicked"
                );
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
