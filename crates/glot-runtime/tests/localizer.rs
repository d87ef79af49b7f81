//! End-to-end tests for the resolver lifecycle: init, load, resolve with
//! escapes, autocomplete, overrides, reload, and region fallback.

use std::cell::RefCell;
use std::rc::Rc;

use glot_runtime::{
    LocalizableContext, LocalizeError, Localizer, MissingKeyPolicy, ResolveSettings, StaticSource,
};

fn game_source() -> StaticSource {
    StaticSource::new("EN_US")
        .region(
            "EN_US",
            [
                ("ui.menu.start", "Start"),
                ("ui.menu.options", "Options"),
                ("ui.menu.quit", "Quit"),
                ("ui.hud.hp", "^{red}HP^{} {0}"),
                ("ui.hud.greeting", "Welcome back, #{player}!"),
                ("dialog.intro", "@{ui.menu.start} your journey, {0}."),
            ],
        )
        .region(
            "DE_DE",
            [
                ("ui.menu.start", "Anfang"),
                ("ui.menu.options", "Optionen"),
                ("ui.menu.quit", "Beenden"),
            ],
        )
}

struct Player(&'static str);

impl LocalizableContext for Player {
    fn localized_value(&self, name: &str) -> Option<String> {
        (name == "player").then(|| self.0.to_string())
    }
}

#[test]
fn full_resolution_flow() {
    let mut loc = Localizer::new();
    loc.init(Box::new(game_source()));
    loc.load("EN_US").expect("load EN_US");

    assert!(loc.is_ready());
    assert_eq!(loc.region(), Some("EN_US"));
    assert_eq!(loc.resolve("ui.menu.start"), "Start");
    assert!(loc.contains("ui.menu.quit"));
    assert!(!loc.contains("ui.menu.save"));

    // Key reference + parameter, forwarded through the expansion.
    assert_eq!(
        loc.resolve_with("dialog.intro", &["Ada"]),
        "Start your journey, Ada."
    );

    // Color tags were baked at load time; parameters still live.
    assert_eq!(
        loc.resolve_with("ui.hud.hp", &["42"]),
        "\u{1b}[31mHP\u{1b}[0m 42"
    );

    // Context escape.
    assert_eq!(
        loc.resolve_with_context("ui.hud.greeting", &[], &Player("Ada")),
        "Welcome back, Ada!"
    );
}

#[test]
fn autocomplete_over_key_hierarchy() {
    let mut loc = Localizer::new();
    loc.init(Box::new(game_source()));
    loc.load("EN_US").expect("load EN_US");

    // One level at a time.
    assert_eq!(loc.options_of("", true), vec!["ui", "dialog"]);
    assert_eq!(loc.options_of("ui", true), vec!["menu", "hud"]);

    // Full enumeration under a prefix.
    assert_eq!(
        loc.options_of("ui.menu", false),
        vec!["ui.menu.start", "ui.menu.options", "ui.menu.quit"]
    );

    // Unknown prefix: empty, not an error.
    assert!(loc.options_of("ui.nope", false).is_empty());
    assert!(loc.options_of("ui.nope", true).is_empty());
}

#[test]
fn switching_regions_swaps_table_and_trie_together() {
    let mut loc = Localizer::new();
    loc.init(Box::new(game_source()));
    loc.load("EN_US").expect("load EN_US");
    assert_eq!(loc.options_of("", false).len(), 6);

    loc.load("DE_DE").expect("load DE_DE");
    assert_eq!(loc.region(), Some("DE_DE"));
    assert_eq!(loc.resolve("ui.menu.start"), "Anfang");

    // The trie reflects the same load as the table: no stale EN_US keys.
    let keys = loc.options_of("", false);
    assert_eq!(
        keys,
        vec!["ui.menu.start", "ui.menu.options", "ui.menu.quit"]
    );
    for k in &keys {
        assert!(loc.contains(k), "{k} enumerated but not resolvable");
    }
}

#[test]
fn unavailable_region_falls_back_to_default() {
    let mut loc = Localizer::new();
    loc.init(Box::new(game_source()));
    loc.load("FR_FR").expect("default region covers the request");
    assert_eq!(loc.region(), Some("EN_US"));
    assert_eq!(loc.resolve("ui.menu.start"), "Start");
}

#[test]
fn no_region_at_all_is_fatal() {
    let mut loc = Localizer::new();
    loc.init(Box::new(StaticSource::new("EN_US")));
    assert_eq!(
        loc.load("FR_FR"),
        Err(LocalizeError::RegionUnavailable {
            requested: "FR_FR".to_string(),
            default: "EN_US".to_string(),
        })
    );
    assert!(!loc.is_ready());
}

#[test]
fn override_applies_until_reload() {
    let mut loc = Localizer::new();
    loc.init(Box::new(game_source()));
    loc.load("EN_US").expect("load EN_US");

    loc.set_override("ui.menu.start", "Begin");
    assert_eq!(loc.resolve("ui.menu.start"), "Begin");

    // New keys can be patched in too; color tags are baked on the way in.
    loc.set_override("ui.menu.cheat", "^{green}Cheat^{}");
    assert_eq!(
        loc.resolve("ui.menu.cheat"),
        "\u{1b}[32mCheat\u{1b}[0m"
    );

    // Reload reflects the authoritative source again.
    loc.reload().expect("reload");
    assert_eq!(loc.resolve("ui.menu.start"), "Start");
    assert_eq!(loc.resolve("ui.menu.cheat"), "ui.menu.cheat");
}

#[test]
fn loaded_observers_fire_per_load() {
    let mut loc = Localizer::new();
    loc.init(Box::new(game_source()));

    let loads: Rc<RefCell<Vec<String>>> = Rc::default();
    let sink = Rc::clone(&loads);
    loc.on_loaded(move |region| sink.borrow_mut().push(region.to_string()));

    loc.load("EN_US").expect("load EN_US");
    loc.load("DE_DE").expect("load DE_DE");
    loc.reload().expect("reload");
    assert_eq!(*loads.borrow(), vec!["EN_US", "DE_DE", "DE_DE"]);
}

#[test]
fn policy_from_source_settings() {
    let source = game_source().with_settings(ResolveSettings {
        policy: MissingKeyPolicy::ForceDisplay,
        disable_empty_entries: false,
    });
    let mut loc = Localizer::new();
    loc.init(Box::new(source));
    loc.load("EN_US").expect("load EN_US");

    assert_eq!(loc.resolve("ui.menu.saveGame"), "Save Game");
}

#[test]
fn available_regions_lists_source_regions() {
    let mut loc = Localizer::new();
    assert!(loc.available_regions().is_empty());

    loc.init(Box::new(game_source()));
    assert_eq!(loc.available_regions(), vec!["EN_US", "DE_DE"]);
}

#[test]
fn coverage_report_spans_regions() {
    let mut loc = Localizer::new();
    assert_eq!(loc.coverage_report(), Err(LocalizeError::NotInitialized));

    loc.init(Box::new(game_source()));
    let report = loc.coverage_report().expect("initialized");
    assert_eq!(report.total_keys, 6);

    let de = report
        .regions
        .iter()
        .find(|r| r.region == "DE_DE")
        .expect("DE_DE covered");
    assert_eq!(de.present, 3);
    assert_eq!(
        de.missing,
        vec!["dialog.intro", "ui.hud.greeting", "ui.hud.hp"]
    );
}
