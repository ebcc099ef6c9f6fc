//! Application state for the Pokedex viewer.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::api::thumbnail_url;
use crate::sprite::SpriteData;

pub const PAGE_SIZE: usize = 20;
pub const GRID_COLUMNS: usize = 5;
pub const MOVES_PREVIEW: usize = 15;
pub const DEFAULT_ROSTER_LIMIT: u32 = 1000;
pub const DEFAULT_LANGUAGE: &str = "es";

/// Number of pages for a roster of `len` entries. Never zero.
pub fn page_count(len: usize) -> usize {
    len.div_ceil(PAGE_SIZE).max(1)
}

/// Numeric id from the last path segment of a PokeAPI resource url.
pub fn id_from_url(url: &str) -> Option<u32> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
}

/// Entries whose lowercase name contains the lowercase query, in roster order.
pub fn filter_roster(roster: &[RosterEntry], query: &str) -> Vec<RosterEntry> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    roster
        .iter()
        .filter(|entry| entry.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RosterEntry {
    pub name: String,
    pub url: String,
}

impl RosterEntry {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    pub fn id(&self) -> Option<u32> {
        id_from_url(&self.url)
    }

    pub fn thumbnail_url(&self) -> Option<String> {
        self.id().map(thumbnail_url)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonStat {
    pub name: String,
    pub value: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonAbility {
    pub name: String,
    pub is_hidden: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ImageKind {
    OfficialArtwork,
    FrontDefault,
    BackDefault,
    FrontShiny,
    BackShiny,
}

impl ImageKind {
    pub fn label(self) -> &'static str {
        match self {
            ImageKind::OfficialArtwork => "Official artwork",
            ImageKind::FrontDefault => "Front",
            ImageKind::BackDefault => "Back",
            ImageKind::FrontShiny => "Front shiny",
            ImageKind::BackShiny => "Back shiny",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonImages {
    pub official_artwork: Option<String>,
    pub front_default: Option<String>,
    pub back_default: Option<String>,
    pub front_shiny: Option<String>,
    pub back_shiny: Option<String>,
}

impl PokemonImages {
    /// Present, non-empty image urls in carousel order.
    pub fn available(&self) -> Vec<(ImageKind, &str)> {
        [
            (ImageKind::OfficialArtwork, &self.official_artwork),
            (ImageKind::FrontDefault, &self.front_default),
            (ImageKind::BackDefault, &self.back_default),
            (ImageKind::FrontShiny, &self.front_shiny),
            (ImageKind::BackShiny, &self.back_shiny),
        ]
        .into_iter()
        .filter_map(|(kind, url)| {
            url.as_deref()
                .filter(|url| !url.is_empty())
                .map(|url| (kind, url))
        })
        .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonDetail {
    pub id: u32,
    pub name: String,
    /// Decimetres.
    pub height: u32,
    /// Hectograms.
    pub weight: u32,
    pub base_experience: Option<u32>,
    pub types: Vec<String>,
    pub stats: Vec<PokemonStat>,
    pub abilities: Vec<PokemonAbility>,
    pub moves: Vec<String>,
    pub images: PokemonImages,
    pub species_url: Option<String>,
}

impl PokemonDetail {
    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }

    /// Card artwork: the official artwork, else the default front sprite.
    pub fn card_image_url(&self) -> Option<&str> {
        [&self.images.official_artwork, &self.images.front_default]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|url| !url.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FlavorTextEntry {
    pub text: String,
    pub language: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonSpecies {
    pub name: String,
    pub flavor_text_entries: Vec<FlavorTextEntry>,
    pub capture_rate: Option<u8>,
    pub evolution_chain_url: Option<String>,
}

impl PokemonSpecies {
    /// First entry in `language`, else the first entry of any language, with
    /// control characters flattened to spaces.
    pub fn localized_flavor_text(&self, language: &str) -> Option<String> {
        let entry = self
            .flavor_text_entries
            .iter()
            .find(|entry| entry.language == language)
            .or_else(|| self.flavor_text_entries.first())?;
        Some(
            entry
                .text
                .chars()
                .map(|ch| if ch.is_control() { ' ' } else { ch })
                .collect(),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EvolutionChain {
    pub stages: Vec<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum DetailTab {
    #[default]
    Info,
    Stats,
    Moves,
}

impl DetailTab {
    pub const ALL: [DetailTab; 3] = [DetailTab::Info, DetailTab::Stats, DetailTab::Moves];

    pub fn title(self) -> &'static str {
        match self {
            DetailTab::Info => "Info",
            DetailTab::Stats => "Stats",
            DetailTab::Moves => "Moves",
        }
    }

    pub fn index(self) -> usize {
        match self {
            DetailTab::Info => 0,
            DetailTab::Stats => 1,
            DetailTab::Moves => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// The open detail modal. Owns its species and chain; dropping it discards both.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DetailViewer {
    pub pokemon: PokemonDetail,
    pub species: Option<PokemonSpecies>,
    pub evolution: Option<EvolutionChain>,
    pub supplementary_loading: bool,
    pub tab: DetailTab,
    pub image_index: usize,
}

impl DetailViewer {
    pub fn new(pokemon: PokemonDetail) -> Self {
        let supplementary_loading = pokemon.species_url.is_some();
        Self {
            pokemon,
            species: None,
            evolution: None,
            supplementary_loading,
            tab: DetailTab::Info,
            image_index: 0,
        }
    }

    pub fn image_count(&self) -> usize {
        self.pokemon.images.available().len()
    }

    /// Moves the carousel by `delta`, wrapping. Returns false when there is nothing to cycle.
    pub fn select_image(&mut self, delta: i32) -> bool {
        let count = self.image_count();
        if count == 0 {
            return false;
        }
        let current = (self.image_index % count) as i64;
        let next = (current + delta as i64).rem_euclid(count as i64) as usize;
        let changed = next != self.image_index;
        self.image_index = next;
        changed
    }

    pub fn select_tab(&mut self, tab: DetailTab) -> bool {
        if self.tab == tab {
            return false;
        }
        self.tab = tab;
        true
    }

    pub fn active_image(&self) -> Option<(ImageKind, String)> {
        self.pokemon
            .images
            .available()
            .get(self.image_index)
            .map(|(kind, url)| (*kind, url.to_string()))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
    pub results: Vec<RosterEntry>,
    pub selected: usize,
}

impl SearchState {
    pub fn selected_entry(&self) -> Option<&RosterEntry> {
        self.results.get(self.selected)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Settings {
    pub language: String,
    pub roster_limit: u32,
    pub show_images: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
            roster_limit: DEFAULT_ROSTER_LIMIT,
            show_images: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LoadedSprite {
    pub url: String,
    pub sprite: SpriteData,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    pub settings: Settings,

    pub roster: Vec<RosterEntry>,
    pub roster_loading: bool,

    pub page: usize,
    pub page_details: Vec<PokemonDetail>,
    pub page_loading: bool,
    /// Generation of the latest page request; older completions are dropped.
    pub page_request: u64,
    pub card_cursor: usize,
    /// Decoded card artwork for the current page, keyed by image url.
    pub card_sprites: BTreeMap<String, SpriteData>,

    pub search: SearchState,

    pub viewer: Option<DetailViewer>,
    pub selection_loading: bool,
    pub selection_request: u64,

    pub sprite: Option<LoadedSprite>,
    pub sprite_pending: Option<String>,

    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            roster: Vec::new(),
            roster_loading: false,
            page: 0,
            page_details: Vec::new(),
            page_loading: false,
            page_request: 0,
            card_cursor: 0,
            card_sprites: BTreeMap::new(),
            search: SearchState::default(),
            viewer: None,
            selection_loading: false,
            selection_request: 0,
            sprite: None,
            sprite_pending: None,
            tick: 0,
        }
    }

    pub fn page_count(&self) -> usize {
        page_count(self.roster.len())
    }

    /// Roster slice backing the current page.
    pub fn page_entries(&self) -> &[RosterEntry] {
        let start = (self.page * PAGE_SIZE).min(self.roster.len());
        let end = (start + PAGE_SIZE).min(self.roster.len());
        &self.roster[start..end]
    }

    pub fn can_go_prev(&self) -> bool {
        self.page > 0
    }

    pub fn can_go_next(&self) -> bool {
        self.page + 1 < self.page_count()
    }

    /// Accepts `page` only when it is in range and differs from the current one.
    pub fn set_page(&mut self, page: usize) -> bool {
        if page >= self.page_count() || page == self.page {
            return false;
        }
        self.page = page;
        self.card_cursor = 0;
        true
    }

    pub fn set_query(&mut self, query: String) {
        self.search.results = filter_roster(&self.roster, &query);
        self.search.query = query;
        self.search.selected = 0;
    }

    pub fn refresh_search(&mut self) {
        self.search.results = filter_roster(&self.roster, &self.search.query);
        if self.search.selected >= self.search.results.len() {
            self.search.selected = 0;
        }
    }

    pub fn cursor_detail(&self) -> Option<&PokemonDetail> {
        self.page_details.get(self.card_cursor)
    }

    /// Image the UI currently wants decoded, if any.
    pub fn wanted_sprite_url(&self) -> Option<String> {
        if !self.settings.show_images {
            return None;
        }
        if let Some(viewer) = &self.viewer {
            return viewer.active_image().map(|(_, url)| url);
        }
        if self.search.active {
            return self
                .search
                .selected_entry()
                .and_then(RosterEntry::thumbnail_url);
        }
        None
    }

    /// Card artwork urls of the current page that are not decoded yet.
    pub fn missing_card_images(&self) -> Vec<String> {
        if !self.settings.show_images {
            return Vec::new();
        }
        let mut urls: Vec<String> = Vec::new();
        for url in self.page_details.iter().filter_map(PokemonDetail::card_image_url) {
            if !self.card_sprites.contains_key(url) && !urls.iter().any(|u| u == url) {
                urls.push(url.to_string());
            }
        }
        urls
    }

    /// Decoded sprite for `url`, when it is the one in memory.
    pub fn sprite_for(&self, url: &str) -> Option<&SpriteData> {
        self.sprite
            .as_ref()
            .filter(|loaded| loaded.url == url)
            .map(|loaded| &loaded.sprite)
    }

    pub fn is_loading(&self) -> bool {
        self.roster_loading
            || self.page_loading
            || self.selection_loading
            || self
                .viewer
                .as_ref()
                .is_some_and(|viewer| viewer.supplementary_loading)
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Roster")
                .entry("total", ron_string(&self.roster.len()))
                .entry("loading", ron_string(&self.roster_loading)),
            DebugSection::new("Page")
                .entry("page", ron_string(&(self.page + 1)))
                .entry("page_count", ron_string(&self.page_count()))
                .entry("cards", ron_string(&self.page_details.len()))
                .entry("cursor", ron_string(&self.card_cursor))
                .entry("request", ron_string(&self.page_request))
                .entry("card_sprites", ron_string(&self.card_sprites.len()))
                .entry("loading", ron_string(&self.page_loading)),
            DebugSection::new("Search")
                .entry("active", ron_string(&self.search.active))
                .entry("query", ron_string(&self.search.query))
                .entry("results", ron_string(&self.search.results.len()))
                .entry("selected", ron_string(&self.search.selected)),
            DebugSection::new("Viewer")
                .entry(
                    "pokemon",
                    ron_string(&self.viewer.as_ref().map(|v| v.pokemon.name.clone())),
                )
                .entry("tab", ron_string(&self.viewer.as_ref().map(|v| v.tab)))
                .entry(
                    "image",
                    ron_string(&self.viewer.as_ref().map(|v| v.image_index)),
                )
                .entry(
                    "species_loaded",
                    ron_string(&self.viewer.as_ref().is_some_and(|v| v.species.is_some())),
                )
                .entry("request", ron_string(&self.selection_request))
                .entry("loading", ron_string(&self.selection_loading)),
            DebugSection::new("Sprite")
                .entry(
                    "loaded",
                    ron_string(&self.sprite.as_ref().map(|s| s.url.clone())),
                )
                .entry("pending", ron_string(&self.sprite_pending)),
        ]
    }
}
