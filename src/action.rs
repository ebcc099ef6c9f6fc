//! Every user intent and async completion in the Pokedex.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::sprite::SpriteData;
use crate::state::{DetailTab, EvolutionChain, PokemonDetail, PokemonSpecies, RosterEntry};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    /// Startup: fetch the roster
    Init,

    // ===== Roster =====
    RosterDidLoad(Vec<RosterEntry>),
    RosterDidError(String),

    // ===== Page =====
    PageNext,
    PagePrev,
    /// Jump to a zero-based page; rejected when out of range or current
    PageSet(usize),
    PageDetailsDidLoad {
        request: u64,
        details: Vec<PokemonDetail>,
    },
    PageDetailsDidError {
        request: u64,
        error: String,
    },

    // ===== Card grid =====
    /// Move the highlighted card by a signed offset in grid cells
    CardMove(i16),
    /// Open the highlighted card in the detail view
    CardOpen,

    // ===== Search =====
    SearchOpen,
    SearchClose,
    SearchQueryChange(String),
    SearchSelect(usize),
    /// Open the highlighted suggestion, or the typed text when nothing matches
    SearchSubmit,

    // ===== Selection =====
    SelectByName(String),
    SelectionDidLoad {
        request: u64,
        detail: PokemonDetail,
    },
    SelectionDidError {
        request: u64,
        name: String,
        error: String,
    },
    SupplementaryDidLoad {
        name: String,
        species: PokemonSpecies,
        evolution: Option<EvolutionChain>,
    },
    SupplementaryDidError {
        name: String,
        error: String,
    },

    // ===== Detail view =====
    DetailClose,
    DetailTabNext,
    DetailTabPrev,
    DetailTabSet(DetailTab),
    DetailImageNext,
    DetailImagePrev,

    // ===== Sprites =====
    SpriteDidLoad { url: String, sprite: SpriteData },
    SpriteDidError { url: String, error: String },
    CardSpriteDidLoad {
        request: u64,
        url: String,
        sprite: SpriteData,
    },
    CardSpriteDidError {
        request: u64,
        url: String,
        error: String,
    },

    /// Redraw without a state change (cursor movement in inputs)
    Render,
    Tick,
    Quit,
}
