//! Side effects declared by the reducer and executed as keyed tasks.

use crate::state::RosterEntry;

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadRoster { limit: u32 },
    /// Resolve detail records for one page, all-or-nothing
    LoadPageDetails {
        request: u64,
        entries: Vec<RosterEntry>,
    },
    LoadSelection { request: u64, name: String },
    /// Species and evolution chain for the open detail view
    LoadSupplementary { name: String, species_url: String },
    LoadSprite { url: String },
    /// Card artwork for the page generation `request`
    LoadCardSprite { request: u64, url: String },
}
