//! Reducer: every state transition of the Pokedex.
//!
//! Failures are logged and cleared. Async completions carry the generation
//! number of the request that produced them, and anything older than the
//! latest request is dropped.

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, DetailViewer, LoadedSprite, GRID_COLUMNS};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.roster_loading = true;
            DispatchResult::changed_with(Effect::LoadRoster {
                limit: state.settings.roster_limit,
            })
        }

        // ===== Roster =====
        Action::RosterDidLoad(entries) => {
            tracing::info!(count = entries.len(), "roster loaded");
            state.roster = entries;
            state.roster_loading = false;
            state.page = 0;
            state.card_cursor = 0;
            state.refresh_search();
            let mut effects: Vec<Effect> = resolve_page_details(state).into_iter().collect();
            effects.extend(sprite_follow_up(state));
            changed_with(effects)
        }

        Action::RosterDidError(error) => {
            tracing::error!(%error, "roster fetch failed");
            state.roster.clear();
            state.roster_loading = false;
            state.page = 0;
            state.page_details.clear();
            state.card_sprites.clear();
            state.refresh_search();
            DispatchResult::changed()
        }

        // ===== Pagination =====
        Action::PageNext => {
            let next = state.page.saturating_add(1);
            change_page(state, next)
        }
        Action::PagePrev => match state.page.checked_sub(1) {
            Some(page) => change_page(state, page),
            None => DispatchResult::unchanged(),
        },
        Action::PageSet(page) => change_page(state, page),

        Action::PageDetailsDidLoad { request, details } => {
            if request != state.page_request {
                tracing::debug!(request, latest = state.page_request, "stale page dropped");
                return DispatchResult::unchanged();
            }
            state.page_details = details;
            state.page_loading = false;
            clamp_card_cursor(state);
            changed_with(card_sprite_requests(state))
        }

        Action::PageDetailsDidError { request, error } => {
            if request != state.page_request {
                tracing::debug!(request, latest = state.page_request, "stale page error dropped");
                return DispatchResult::unchanged();
            }
            tracing::warn!(%error, page = state.page, "page details failed");
            state.page_loading = false;
            DispatchResult::changed()
        }

        // ===== Card grid =====
        Action::CardMove(delta) => {
            let count = state.page_details.len();
            if count == 0 {
                return DispatchResult::unchanged();
            }
            let target = (state.card_cursor as i64 + delta as i64).clamp(0, count as i64 - 1);
            let target = target as usize;
            if target == state.card_cursor {
                DispatchResult::unchanged()
            } else {
                state.card_cursor = target;
                DispatchResult::changed()
            }
        }

        Action::CardOpen => match state.cursor_detail().map(|detail| detail.name.clone()) {
            Some(name) => select_by_name(state, &name),
            None => DispatchResult::unchanged(),
        },

        // ===== Search =====
        Action::SearchOpen => {
            if state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = true;
            state.set_query(String::new());
            changed_with(sprite_follow_up(state).into_iter().collect())
        }

        Action::SearchClose => {
            close_search(state);
            changed_with(sprite_follow_up(state).into_iter().collect())
        }

        Action::SearchQueryChange(query) => {
            state.set_query(query);
            changed_with(sprite_follow_up(state).into_iter().collect())
        }

        Action::SearchSelect(index) => {
            if index < state.search.results.len() && index != state.search.selected {
                state.search.selected = index;
                changed_with(sprite_follow_up(state).into_iter().collect())
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::SearchSubmit => {
            let name = state
                .search
                .selected_entry()
                .map(|entry| entry.name.clone())
                .unwrap_or_else(|| state.search.query.clone());
            close_search(state);
            let mut result = select_by_name(state, &name);
            result.changed = true;
            result.effects.extend(sprite_follow_up(state));
            result
        }

        // ===== Selection =====
        Action::SelectByName(name) => select_by_name(state, &name),

        Action::SelectionDidLoad { request, detail } => {
            if request != state.selection_request {
                tracing::debug!(request, latest = state.selection_request, "stale selection dropped");
                return DispatchResult::unchanged();
            }
            state.selection_loading = false;
            let mut effects = Vec::new();
            if let Some(species_url) = detail.species_url.clone() {
                effects.push(Effect::LoadSupplementary {
                    name: detail.name.clone(),
                    species_url,
                });
            }
            state.viewer = Some(DetailViewer::new(detail));
            effects.extend(sprite_follow_up(state));
            changed_with(effects)
        }

        Action::SelectionDidError {
            request,
            name,
            error,
        } => {
            if request != state.selection_request {
                tracing::debug!(request, latest = state.selection_request, "stale selection error dropped");
                return DispatchResult::unchanged();
            }
            tracing::warn!(%name, %error, "selection failed");
            state.selection_loading = false;
            state.viewer = None;
            changed_with(sprite_follow_up(state).into_iter().collect())
        }

        Action::SupplementaryDidLoad {
            name,
            species,
            evolution,
        } => match state.viewer.as_mut() {
            Some(viewer) if viewer.pokemon.name == name => {
                viewer.species = Some(species);
                viewer.evolution = evolution;
                viewer.supplementary_loading = false;
                DispatchResult::changed()
            }
            _ => {
                tracing::debug!(%name, "species for closed viewer dropped");
                DispatchResult::unchanged()
            }
        },

        Action::SupplementaryDidError { name, error } => match state.viewer.as_mut() {
            Some(viewer) if viewer.pokemon.name == name => {
                tracing::warn!(%name, %error, "species fetch failed");
                viewer.supplementary_loading = false;
                DispatchResult::changed()
            }
            _ => DispatchResult::unchanged(),
        },

        // ===== Detail view =====
        Action::DetailClose => {
            if state.viewer.take().is_none() {
                return DispatchResult::unchanged();
            }
            changed_with(sprite_follow_up(state).into_iter().collect())
        }

        Action::DetailTabNext => update_viewer(state, |viewer| {
            let next = viewer.tab.next();
            viewer.select_tab(next)
        }),
        Action::DetailTabPrev => update_viewer(state, |viewer| {
            let prev = viewer.tab.prev();
            viewer.select_tab(prev)
        }),
        Action::DetailTabSet(tab) => update_viewer(state, |viewer| viewer.select_tab(tab)),

        Action::DetailImageNext => {
            let result = update_viewer(state, |viewer| viewer.select_image(1));
            with_sprite_follow_up(state, result)
        }
        Action::DetailImagePrev => {
            let result = update_viewer(state, |viewer| viewer.select_image(-1));
            with_sprite_follow_up(state, result)
        }

        // ===== Sprites =====
        Action::SpriteDidLoad { url, sprite } => {
            if state.sprite_pending.as_deref() != Some(url.as_str()) {
                return DispatchResult::unchanged();
            }
            state.sprite_pending = None;
            state.sprite = Some(LoadedSprite { url, sprite });
            DispatchResult::changed()
        }

        Action::SpriteDidError { url, error } => {
            tracing::warn!(%url, %error, "sprite failed");
            if state.sprite_pending.as_deref() == Some(url.as_str()) {
                state.sprite_pending = None;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::CardSpriteDidLoad {
            request,
            url,
            sprite,
        } => {
            if request != state.page_request {
                tracing::debug!(%url, request, latest = state.page_request, "stale card sprite dropped");
                return DispatchResult::unchanged();
            }
            state.card_sprites.insert(url, sprite);
            DispatchResult::changed()
        }

        Action::CardSpriteDidError {
            request,
            url,
            error,
        } => {
            if request == state.page_request {
                tracing::warn!(%url, %error, "card sprite failed");
            }
            DispatchResult::unchanged()
        }

        Action::Render => DispatchResult::changed(),

        Action::Tick => {
            if state.is_loading() {
                state.tick = state.tick.wrapping_add(1);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn changed_with(effects: Vec<Effect>) -> DispatchResult<Effect> {
    if effects.is_empty() {
        DispatchResult::changed()
    } else {
        DispatchResult::changed_with_many(effects)
    }
}

fn change_page(state: &mut AppState, page: usize) -> DispatchResult<Effect> {
    if !state.set_page(page) {
        return DispatchResult::unchanged();
    }
    changed_with(resolve_page_details(state).into_iter().collect())
}

/// Starts a new page request for the current slice, superseding any in flight.
fn resolve_page_details(state: &mut AppState) -> Option<Effect> {
    let entries = state.page_entries().to_vec();
    state.page_request += 1;
    state.card_sprites.clear();
    if entries.is_empty() {
        state.page_details.clear();
        state.page_loading = false;
        return None;
    }
    state.page_loading = true;
    Some(Effect::LoadPageDetails {
        request: state.page_request,
        entries,
    })
}

/// One artwork request per card image not decoded yet, tagged with the page generation.
fn card_sprite_requests(state: &AppState) -> Vec<Effect> {
    state
        .missing_card_images()
        .into_iter()
        .map(|url| Effect::LoadCardSprite {
            request: state.page_request,
            url,
        })
        .collect()
}

fn clamp_card_cursor(state: &mut AppState) {
    let last = state.page_details.len().saturating_sub(1);
    state.card_cursor = state.card_cursor.min(last);
}

fn close_search(state: &mut AppState) {
    state.search.active = false;
    state.set_query(String::new());
}

fn select_by_name(state: &mut AppState, name: &str) -> DispatchResult<Effect> {
    let name = name.trim().to_lowercase();
    if name.is_empty() {
        return DispatchResult::unchanged();
    }
    state.selection_request += 1;
    state.selection_loading = true;
    DispatchResult::changed_with(Effect::LoadSelection {
        request: state.selection_request,
        name,
    })
}

fn update_viewer(
    state: &mut AppState,
    update: impl FnOnce(&mut DetailViewer) -> bool,
) -> DispatchResult<Effect> {
    match state.viewer.as_mut() {
        Some(viewer) => {
            if update(viewer) {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }
        _ => DispatchResult::unchanged(),
    }
}

fn with_sprite_follow_up(
    state: &mut AppState,
    mut result: DispatchResult<Effect>,
) -> DispatchResult<Effect> {
    if result.changed {
        result.effects.extend(sprite_follow_up(state));
    }
    result
}

/// Requests the sprite the UI now wants, unless it is loaded or already in flight.
fn sprite_follow_up(state: &mut AppState) -> Option<Effect> {
    let Some(url) = state.wanted_sprite_url() else {
        state.sprite_pending = None;
        return None;
    };
    if state.sprite_for(&url).is_some() {
        state.sprite_pending = None;
        return None;
    }
    if state.sprite_pending.as_deref() == Some(url.as_str()) {
        return None;
    }
    state.sprite_pending = Some(url.clone());
    Some(Effect::LoadSprite { url })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{DetailTab, PokemonDetail, PokemonImages, RosterEntry, PAGE_SIZE};
    use pretty_assertions::assert_eq;

    fn roster(len: usize) -> Vec<RosterEntry> {
        (1..=len)
            .map(|id| {
                RosterEntry::new(
                    format!("mon-{id}"),
                    format!("https://pokeapi.co/api/v2/pokemon/{id}/"),
                )
            })
            .collect()
    }

    fn detail(name: &str) -> PokemonDetail {
        PokemonDetail {
            id: 1,
            name: name.into(),
            height: 7,
            weight: 69,
            base_experience: Some(64),
            types: vec!["grass".into(), "poison".into()],
            stats: Vec::new(),
            abilities: Vec::new(),
            moves: Vec::new(),
            images: PokemonImages {
                official_artwork: Some(format!("https://img/{name}/art.png")),
                front_default: Some(format!("https://img/{name}/front.png")),
                ..PokemonImages::default()
            },
            species_url: Some(format!("https://pokeapi.co/api/v2/pokemon-species/{name}/")),
        }
    }

    fn text_only() -> AppState {
        let mut state = AppState::default();
        state.settings.show_images = false;
        state
    }

    #[test]
    fn init_requests_roster_with_limit() {
        let mut state = AppState::default();
        state.settings.roster_limit = 151;
        let result = reducer(&mut state, Action::Init);
        assert!(result.changed);
        assert!(state.roster_loading);
        assert_eq!(result.effects, vec![Effect::LoadRoster { limit: 151 }]);
    }

    #[test]
    fn roster_load_resolves_first_page() {
        let mut state = text_only();
        state.roster_loading = true;
        let result = reducer(&mut state, Action::RosterDidLoad(roster(45)));
        assert!(!state.roster_loading);
        assert!(state.page_loading);
        assert_eq!(result.effects.len(), 1);
        match &result.effects[0] {
            Effect::LoadPageDetails { request, entries } => {
                assert_eq!(*request, state.page_request);
                assert_eq!(entries.len(), PAGE_SIZE);
                assert_eq!(entries[0].name, "mon-1");
            }
            other => panic!("unexpected effect {other:?}"),
        }
    }

    #[test]
    fn roster_error_leaves_empty_roster() {
        let mut state = text_only();
        state.roster_loading = true;
        let result = reducer(&mut state, Action::RosterDidError("offline".into()));
        assert!(result.changed);
        assert!(result.effects.is_empty());
        assert!(state.roster.is_empty());
        assert!(!state.roster_loading);
        assert_eq!(state.page_count(), 1);
    }

    #[test]
    fn page_navigation_respects_bounds() {
        let mut state = text_only();
        state.roster = roster(45);

        assert!(!reducer(&mut state, Action::PagePrev).changed);
        assert!(!reducer(&mut state, Action::PageSet(0)).changed);
        assert!(!reducer(&mut state, Action::PageSet(3)).changed);

        let result = reducer(&mut state, Action::PageSet(2));
        assert!(result.changed);
        assert_eq!(state.page, 2);
        match &result.effects[0] {
            Effect::LoadPageDetails { entries, .. } => {
                let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
                assert_eq!(names, vec!["mon-41", "mon-42", "mon-43", "mon-44", "mon-45"]);
            }
            other => panic!("unexpected effect {other:?}"),
        }

        assert!(!reducer(&mut state, Action::PageNext).changed);
        assert!(reducer(&mut state, Action::PagePrev).changed);
        assert_eq!(state.page, 1);
    }

    #[test]
    fn stale_page_results_are_ignored() {
        let mut state = text_only();
        state.roster = roster(45);
        reducer(&mut state, Action::PageSet(1));
        let first = state.page_request;
        reducer(&mut state, Action::PageSet(2));
        let second = state.page_request;
        assert!(second > first);

        let stale = reducer(
            &mut state,
            Action::PageDetailsDidLoad {
                request: first,
                details: vec![detail("stale")],
            },
        );
        assert!(!stale.changed);
        assert!(state.page_details.is_empty());
        assert!(state.page_loading);

        reducer(
            &mut state,
            Action::PageDetailsDidLoad {
                request: second,
                details: vec![detail("fresh")],
            },
        );
        assert_eq!(state.page_details[0].name, "fresh");
        assert!(!state.page_loading);
    }

    #[test]
    fn page_error_keeps_previous_cards() {
        let mut state = text_only();
        state.roster = roster(45);
        state.page_details = vec![detail("old")];
        reducer(&mut state, Action::PageNext);
        let request = state.page_request;
        let result = reducer(
            &mut state,
            Action::PageDetailsDidError {
                request,
                error: "boom".into(),
            },
        );
        assert!(result.changed);
        assert!(!state.page_loading);
        assert_eq!(state.page_details[0].name, "old");
    }

    #[test]
    fn card_cursor_clamps_to_page() {
        let mut state = text_only();
        state.page_details = (0..7).map(|i| detail(&format!("m{i}"))).collect();
        assert!(!reducer(&mut state, Action::CardMove(-1)).changed);
        reducer(&mut state, Action::CardMove(GRID_COLUMNS as i16));
        assert_eq!(state.card_cursor, 5);
        reducer(&mut state, Action::CardMove(GRID_COLUMNS as i16));
        assert_eq!(state.card_cursor, 6);

        let result = reducer(&mut state, Action::CardOpen);
        assert_eq!(
            result.effects,
            vec![Effect::LoadSelection {
                request: state.selection_request,
                name: "m6".into(),
            }]
        );
    }

    #[test]
    fn search_filters_roster_and_submit_selects_highlight() {
        let mut state = text_only();
        state.roster = vec![
            RosterEntry::new("pikachu", "https://pokeapi.co/api/v2/pokemon/25/"),
            RosterEntry::new("raichu", "https://pokeapi.co/api/v2/pokemon/26/"),
        ];
        reducer(&mut state, Action::SearchOpen);
        reducer(&mut state, Action::SearchQueryChange("pika".into()));
        let names: Vec<_> = state.search.results.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["pikachu"]);

        let result = reducer(&mut state, Action::SearchSubmit);
        assert!(!state.search.active);
        assert!(state.search.query.is_empty());
        assert!(state.search.results.is_empty());
        assert_eq!(
            result.effects,
            vec![Effect::LoadSelection {
                request: 1,
                name: "pikachu".into(),
            }]
        );
    }

    #[test]
    fn search_submit_without_match_uses_typed_text() {
        let mut state = text_only();
        reducer(&mut state, Action::SearchOpen);
        reducer(&mut state, Action::SearchQueryChange(" MissingNo ".into()));
        let result = reducer(&mut state, Action::SearchSubmit);
        assert_eq!(
            result.effects,
            vec![Effect::LoadSelection {
                request: 1,
                name: "missingno".into(),
            }]
        );
    }

    #[test]
    fn empty_name_is_ignored() {
        let mut state = text_only();
        let result = reducer(&mut state, Action::SelectByName("   ".into()));
        assert!(!result.changed);
        assert_eq!(state.selection_request, 0);
    }

    #[test]
    fn failed_selection_clears_viewer() {
        let mut state = text_only();
        state.viewer = Some(DetailViewer::new(detail("bulbasaur")));
        reducer(&mut state, Action::SelectByName("notapokemon".into()));
        let request = state.selection_request;
        let result = reducer(
            &mut state,
            Action::SelectionDidError {
                request,
                name: "notapokemon".into(),
                error: "not found".into(),
            },
        );
        assert!(result.changed);
        assert!(state.viewer.is_none());
        assert!(!state.selection_loading);
    }

    #[test]
    fn selection_opens_viewer_and_loads_species() {
        let mut state = text_only();
        reducer(&mut state, Action::SelectByName("Bulbasaur".into()));
        let request = state.selection_request;
        let result = reducer(
            &mut state,
            Action::SelectionDidLoad {
                request,
                detail: detail("bulbasaur"),
            },
        );
        let viewer = state.viewer.as_ref().expect("viewer");
        assert_eq!(viewer.pokemon.name, "bulbasaur");
        assert!(viewer.supplementary_loading);
        assert_eq!(
            result.effects,
            vec![Effect::LoadSupplementary {
                name: "bulbasaur".into(),
                species_url: "https://pokeapi.co/api/v2/pokemon-species/bulbasaur/".into(),
            }]
        );
    }

    #[test]
    fn stale_selection_is_ignored() {
        let mut state = text_only();
        reducer(&mut state, Action::SelectByName("bulbasaur".into()));
        let first = state.selection_request;
        reducer(&mut state, Action::SelectByName("ivysaur".into()));
        let result = reducer(
            &mut state,
            Action::SelectionDidLoad {
                request: first,
                detail: detail("bulbasaur"),
            },
        );
        assert!(!result.changed);
        assert!(state.viewer.is_none());
        assert!(state.selection_loading);
    }

    #[test]
    fn supplementary_only_applies_to_matching_viewer() {
        let mut state = text_only();
        state.viewer = Some(DetailViewer::new(detail("ivysaur")));
        let species = crate::state::PokemonSpecies {
            name: "bulbasaur".into(),
            flavor_text_entries: Vec::new(),
            capture_rate: Some(45),
            evolution_chain_url: None,
        };
        let result = reducer(
            &mut state,
            Action::SupplementaryDidLoad {
                name: "bulbasaur".into(),
                species: species.clone(),
                evolution: None,
            },
        );
        assert!(!result.changed);
        assert!(state.viewer.as_ref().unwrap().species.is_none());

        let result = reducer(
            &mut state,
            Action::SupplementaryDidError {
                name: "ivysaur".into(),
                error: "timeout".into(),
            },
        );
        assert!(result.changed);
        let viewer = state.viewer.as_ref().unwrap();
        assert!(viewer.species.is_none());
        assert!(!viewer.supplementary_loading);
    }

    #[test]
    fn detail_tabs_and_images_cycle() {
        let mut state = text_only();
        state.viewer = Some(DetailViewer::new(detail("bulbasaur")));
        reducer(&mut state, Action::DetailTabPrev);
        assert_eq!(state.viewer.as_ref().unwrap().tab, DetailTab::Moves);
        reducer(&mut state, Action::DetailTabSet(DetailTab::Stats));
        assert_eq!(state.viewer.as_ref().unwrap().tab, DetailTab::Stats);

        reducer(&mut state, Action::DetailImageNext);
        assert_eq!(state.viewer.as_ref().unwrap().image_index, 1);
        reducer(&mut state, Action::DetailImageNext);
        assert_eq!(state.viewer.as_ref().unwrap().image_index, 0);

        assert!(reducer(&mut state, Action::DetailClose).changed);
        assert!(state.viewer.is_none());
        assert!(!reducer(&mut state, Action::DetailClose).changed);
    }

    #[test]
    fn sprite_requests_follow_active_image() {
        let mut state = AppState::default();
        reducer(&mut state, Action::SelectByName("bulbasaur".into()));
        let request = state.selection_request;
        let result = reducer(
            &mut state,
            Action::SelectionDidLoad {
                request,
                detail: detail("bulbasaur"),
            },
        );
        assert!(result.effects.contains(&Effect::LoadSprite {
            url: "https://img/bulbasaur/art.png".into(),
        }));

        let result = reducer(&mut state, Action::DetailImageNext);
        assert_eq!(
            result.effects,
            vec![Effect::LoadSprite {
                url: "https://img/bulbasaur/front.png".into(),
            }]
        );

        let stale = reducer(
            &mut state,
            Action::SpriteDidLoad {
                url: "https://img/bulbasaur/art.png".into(),
                sprite: blank_sprite(),
            },
        );
        assert!(!stale.changed);
        assert!(state.sprite.is_none());
    }

    fn blank_sprite() -> crate::sprite::SpriteData {
        crate::sprite::SpriteData {
            payload: String::new(),
            width: 1,
            height: 1,
        }
    }

    #[test]
    fn page_load_requests_card_sprites() {
        let mut state = AppState::default();
        state.roster = roster(45);
        reducer(&mut state, Action::PageNext);
        let request = state.page_request;

        let result = reducer(
            &mut state,
            Action::PageDetailsDidLoad {
                request,
                details: vec![detail("bulbasaur"), detail("ivysaur")],
            },
        );

        assert_eq!(
            result.effects,
            vec![
                Effect::LoadCardSprite {
                    request,
                    url: "https://img/bulbasaur/art.png".into(),
                },
                Effect::LoadCardSprite {
                    request,
                    url: "https://img/ivysaur/art.png".into(),
                },
            ]
        );
    }

    #[test]
    fn no_images_skips_card_sprites() {
        let mut state = text_only();
        state.roster = roster(45);
        reducer(&mut state, Action::PageNext);
        let request = state.page_request;

        let result = reducer(
            &mut state,
            Action::PageDetailsDidLoad {
                request,
                details: vec![detail("bulbasaur")],
            },
        );

        assert!(result.changed);
        assert!(result.effects.is_empty());
    }

    #[test]
    fn card_sprites_belong_to_their_page() {
        let mut state = AppState::default();
        state.roster = roster(45);
        reducer(&mut state, Action::PageNext);
        let first = state.page_request;
        reducer(
            &mut state,
            Action::PageDetailsDidLoad {
                request: first,
                details: vec![detail("bulbasaur")],
            },
        );

        let loaded = reducer(
            &mut state,
            Action::CardSpriteDidLoad {
                request: first,
                url: "https://img/bulbasaur/art.png".into(),
                sprite: blank_sprite(),
            },
        );
        assert!(loaded.changed);
        assert!(state.card_sprites.contains_key("https://img/bulbasaur/art.png"));

        reducer(&mut state, Action::PageNext);
        assert!(state.card_sprites.is_empty());

        let stale = reducer(
            &mut state,
            Action::CardSpriteDidLoad {
                request: first,
                url: "https://img/bulbasaur/art.png".into(),
                sprite: blank_sprite(),
            },
        );
        assert!(!stale.changed);
        assert!(state.card_sprites.is_empty());

        let request = state.page_request;
        let failed = reducer(
            &mut state,
            Action::CardSpriteDidError {
                request,
                url: "https://img/ivysaur/art.png".into(),
                error: "HTTP 404".into(),
            },
        );
        assert!(!failed.changed);
    }

    #[test]
    fn tick_only_changes_while_loading() {
        let mut state = text_only();
        assert!(!reducer(&mut state, Action::Tick).changed);
        state.page_loading = true;
        assert!(reducer(&mut state, Action::Tick).changed);
        assert_eq!(state.tick, 1);
    }
}
