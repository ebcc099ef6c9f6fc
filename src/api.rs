//! PokeAPI client: roster, detail records, species, evolution chains and image bytes.

use std::future::Future;

use futures_util::future::try_join_all;
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::{
    EvolutionChain, FlavorTextEntry, PokemonAbility, PokemonDetail, PokemonImages, PokemonSpecies,
    PokemonStat, RosterEntry,
};

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";
const SPRITE_BASE: &str = "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon";

pub fn thumbnail_url(id: u32) -> String {
    format!("{SPRITE_BASE}/{id}.png")
}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ApiResource {
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u32,
    name: String,
    height: u32,
    weight: u32,
    base_experience: Option<u32>,
    types: Vec<PokemonTypeSlot>,
    stats: Vec<PokemonStatSlot>,
    abilities: Vec<PokemonAbilitySlot>,
    moves: Vec<PokemonMoveSlot>,
    sprites: serde_json::Value,
    species: Option<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    slot: u8,
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u32,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: NamedResource,
    #[serde(default)]
    is_hidden: bool,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonMoveSlot {
    #[serde(rename = "move")]
    move_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct SpeciesResponse {
    name: String,
    #[serde(default)]
    flavor_text_entries: Vec<FlavorTextResponse>,
    capture_rate: Option<u8>,
    evolution_chain: Option<ApiResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct FlavorTextResponse {
    flavor_text: String,
    language: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct EvolutionChainResponse {
    chain: ChainLink,
}

#[derive(Clone, Debug, Deserialize)]
struct ChainLink {
    species: NamedResource,
    #[serde(default)]
    evolves_to: Vec<ChainLink>,
}

pub fn parse_roster(bytes: &[u8]) -> Result<Vec<RosterEntry>, ApiError> {
    let response: ListResponse = serde_json::from_slice(bytes)?;
    Ok(response
        .results
        .into_iter()
        .map(|item| RosterEntry::new(item.name, item.url))
        .collect())
}

pub fn parse_pokemon(bytes: &[u8]) -> Result<PokemonDetail, ApiError> {
    let response: PokemonResponse = serde_json::from_slice(bytes)?;

    let mut type_slots = response.types;
    type_slots.sort_by_key(|slot| slot.slot);
    let types = type_slots
        .into_iter()
        .map(|slot| slot.type_info.name)
        .collect();
    let stats = response
        .stats
        .into_iter()
        .map(|slot| PokemonStat {
            name: slot.stat.name,
            value: slot.base_stat,
        })
        .collect();
    let abilities = response
        .abilities
        .into_iter()
        .map(|slot| PokemonAbility {
            name: slot.ability.name,
            is_hidden: slot.is_hidden,
        })
        .collect();
    let moves = response
        .moves
        .into_iter()
        .map(|slot| slot.move_info.name)
        .collect();

    let sprites = &response.sprites;
    let images = PokemonImages {
        official_artwork: pointer_string(sprites, "/other/official-artwork/front_default"),
        front_default: pointer_string(sprites, "/front_default"),
        back_default: pointer_string(sprites, "/back_default"),
        front_shiny: pointer_string(sprites, "/front_shiny"),
        back_shiny: pointer_string(sprites, "/back_shiny"),
    };

    Ok(PokemonDetail {
        id: response.id,
        name: response.name,
        height: response.height,
        weight: response.weight,
        base_experience: response.base_experience,
        types,
        stats,
        abilities,
        moves,
        images,
        species_url: response.species.map(|species| species.url),
    })
}

pub fn parse_species(bytes: &[u8]) -> Result<PokemonSpecies, ApiError> {
    let response: SpeciesResponse = serde_json::from_slice(bytes)?;
    Ok(PokemonSpecies {
        name: response.name,
        flavor_text_entries: response
            .flavor_text_entries
            .into_iter()
            .map(|entry| FlavorTextEntry {
                text: entry.flavor_text,
                language: entry.language.name,
            })
            .collect(),
        capture_rate: response.capture_rate,
        evolution_chain_url: response.evolution_chain.map(|chain| chain.url),
    })
}

pub fn parse_evolution_chain(bytes: &[u8]) -> Result<EvolutionChain, ApiError> {
    let response: EvolutionChainResponse = serde_json::from_slice(bytes)?;
    let mut stages = Vec::new();
    build_chain_stages(&response.chain, &mut stages);
    Ok(EvolutionChain { stages })
}

fn build_chain_stages(chain: &ChainLink, stages: &mut Vec<String>) {
    if !stages.contains(&chain.species.name) {
        stages.push(chain.species.name.clone());
    }
    for next in &chain.evolves_to {
        build_chain_stages(next, stages);
    }
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|value| value.as_str())
        .filter(|url| !url.is_empty())
        .map(|value| value.to_string())
}

/// Thin reqwest wrapper bound to one API base url. Cheap to clone.
#[derive(Clone, Debug)]
pub struct PokeApi {
    client: reqwest::Client,
    base_url: String,
}

impl Default for PokeApi {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE)
    }
}

impl PokeApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn roster_url(&self, limit: u32) -> String {
        format!("{}/pokemon?limit={limit}", self.base_url)
    }

    /// Typed text is encoded as one path segment, so `?`, `#` and `/` stay part of the name.
    pub fn pokemon_url(&self, name: &str) -> String {
        let name = name.trim().to_lowercase();
        format!("{}/pokemon/{}", self.base_url, urlencoding::encode(&name))
    }

    pub async fn fetch_roster(&self, limit: u32) -> Result<Vec<RosterEntry>, ApiError> {
        let bytes = self.fetch_bytes(&self.roster_url(limit)).await?;
        parse_roster(&bytes)
    }

    pub async fn fetch_pokemon(&self, name: &str) -> Result<PokemonDetail, ApiError> {
        self.fetch_pokemon_at(&self.pokemon_url(name)).await
    }

    pub async fn fetch_pokemon_at(&self, url: &str) -> Result<PokemonDetail, ApiError> {
        let bytes = self.fetch_bytes(url).await?;
        parse_pokemon(&bytes)
    }

    /// Every entry's detail record, in entry order. The first failure rejects the batch.
    pub async fn fetch_page_details(
        &self,
        entries: &[RosterEntry],
    ) -> Result<Vec<PokemonDetail>, ApiError> {
        join_details(entries, move |entry| self.fetch_pokemon_at(&entry.url)).await
    }

    pub async fn fetch_species(&self, url: &str) -> Result<PokemonSpecies, ApiError> {
        let bytes = self.fetch_bytes(url).await?;
        parse_species(&bytes)
    }

    pub async fn fetch_evolution_chain(&self, url: &str) -> Result<EvolutionChain, ApiError> {
        let bytes = self.fetch_bytes(url).await?;
        parse_evolution_chain(&bytes)
    }

    /// Species first, then its evolution chain when the species references one.
    pub async fn fetch_supplementary(
        &self,
        species_url: &str,
    ) -> Result<(PokemonSpecies, Option<EvolutionChain>), ApiError> {
        chain_after_species(self.fetch_species(species_url), move |url| async move {
            self.fetch_evolution_chain(&url).await
        })
        .await
    }

    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        tracing::debug!(url, "GET");
        let response = self.client.get(url).send().await?;
        check_status(url, response.status())?;
        Ok(response.bytes().await?.to_vec())
    }
}

fn check_status(url: &str, status: reqwest::StatusCode) -> Result<(), ApiError> {
    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(url.to_string()));
    }
    if !status.is_success() {
        return Err(ApiError::Status {
            url: url.to_string(),
            status,
        });
    }
    Ok(())
}

/// Runs `fetch` for every entry concurrently; the first error rejects the whole batch.
async fn join_details<'a, F, Fut>(
    entries: &'a [RosterEntry],
    fetch: F,
) -> Result<Vec<PokemonDetail>, ApiError>
where
    F: FnMut(&'a RosterEntry) -> Fut,
    Fut: Future<Output = Result<PokemonDetail, ApiError>>,
{
    try_join_all(entries.iter().map(fetch)).await
}

/// Awaits the species, then the chain it references. No reference, no chain request.
async fn chain_after_species<S, C, Fut>(
    species: S,
    fetch_chain: C,
) -> Result<(PokemonSpecies, Option<EvolutionChain>), ApiError>
where
    S: Future<Output = Result<PokemonSpecies, ApiError>>,
    C: FnOnce(String) -> Fut,
    Fut: Future<Output = Result<EvolutionChain, ApiError>>,
{
    let species = species.await?;
    let evolution = match species.evolution_chain_url.clone() {
        Some(url) => Some(fetch_chain(url).await?),
        None => None,
    };
    Ok((species, evolution))
}
