//! Pokedex TUI: a paginated PokeAPI browser built on tui-dispatch.
//!
//! The library exposes the app's modules so the binary and the integration
//! tests share them.

pub mod action;
pub mod api;
pub mod components;
pub mod config;
pub mod effect;
pub mod error;
pub mod logging;
pub mod reducer;
pub mod sprite;
pub mod sprite_backend;
pub mod state;
pub mod ui;
