//! Pokedex TUI entry point.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{KeyCode, KeyModifiers};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::Terminal;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventKind,
    HandlerResponse, Keybindings, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokedex::action::Action;
use pokedex::api::PokeApi;
use pokedex::config::ConfigArgs;
use pokedex::effect::Effect;
use pokedex::logging::init_logging;
use pokedex::reducer::reducer;
use pokedex::sprite::decode_sprite;
use pokedex::sprite_backend::{self, SpriteBackend};
use pokedex::state::AppState;
use pokedex::ui::{PokedexComponentId, PokedexContext, PokedexUi};

const TICK_MS: u64 = 120;

#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Browse the PokeAPI Pokedex in your terminal")]
struct Args {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        config,
        debug: debug_args,
    } = Args::parse();

    init_logging(&config.log_path(), &config.log_level)?;
    tracing::info!(api = %config.api_base, limit = config.limit, "starting pokedex");

    let debug = DebugSession::new(debug_args);
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let settings = config.settings();
    let state = debug
        .load_state_or_else_async(move || async move { Ok::<AppState, io::Error>(AppState::new(settings)) })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);
    let api = PokeApi::new(config.api_base.clone());

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = SpriteBackend::new(stdout, sprite_backend::sprite_registry());
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions, api).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    tracing::info!("pokedex closed");
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    api: PokeApi,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(PokedexUi::new()));
    let mut bus: EventBus<AppState, Action, PokedexComponentId, PokedexContext> = EventBus::new();
    let keybindings: Keybindings<PokedexContext> = Keybindings::new();

    let ui_grid = Rc::clone(&ui);
    bus.register(PokedexComponentId::Grid, move |event, state| {
        ui_grid.borrow_mut().handle_grid_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(PokedexComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(PokedexComponentId::Detail, move |event, state| {
        ui_detail
            .borrow_mut()
            .handle_detail_event(&event.kind, state)
    });

    bus.register_global(|event, state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        EventKind::Key(key) => match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                HandlerResponse::action(Action::Quit)
            }
            KeyCode::Char('q') if !state.search.active => HandlerResponse::action(Action::Quit),
            KeyCode::Char('/') if !state.search.active && state.viewer.is_none() => {
                HandlerResponse::action(Action::SearchOpen)
            }
            _ => HandlerResponse::ignored(),
        },
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime
                    .subscriptions()
                    .interval("tick", Duration::from_millis(TICK_MS), || Action::Tick);
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, &api),
        )
        .await
}

/// Runs each effect as a keyed task; a new request under the same key replaces the old one.
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, api: &PokeApi) {
    match effect {
        Effect::LoadRoster { limit } => {
            let api = api.clone();
            ctx.tasks().spawn(TaskKey::new("roster"), async move {
                match api.fetch_roster(limit).await {
                    Ok(entries) => Action::RosterDidLoad(entries),
                    Err(err) => {
                        tracing::error!(error = %err, "roster request failed");
                        Action::RosterDidError(err.to_string())
                    }
                }
            });
        }
        Effect::LoadPageDetails { request, entries } => {
            let api = api.clone();
            ctx.tasks().spawn(TaskKey::new("page_details"), async move {
                match api.fetch_page_details(&entries).await {
                    Ok(details) => Action::PageDetailsDidLoad { request, details },
                    Err(err) => {
                        tracing::warn!(request, error = %err, "page batch rejected");
                        Action::PageDetailsDidError {
                            request,
                            error: err.to_string(),
                        }
                    }
                }
            });
        }
        Effect::LoadSelection { request, name } => {
            let api = api.clone();
            ctx.tasks().spawn(TaskKey::new("selection"), async move {
                match api.fetch_pokemon(&name).await {
                    Ok(detail) => Action::SelectionDidLoad { request, detail },
                    Err(err) => {
                        if err.is_not_found() {
                            tracing::info!(%name, "no such pokemon");
                        } else {
                            tracing::warn!(%name, error = %err, "selection request failed");
                        }
                        Action::SelectionDidError {
                            request,
                            name,
                            error: err.to_string(),
                        }
                    }
                }
            });
        }
        Effect::LoadSupplementary { name, species_url } => {
            let api = api.clone();
            ctx.tasks().spawn(TaskKey::new("supplementary"), async move {
                match api.fetch_supplementary(&species_url).await {
                    Ok((species, evolution)) => Action::SupplementaryDidLoad {
                        name,
                        species,
                        evolution,
                    },
                    Err(err) => {
                        tracing::warn!(%name, error = %err, "species request failed");
                        Action::SupplementaryDidError {
                            name,
                            error: err.to_string(),
                        }
                    }
                }
            });
        }
        Effect::LoadSprite { url } => {
            let api = api.clone();
            ctx.tasks().spawn(TaskKey::new("sprite"), async move {
                let decoded = match api.fetch_bytes(&url).await {
                    Ok(bytes) => decode_sprite(&bytes),
                    Err(err) => Err(err),
                };
                match decoded {
                    Ok(sprite) => Action::SpriteDidLoad { url, sprite },
                    Err(err) => Action::SpriteDidError {
                        url,
                        error: err.to_string(),
                    },
                }
            });
        }
        Effect::LoadCardSprite { request, url } => {
            let api = api.clone();
            let key = format!("card_sprite_{url}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                let decoded = match api.fetch_bytes(&url).await {
                    Ok(bytes) => decode_sprite(&bytes),
                    Err(err) => Err(err),
                };
                match decoded {
                    Ok(sprite) => Action::CardSpriteDidLoad {
                        request,
                        url,
                        sprite,
                    },
                    Err(err) => Action::CardSpriteDidError {
                        request,
                        url,
                        error: err.to_string(),
                    },
                }
            });
        }
    }
}
