//! Top-level layout and event routing for the Pokedex.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::{EventContext, EventKind, EventRoutingState, HandlerResponse, RenderContext};
use tui_dispatch_components::{
    BaseStyle, BorderStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps,
    StatusBarSection, StatusBarStyle,
};

use crate::action::Action;
use crate::components::theme::{spinner, ACCENT_GOLD, ACCENT_TEAL, BG_BASE, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::components::{
    detail_modal_area, search_modal_area, CardGrid, CardGridProps, Component, DetailModal,
    DetailModalProps, SearchBox, SearchBoxProps,
};
use crate::sprite_backend;
use crate::state::AppState;

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PokedexComponentId {
    Grid,
    Search,
    Detail,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PokedexContext {
    Grid,
    Search,
    Detail,
}

impl EventRoutingState<PokedexComponentId, PokedexContext> for AppState {
    fn focused(&self) -> Option<PokedexComponentId> {
        self.modal().or(Some(PokedexComponentId::Grid))
    }

    fn modal(&self) -> Option<PokedexComponentId> {
        if self.viewer.is_some() {
            Some(PokedexComponentId::Detail)
        } else if self.search.active {
            Some(PokedexComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: PokedexComponentId) -> PokedexContext {
        match id {
            PokedexComponentId::Grid => PokedexContext::Grid,
            PokedexComponentId::Search => PokedexContext::Search,
            PokedexComponentId::Detail => PokedexContext::Detail,
        }
    }

    fn default_context(&self) -> PokedexContext {
        PokedexContext::Grid
    }
}

pub struct PokedexUi {
    grid: CardGrid,
    search: SearchBox,
    detail: DetailModal,
    status_bar: StatusBar,
}

impl Default for PokedexUi {
    fn default() -> Self {
        Self::new()
    }
}

impl PokedexUi {
    pub fn new() -> Self {
        Self {
            grid: CardGrid,
            search: SearchBox::new(),
            detail: DetailModal::new(),
            status_bar: StatusBar::new(),
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<PokedexComponentId>,
    ) {
        sprite_backend::clear_sprites();
        frame.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);

        let [header_area, grid_area, footer_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .areas(area);

        render_header(frame, header_area, state);

        event_ctx.set_component_area(PokedexComponentId::Grid, grid_area);
        let grid_props = grid_props(state, render_ctx.is_focused() && state.modal().is_none());
        self.grid.render(frame, grid_area, grid_props);

        render_footer(frame, footer_area, state, &mut self.status_bar);

        self.search.set_open(state.search.active && state.viewer.is_none());
        if state.search.active && state.viewer.is_none() {
            event_ctx.set_component_area(PokedexComponentId::Search, search_modal_area(area));
            let props = search_props(state, render_ctx.is_focused());
            self.search.render(frame, area, props);
        } else {
            event_ctx.component_areas.remove(&PokedexComponentId::Search);
        }

        if let Some(viewer) = &state.viewer {
            event_ctx.set_component_area(PokedexComponentId::Detail, detail_modal_area(area));
            let props = DetailModalProps {
                viewer,
                language: &state.settings.language,
                sprite: active_sprite(state),
                show_images: state.settings.show_images,
                tick: state.tick,
                is_focused: render_ctx.is_focused(),
            };
            self.detail.render(frame, area, props);
        } else {
            event_ctx.component_areas.remove(&PokedexComponentId::Detail);
        }
    }

    pub fn handle_grid_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let actions = self
            .grid
            .handle_event(event, grid_props(state, true))
            .into_iter()
            .collect();
        handler_response(actions)
    }

    pub fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        self.search.set_open(state.search.active);
        let actions: Vec<_> = self
            .search
            .handle_event(event, search_props(state, true))
            .into_iter()
            .collect();
        // The search box owns the keyboard while open.
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }

    pub fn handle_detail_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let Some(viewer) = &state.viewer else {
            return HandlerResponse::ignored();
        };
        let props = DetailModalProps {
            viewer,
            language: &state.settings.language,
            sprite: None,
            show_images: state.settings.show_images,
            tick: state.tick,
            is_focused: true,
        };
        let actions = self.detail.handle_event(event, props).into_iter().collect();
        handler_response(actions)
    }
}

fn grid_props(state: &AppState, is_focused: bool) -> CardGridProps<'_> {
    CardGridProps {
        cards: &state.page_details,
        cursor: state.card_cursor,
        page: state.page,
        page_count: state.page_count(),
        page_loading: state.page_loading,
        roster_loading: state.roster_loading,
        roster_len: state.roster.len(),
        sprites: &state.card_sprites,
        // Kitty images draw above every cell, so cards hide theirs under a modal.
        show_images: state.settings.show_images && state.modal().is_none(),
        tick: state.tick,
        is_focused,
    }
}

fn search_props(state: &AppState, is_focused: bool) -> SearchBoxProps<'_> {
    SearchBoxProps {
        query: &state.search.query,
        results: &state.search.results,
        selected: state.search.selected,
        is_focused,
        thumbnail: active_sprite(state),
        show_images: state.settings.show_images,
        on_query_change: Action::SearchQueryChange,
        on_select: Action::SearchSelect,
    }
}

fn active_sprite(state: &AppState) -> Option<&crate::sprite::SpriteData> {
    let url = state.wanted_sprite_url()?;
    state.sprite_for(&url)
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn render_header(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![
        Span::styled(
            " POKEDEX ",
            Style::default()
                .fg(BG_BASE)
                .bg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            format!("{} Pokemon", state.roster.len()),
            Style::default().fg(TEXT_MAIN),
        ),
    ];
    if state.is_loading() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(spinner(state.tick), Style::default().fg(ACCENT_GOLD)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn status_text(state: &AppState) -> &'static str {
    if state.roster_loading {
        "Loading roster..."
    } else if state.selection_loading {
        "Loading Pokemon..."
    } else if state.page_loading {
        "Loading page..."
    } else if state.viewer.as_ref().is_some_and(|v| v.supplementary_loading) {
        "Loading species..."
    } else {
        ""
    }
}

fn status_hints(state: &AppState) -> Vec<StatusBarHint<'static>> {
    if state.viewer.is_some() {
        return vec![
            StatusBarHint::new("Tab/<->", "Tabs"),
            StatusBarHint::new("[ ]", "Image"),
            StatusBarHint::new("Esc", "Close"),
        ];
    }
    if state.search.active {
        return vec![
            StatusBarHint::new("Up/Down", "Select"),
            StatusBarHint::new("Enter", "Open"),
            StatusBarHint::new("Esc", "Cancel"),
        ];
    }
    vec![
        StatusBarHint::new("Arrows", "Move"),
        StatusBarHint::new("Enter", "Open"),
        StatusBarHint::new("n/p", "Page"),
        StatusBarHint::new("/", "Search"),
        StatusBarHint::new("q", "Quit"),
    ]
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState, status_bar: &mut StatusBar) {
    let hints = status_hints(state);
    let status_span = Span::styled(status_text(state), Style::default().fg(ACCENT_GOLD));
    let status_items = [StatusBarItem::span(status_span)];

    let style = StatusBarStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: Some(Style::default().fg(ACCENT_TEAL)),
            }),
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    };

    let props = StatusBarProps {
        left: StatusBarSection::hints(&hints).with_separator("  "),
        center: StatusBarSection::empty(),
        right: StatusBarSection::items(&status_items).with_separator("  "),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}
