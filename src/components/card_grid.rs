//! Paginated grid of Pokemon cards with a prev/next pagination bar.
//!
//! With images on, each card keeps its text on the bottom three rows and shows
//! its artwork above them once decoded.

use std::collections::BTreeMap;

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;

use super::theme::{
    dex_number, format_name, panel_block, spinner, type_badge_style, ACCENT_GOLD, ACCENT_TEAL,
    BG_PANEL, BG_PANEL_ALT, TEXT_DIM, TEXT_DISABLED, TEXT_MAIN,
};
use super::Component;
use crate::action::Action;
use crate::sprite::{kitty_sequence, SpriteData};
use crate::sprite_backend;
use crate::state::{PokemonDetail, GRID_COLUMNS, PAGE_SIZE};

const CARD_TEXT_ROWS: u16 = 3;
const GRID_ROWS: usize = PAGE_SIZE.div_ceil(GRID_COLUMNS);

#[derive(Default)]
pub struct CardGrid;

pub struct CardGridProps<'a> {
    pub cards: &'a [PokemonDetail],
    pub cursor: usize,
    /// Zero-based
    pub page: usize,
    pub page_count: usize,
    pub page_loading: bool,
    pub roster_loading: bool,
    pub roster_len: usize,
    /// Decoded card artwork keyed by image url
    pub sprites: &'a BTreeMap<String, SpriteData>,
    pub show_images: bool,
    pub tick: u64,
    pub is_focused: bool,
}

impl CardGrid {
    fn render_card(
        frame: &mut Frame,
        area: Rect,
        card: &PokemonDetail,
        artwork: Option<&SpriteData>,
        highlighted: bool,
    ) {
        let border = if highlighted {
            Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT_DIM)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .style(Style::default().bg(if highlighted { BG_PANEL_ALT } else { BG_PANEL }));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let text_area = match artwork {
            Some(sprite) if inner.height > CARD_TEXT_ROWS => {
                let [image_area, text_area] =
                    Layout::vertical([Constraint::Min(1), Constraint::Length(CARD_TEXT_ROWS)])
                        .areas(inner);
                let (cols, rows) = sprite.fit(image_area.width, image_area.height);
                let x = image_area.x + image_area.width.saturating_sub(cols) / 2;
                let y = image_area.y + image_area.height.saturating_sub(rows) / 2;
                sprite_backend::place_sprite(x, y, kitty_sequence(sprite, cols, rows));
                text_area
            }
            _ => inner,
        };

        let mut badges = Vec::new();
        for (idx, type_name) in card.types.iter().enumerate() {
            if idx > 0 {
                badges.push(Span::raw(" "));
            }
            badges.push(Span::styled(
                format!(" {type_name} "),
                type_badge_style(type_name),
            ));
        }
        let lines = vec![
            Line::styled(dex_number(card.id), Style::default().fg(TEXT_DIM)),
            Line::styled(
                format_name(&card.name),
                Style::default().fg(TEXT_MAIN).add_modifier(Modifier::BOLD),
            ),
            Line::from(badges),
        ];
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), text_area);
    }

    fn render_pagination(frame: &mut Frame, area: Rect, props: &CardGridProps<'_>) {
        let enabled = Style::default()
            .fg(ACCENT_TEAL)
            .add_modifier(Modifier::BOLD);
        let disabled = Style::default().fg(TEXT_DISABLED);
        let prev_style = if props.page > 0 { enabled } else { disabled };
        let next_style = if props.page + 1 < props.page_count {
            enabled
        } else {
            disabled
        };
        let line = Line::from(vec![
            Span::styled("< Prev", prev_style),
            Span::raw("   "),
            Span::styled(
                format!("Page {} of {}", props.page + 1, props.page_count),
                Style::default().fg(ACCENT_GOLD),
            ),
            Span::raw("   "),
            Span::styled("Next >", next_style),
        ]);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
    }

    fn placeholder(props: &CardGridProps<'_>) -> Option<String> {
        if props.roster_loading {
            return Some(format!("{} Loading roster...", spinner(props.tick)));
        }
        if props.roster_len == 0 {
            return Some("No Pokemon loaded.".to_string());
        }
        if props.cards.is_empty() {
            return Some(format!("{} Loading page...", spinner(props.tick)));
        }
        None
    }
}

impl Component<Action> for CardGrid {
    type Props<'a> = CardGridProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }
        let EventKind::Key(key) = event else {
            return None;
        };
        let columns = GRID_COLUMNS as i16;
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => Some(Action::CardMove(-1)),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::CardMove(1)),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::CardMove(-columns)),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::CardMove(columns)),
            KeyCode::Enter => Some(Action::CardOpen),
            KeyCode::PageDown | KeyCode::Char('n') => Some(Action::PageNext),
            KeyCode::PageUp | KeyCode::Char('p') => Some(Action::PagePrev),
            KeyCode::Home => Some(Action::PageSet(0)),
            KeyCode::End => Some(Action::PageSet(props.page_count.saturating_sub(1))),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let title = if props.page_loading && !props.cards.is_empty() {
            format!(" Pokedex {} ", spinner(props.tick))
        } else {
            " Pokedex ".to_string()
        };
        let block = panel_block(title, props.is_focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [grid_area, pagination_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);
        Self::render_pagination(frame, pagination_area, &props);

        if let Some(message) = Self::placeholder(&props) {
            frame.render_widget(
                Paragraph::new(message)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(TEXT_DIM)),
                grid_area,
            );
            return;
        }

        let rows = Layout::vertical(vec![Constraint::Fill(1); GRID_ROWS]).split(grid_area);
        for (row_index, row_area) in rows.iter().enumerate() {
            let columns = Layout::horizontal(vec![Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
                .split(*row_area);
            for (col_index, card_area) in columns.iter().enumerate() {
                let index = row_index * GRID_COLUMNS + col_index;
                let Some(card) = props.cards.get(index) else {
                    return;
                };
                if card_area.height < CARD_TEXT_ROWS {
                    continue;
                }
                let artwork = card
                    .card_image_url()
                    .filter(|_| props.show_images)
                    .and_then(|url| props.sprites.get(url));
                Self::render_card(frame, *card_area, card, artwork, index == props.cursor);
            }
        }
    }
}
