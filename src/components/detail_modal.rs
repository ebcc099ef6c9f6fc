//! Modal detail view: header, tabbed characteristics and an image carousel.

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Paragraph, Tabs, Wrap},
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    centered_rect, BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding,
};

use super::theme::{
    dex_number, format_name, panel_block, shorten_stat, spinner, type_badge_style, type_color,
    ACCENT_GOLD, ACCENT_TEAL, BG_PANEL, TEXT_DIM, TEXT_MAIN,
};
use super::Component;
use crate::action::Action;
use crate::sprite::{kitty_sequence, SpriteData};
use crate::sprite_backend;
use crate::state::{DetailTab, DetailViewer, PokemonStat, MOVES_PREVIEW};

const MAX_STAT: u32 = 255;
const LOADING_TEXT: &str = "Loading...";

pub fn detail_modal_area(area: Rect) -> Rect {
    centered_rect(area.width.min(100), area.height.min(30), area)
}

#[derive(Default)]
pub struct DetailModal {
    modal: Modal,
}

pub struct DetailModalProps<'a> {
    pub viewer: &'a DetailViewer,
    /// Preferred flavor-text language
    pub language: &'a str,
    pub sprite: Option<&'a SpriteData>,
    pub show_images: bool,
    pub tick: u64,
    pub is_focused: bool,
}

impl DetailModal {
    pub fn new() -> Self {
        Self::default()
    }
}

fn header_text(props: &DetailModalProps<'_>) -> Text<'static> {
    let pokemon = &props.viewer.pokemon;
    let mut title = vec![
        Span::styled(
            format_name(&pokemon.name),
            Style::default()
                .fg(TEXT_MAIN)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(dex_number(pokemon.id), Style::default().fg(TEXT_DIM)),
        Span::raw("  "),
    ];
    for type_name in &pokemon.types {
        title.push(Span::styled(
            format!(" {type_name} "),
            type_badge_style(type_name),
        ));
        title.push(Span::raw(" "));
    }

    let description = match &props.viewer.species {
        Some(species) => species
            .localized_flavor_text(props.language)
            .unwrap_or_else(|| "No description available.".to_string()),
        None => LOADING_TEXT.to_string(),
    };
    Text::from(vec![
        Line::from(title),
        Line::raw(""),
        Line::styled(description, Style::default().fg(TEXT_DIM)),
    ])
}

fn info_text(viewer: &DetailViewer) -> Text<'static> {
    let pokemon = &viewer.pokemon;
    let label = Style::default().fg(ACCENT_TEAL);
    let row = |name: &str, value: String| {
        Line::from(vec![
            Span::styled(format!("{name:<16}"), label),
            Span::styled(value, Style::default().fg(TEXT_MAIN)),
        ])
    };

    let base_experience = pokemon
        .base_experience
        .map(|value| value.to_string())
        .unwrap_or_else(|| "-".to_string());
    let capture_rate = match &viewer.species {
        Some(species) => species
            .capture_rate
            .map(|rate| rate.to_string())
            .unwrap_or_else(|| "-".to_string()),
        None => LOADING_TEXT.to_string(),
    };

    let mut lines = vec![
        row("Height", format!("{:.1} m", pokemon.height as f32 / 10.0)),
        row("Weight", format!("{:.1} kg", pokemon.weight as f32 / 10.0)),
        row("Base experience", base_experience),
        row("Capture rate", capture_rate),
        Line::raw(""),
        Line::styled("Abilities", label),
    ];
    for ability in &pokemon.abilities {
        let mut spans = vec![Span::raw("  "), Span::raw(format_name(&ability.name))];
        if ability.is_hidden {
            spans.push(Span::styled(" (hidden)", Style::default().fg(ACCENT_GOLD)));
        }
        lines.push(Line::from(spans));
    }

    if let Some(chain) = &viewer.evolution {
        lines.push(Line::raw(""));
        lines.push(Line::styled("Evolution", label));
        let stages: Vec<String> = chain.stages.iter().map(|name| format_name(name)).collect();
        lines.push(Line::raw(format!("  {}", stages.join(" -> "))));
    }
    Text::from(lines)
}

/// Bar cells filled for a stat, proportional to `min(1, value / 255)`.
pub fn stat_bar_cells(value: u32, width: u16) -> u16 {
    let ratio = (value.min(MAX_STAT) as f32) / MAX_STAT as f32;
    (ratio * width as f32).round() as u16
}

fn stat_line(stat: &PokemonStat, bar_width: u16, color: ratatui::style::Color) -> Line<'static> {
    let filled = stat_bar_cells(stat.value, bar_width);
    let empty = bar_width.saturating_sub(filled);
    Line::from(vec![
        Span::styled(
            format!("{:<7}", shorten_stat(&stat.name)),
            Style::default().fg(ACCENT_TEAL),
        ),
        Span::styled(format!("{:>3} ", stat.value), Style::default().fg(TEXT_MAIN)),
        Span::styled("█".repeat(filled as usize), Style::default().fg(color)),
        Span::styled("░".repeat(empty as usize), Style::default().fg(TEXT_DIM)),
    ])
}

fn stats_text(viewer: &DetailViewer, width: u16) -> Text<'static> {
    let color = viewer
        .pokemon
        .primary_type()
        .map(type_color)
        .unwrap_or(ACCENT_TEAL);
    let bar_width = width.saturating_sub(12).max(1);
    let total: u32 = viewer.pokemon.stats.iter().map(|stat| stat.value).sum();
    let mut lines: Vec<Line> = viewer
        .pokemon
        .stats
        .iter()
        .map(|stat| stat_line(stat, bar_width, color))
        .collect();
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled(format!("{:<7}", "TOTAL"), Style::default().fg(ACCENT_GOLD)),
        Span::styled(total.to_string(), Style::default().fg(TEXT_MAIN)),
    ]));
    Text::from(lines)
}

fn moves_text(viewer: &DetailViewer) -> Text<'static> {
    let moves = &viewer.pokemon.moves;
    if moves.is_empty() {
        return Text::styled("No moves recorded.", Style::default().fg(TEXT_DIM));
    }
    let mut lines: Vec<Line> = moves
        .iter()
        .take(MOVES_PREVIEW)
        .map(|name| Line::raw(format!("- {}", format_name(name))))
        .collect();
    if moves.len() > MOVES_PREVIEW {
        lines.push(Line::styled(
            format!("and {} more...", moves.len() - MOVES_PREVIEW),
            Style::default().fg(TEXT_DIM),
        ));
    }
    Text::from(lines)
}

fn render_carousel(frame: &mut Frame, area: Rect, props: &DetailModalProps<'_>) {
    let block = panel_block(" Images ", false);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let [image_area, label_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(2)]).areas(inner);

    let Some((kind, _)) = props.viewer.active_image() else {
        frame.render_widget(
            Paragraph::new("[no images]")
                .alignment(Alignment::Center)
                .style(Style::default().fg(TEXT_DIM)),
            image_area,
        );
        return;
    };

    let position = format!(
        "{}/{}",
        props.viewer.image_index + 1,
        props.viewer.image_count()
    );
    let label = Text::from(vec![
        Line::styled(kind.label(), Style::default().fg(ACCENT_GOLD)),
        Line::from(vec![
            Span::styled("[ ", Style::default().fg(TEXT_DIM)),
            Span::styled(position, Style::default().fg(TEXT_MAIN)),
            Span::styled(" ]", Style::default().fg(TEXT_DIM)),
        ]),
    ]);
    frame.render_widget(Paragraph::new(label).alignment(Alignment::Center), label_area);

    if !props.show_images {
        return;
    }
    match props.sprite {
        Some(sprite) => {
            let (cols, rows) = sprite.fit(image_area.width, image_area.height);
            let x = image_area.x + image_area.width.saturating_sub(cols) / 2;
            let y = image_area.y + image_area.height.saturating_sub(rows) / 2;
            sprite_backend::place_sprite(x, y, kitty_sequence(sprite, cols, rows));
        }
        None => frame.render_widget(
            Paragraph::new(format!("{} loading image", spinner(props.tick)))
                .alignment(Alignment::Center)
                .style(Style::default().fg(TEXT_DIM)),
            image_area,
        ),
    }
}

fn render_tabs(frame: &mut Frame, area: Rect, viewer: &DetailViewer) {
    let block = panel_block(" Details ", true);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let [tabs_area, body_area] =
        Layout::vertical([Constraint::Length(2), Constraint::Min(1)]).areas(inner);

    let titles: Vec<&str> = DetailTab::ALL.iter().map(|tab| tab.title()).collect();
    let tabs = Tabs::new(titles)
        .select(viewer.tab.index())
        .style(Style::default().fg(TEXT_DIM))
        .highlight_style(
            Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, tabs_area);

    let body = match viewer.tab {
        DetailTab::Info => info_text(viewer),
        DetailTab::Stats => stats_text(viewer, body_area.width),
        DetailTab::Moves => moves_text(viewer),
    };
    frame.render_widget(
        Paragraph::new(body)
            .style(Style::default().fg(TEXT_MAIN))
            .wrap(Wrap { trim: false }),
        body_area,
    );
}

impl Component<Action> for DetailModal {
    type Props<'a> = DetailModalProps<'a>;

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
        match key.code {
            KeyCode::Esc | KeyCode::Backspace => Some(Action::DetailClose),
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => Some(Action::DetailTabNext),
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => Some(Action::DetailTabPrev),
            KeyCode::Char('1') => Some(Action::DetailTabSet(DetailTab::Info)),
            KeyCode::Char('2') => Some(Action::DetailTabSet(DetailTab::Stats)),
            KeyCode::Char('3') => Some(Action::DetailTabSet(DetailTab::Moves)),
            KeyCode::Char(']') | KeyCode::Char('.') => Some(Action::DetailImageNext),
            KeyCode::Char('[') | KeyCode::Char(',') => Some(Action::DetailImagePrev),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.width < 30 || area.height < 12 {
            return;
        }
        let modal_area = detail_modal_area(area);
        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            let [header_area, body_area] =
                Layout::vertical([Constraint::Length(5), Constraint::Min(4)]).areas(content_area);
            frame.render_widget(
                Paragraph::new(header_text(&props)).wrap(Wrap { trim: true }),
                header_area,
            );

            let [carousel_area, tabs_area] =
                Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)])
                    .areas(body_area);
            render_carousel(frame, carousel_area, &props);
            render_tabs(frame, tabs_area, props.viewer);
        };

        self.modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: modal_area,
                style: ModalStyle {
                    base: BaseStyle {
                        bg: Some(BG_PANEL),
                        padding: Padding::all(1),
                        border: None,
                        fg: Some(TEXT_MAIN),
                    },
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::DetailClose,
                render_content: &mut render_content,
            },
        );
    }
}
