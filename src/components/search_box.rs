//! Search modal: text input, autocomplete list and a thumbnail of the highlighted match.

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    centered_rect, highlight_substring, BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle,
    Padding, SelectList, SelectListBehavior, SelectListProps, SelectListStyle, SelectionStyle,
    TextInput, TextInputProps, TextInputStyle,
};

use super::theme::{
    dex_number, format_name, panel_block, ACCENT_GOLD, BG_HIGHLIGHT, BG_PANEL, BG_PANEL_ALT,
    TEXT_DIM, TEXT_MAIN,
};
use super::Component;
use crate::action::Action;
use crate::sprite::{kitty_sequence, SpriteData};
use crate::sprite_backend;
use crate::state::RosterEntry;

const PLACEHOLDER: &str = "Search Pokemon by name...";
const THUMB_WIDTH: u16 = 22;

pub fn search_modal_area(area: Rect) -> Rect {
    centered_rect(area.width.min(72), area.height.min(18), area)
}

pub struct SearchBox {
    input: TextInput,
    list: SelectList,
    modal: Modal,
    was_open: bool,
}

pub struct SearchBoxProps<'a> {
    pub query: &'a str,
    pub results: &'a [RosterEntry],
    pub selected: usize,
    pub is_focused: bool,
    /// Decoded thumbnail of the highlighted suggestion, once loaded
    pub thumbnail: Option<&'a SpriteData>,
    pub show_images: bool,
    pub on_query_change: fn(String) -> Action,
    pub on_select: fn(usize) -> Action,
}

impl Default for SearchBox {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
            list: SelectList::new(),
            modal: Modal::new(),
            was_open: false,
        }
    }
}

impl SearchBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the input and list when the box opens again.
    pub fn set_open(&mut self, is_open: bool) {
        if is_open && !self.was_open {
            self.input = TextInput::new();
            self.list = SelectList::new();
        }
        self.was_open = is_open;
    }

    fn result_items(results: &[RosterEntry], query: &str) -> Vec<Line<'static>> {
        let base = Style::default().fg(TEXT_MAIN);
        let highlight = Style::default()
            .fg(ACCENT_GOLD)
            .add_modifier(Modifier::BOLD);
        results
            .iter()
            .map(|entry| highlight_substring(&entry.name, query, base, highlight))
            .collect()
    }

    fn list_style() -> SelectListStyle {
        SelectListStyle {
            base: BaseStyle {
                border: None,
                padding: Padding::xy(1, 0),
                bg: None,
                fg: Some(TEXT_MAIN),
            },
            selection: SelectionStyle {
                style: Some(
                    Style::default()
                        .bg(BG_HIGHLIGHT)
                        .fg(TEXT_MAIN)
                        .add_modifier(Modifier::BOLD),
                ),
                marker: None,
                disabled: false,
            },
            ..SelectListStyle::default()
        }
    }

    fn input_style() -> TextInputStyle {
        TextInputStyle {
            base: BaseStyle {
                border: None,
                padding: Padding::xy(1, 0),
                bg: Some(BG_PANEL_ALT),
                fg: Some(TEXT_MAIN),
            },
            placeholder_style: Some(Style::default().fg(TEXT_DIM)),
            cursor_style: None,
        }
    }

    fn render_thumbnail(frame: &mut Frame, area: Rect, props: &SearchBoxProps<'_>) {
        let block = panel_block(" Preview ", false);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        let Some(entry) = props.results.get(props.selected) else {
            return;
        };

        let [image_area, label_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(inner);
        let label = match entry.id() {
            Some(id) => format!("{} {}", dex_number(id), format_name(&entry.name)),
            None => format_name(&entry.name),
        };
        frame.render_widget(
            Paragraph::new(label)
                .alignment(Alignment::Center)
                .style(Style::default().fg(ACCENT_GOLD)),
            label_area,
        );

        if !props.show_images {
            return;
        }
        match props.thumbnail {
            Some(sprite) => {
                let (cols, rows) = sprite.fit(image_area.width, image_area.height);
                let x = image_area.x + image_area.width.saturating_sub(cols) / 2;
                let y = image_area.y + image_area.height.saturating_sub(rows) / 2;
                sprite_backend::place_sprite(x, y, kitty_sequence(sprite, cols, rows));
            }
            None => frame.render_widget(
                Paragraph::new("[loading]")
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(TEXT_DIM)),
                image_area,
            ),
        }
    }
}

impl Component<Action> for SearchBox {
    type Props<'a> = SearchBoxProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }
        let EventKind::Key(key) = event else {
            return Vec::new();
        };

        match key.code {
            KeyCode::Esc => return vec![Action::SearchClose],
            KeyCode::Enter => return vec![Action::SearchSubmit],
            KeyCode::Down | KeyCode::Up => {
                if props.results.is_empty() {
                    return Vec::new();
                }
                let items = Self::result_items(props.results, props.query);
                let list_props = SelectListProps {
                    items: &items,
                    count: items.len(),
                    selected: props.selected,
                    is_focused: true,
                    style: Self::list_style(),
                    behavior: SelectListBehavior::default(),
                    on_select: props.on_select,
                    render_item: &|item| item.clone(),
                };
                return self
                    .list
                    .handle_event(event, list_props)
                    .into_iter()
                    .collect();
            }
            _ => {}
        }

        let input_props = TextInputProps {
            value: props.query,
            placeholder: PLACEHOLDER,
            is_focused: true,
            style: Self::input_style(),
            on_change: props.on_query_change,
            on_submit: |_| Action::SearchSubmit,
            on_cursor_move: Some(|_| Action::Render),
        };
        self.input
            .handle_event(event, input_props)
            .into_iter()
            .collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.width < 24 || area.height < 8 {
            return;
        }

        let SearchBox {
            input, list, modal, ..
        } = self;
        let modal_area = search_modal_area(area);
        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            let [main, preview] =
                Layout::horizontal([Constraint::Min(20), Constraint::Length(THUMB_WIDTH)])
                    .areas(content_area);
            let [input_area, count_area, list_area] = Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(1),
            ])
            .areas(main);

            let input_props = TextInputProps {
                value: props.query,
                placeholder: PLACEHOLDER,
                is_focused: props.is_focused,
                style: Self::input_style(),
                on_change: props.on_query_change,
                on_submit: |_| Action::SearchSubmit,
                on_cursor_move: Some(|_| Action::Render),
            };
            input.render(frame, input_area, input_props);

            let count = if props.query.is_empty() {
                String::new()
            } else {
                format!(" {} matches", props.results.len())
            };
            frame.render_widget(
                Paragraph::new(count).style(Style::default().fg(TEXT_DIM)),
                count_area,
            );

            let items = Self::result_items(props.results, props.query);
            let list_props = SelectListProps {
                items: &items,
                count: items.len(),
                selected: props.selected,
                is_focused: props.is_focused,
                style: Self::list_style(),
                behavior: SelectListBehavior {
                    show_scrollbar: true,
                    wrap_navigation: false,
                },
                on_select: props.on_select,
                render_item: &|item| item.clone(),
            };
            list.render(frame, list_area, list_props);

            Self::render_thumbnail(frame, preview, &props);
        };

        modal.render(
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
                on_close: || Action::SearchClose,
                render_content: &mut render_content,
            },
        );
    }
}
