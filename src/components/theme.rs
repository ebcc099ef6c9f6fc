//! Palette and text helpers shared by the Pokedex components.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};
use tui_dispatch_components::BorderStyle;

pub const BG_BASE: Color = Color::Rgb(12, 18, 28);
pub const BG_PANEL: Color = Color::Rgb(20, 32, 46);
pub const BG_PANEL_ALT: Color = Color::Rgb(26, 40, 58);
pub const BG_HIGHLIGHT: Color = Color::Rgb(28, 92, 110);
pub const TEXT_MAIN: Color = Color::Rgb(232, 242, 244);
pub const TEXT_DIM: Color = Color::Rgb(176, 195, 207);
pub const TEXT_DISABLED: Color = Color::Rgb(84, 100, 114);
pub const ACCENT_TEAL: Color = Color::Rgb(72, 204, 184);
pub const ACCENT_GOLD: Color = Color::Rgb(228, 176, 88);

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Badge colour for a Pokemon type name. Unknown types fall back to grey.
pub fn type_color(name: &str) -> Color {
    match name {
        "normal" => Color::Rgb(0xA8, 0xA8, 0x78),
        "fire" => Color::Rgb(0xF0, 0x80, 0x30),
        "water" => Color::Rgb(0x68, 0x90, 0xF0),
        "electric" => Color::Rgb(0xF8, 0xD0, 0x30),
        "grass" => Color::Rgb(0x78, 0xC8, 0x50),
        "ice" => Color::Rgb(0x98, 0xD8, 0xD8),
        "fighting" => Color::Rgb(0xC0, 0x30, 0x28),
        "poison" => Color::Rgb(0xA0, 0x40, 0xA0),
        "ground" => Color::Rgb(0xE0, 0xC0, 0x68),
        "flying" => Color::Rgb(0xA8, 0x90, 0xF0),
        "psychic" => Color::Rgb(0xF8, 0x58, 0x88),
        "bug" => Color::Rgb(0xA8, 0xB8, 0x20),
        "rock" => Color::Rgb(0xB8, 0xA0, 0x38),
        "ghost" => Color::Rgb(0x70, 0x58, 0x98),
        "dragon" => Color::Rgb(0x70, 0x38, 0xF8),
        "dark" => Color::Rgb(0x70, 0x58, 0x48),
        "steel" => Color::Rgb(0xB8, 0xB8, 0xD0),
        "fairy" => Color::Rgb(0xEE, 0x99, 0xAC),
        _ => Color::Rgb(0x77, 0x77, 0x77),
    }
}

/// Black or white, whichever reads better on the type colour.
pub fn type_badge_style(name: &str) -> Style {
    let bg = type_color(name);
    let fg = match bg {
        Color::Rgb(r, g, b) if (r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000 > 150 => {
            Color::Black
        }
        _ => Color::White,
    };
    Style::default().bg(bg).fg(fg).add_modifier(Modifier::BOLD)
}

/// `mr-mime` -> `Mr Mime`
pub fn format_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str()),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn dex_number(id: u32) -> String {
    format!("#{id:03}")
}

pub fn shorten_stat(name: &str) -> String {
    match name {
        "hp" => "HP".to_string(),
        "attack" => "ATK".to_string(),
        "defense" => "DEF".to_string(),
        "special-attack" => "SP.ATK".to_string(),
        "special-defense" => "SP.DEF".to_string(),
        "speed" => "SPD".to_string(),
        _ => name.to_ascii_uppercase(),
    }
}

pub fn spinner(tick: u64) -> &'static str {
    SPINNER[(tick as usize) % SPINNER.len()]
}

pub fn panel_border_style() -> BorderStyle {
    BorderStyle {
        borders: Borders::ALL,
        style: Style::default().fg(TEXT_DIM),
        focused_style: Some(Style::default().fg(ACCENT_TEAL)),
    }
}

pub fn panel_block<'a>(title: impl Into<ratatui::text::Line<'a>>, is_focused: bool) -> Block<'a> {
    let border = panel_border_style();
    Block::default()
        .title(title)
        .borders(border.borders)
        .border_style(border.style_for_focus(is_focused))
        .border_type(BorderType::Rounded)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
}
