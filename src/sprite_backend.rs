//! Crossterm backend wrapper that emits kitty graphics after each ratatui draw.
//!
//! Components place sprites with [`place_sprite`] during render, one per cell
//! position. The backend writes them once the cell buffer is flushed, and
//! deletes them on a later frame if nothing places them again.

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use crossterm::{cursor::MoveTo, queue, style::Print};
use ratatui::backend::{Backend, ClearType, CrosstermBackend, WindowSize};
use ratatui::buffer::Cell;
use ratatui::layout::{Position, Size};

const DELETE_ALL_IMAGES: &str = "\x1b_Ga=d,d=a\x1b\\";

type Placements = Vec<((u16, u16), String)>;

/// Kitty sequences keyed by their top-left cell. Placing twice at one cell keeps the latest.
#[derive(Default, Debug, Clone)]
pub struct SpriteRegistry {
    sprites: HashMap<(u16, u16), String>,
}

impl SpriteRegistry {
    pub fn set(&mut self, x: u16, y: u16, sequence: String) {
        self.sprites.insert((x, y), sequence);
    }

    pub fn clear(&mut self) {
        self.sprites.clear();
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    /// Placements in row-major order, so equal frames compare equal.
    pub fn entries(&self) -> Placements {
        let mut entries: Placements = self
            .sprites
            .iter()
            .map(|(pos, sequence)| (*pos, sequence.clone()))
            .collect();
        entries.sort_by_key(|((x, y), _)| (*y, *x));
        entries
    }
}

static REGISTRY: OnceLock<Arc<Mutex<SpriteRegistry>>> = OnceLock::new();

pub fn sprite_registry() -> Arc<Mutex<SpriteRegistry>> {
    REGISTRY
        .get_or_init(|| Arc::new(Mutex::new(SpriteRegistry::default())))
        .clone()
}

fn lock(registry: &Mutex<SpriteRegistry>) -> MutexGuard<'_, SpriteRegistry> {
    // A panic while holding the lock leaves plain data behind; keep using it.
    registry
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub fn place_sprite(x: u16, y: u16, sequence: String) {
    let registry = sprite_registry();
    lock(&registry).set(x, y, sequence);
}

pub fn clear_sprites() {
    let registry = sprite_registry();
    lock(&registry).clear();
}

#[derive(Debug, Clone)]
pub struct SpriteBackend<W: Write> {
    inner: CrosstermBackend<W>,
    registry: Arc<Mutex<SpriteRegistry>>,
    shown: Placements,
}

impl<W: Write> SpriteBackend<W> {
    pub fn new(writer: W, registry: Arc<Mutex<SpriteRegistry>>) -> Self {
        Self {
            inner: CrosstermBackend::new(writer),
            registry,
            shown: Vec::new(),
        }
    }
}

impl<W: Write> Backend for SpriteBackend<W> {
    fn draw<'a, I>(&mut self, content: I) -> io::Result<()>
    where
        I: Iterator<Item = (u16, u16, &'a Cell)>,
    {
        self.inner.draw(content)?;
        let wanted = lock(&self.registry).entries();
        if wanted == self.shown {
            return Ok(());
        }
        if !self.shown.is_empty() {
            queue!(self.inner, Print(DELETE_ALL_IMAGES))?;
        }
        for ((x, y), sequence) in &wanted {
            queue!(self.inner, MoveTo(*x, *y), Print(sequence))?;
        }
        self.shown = wanted;
        Ok(())
    }

    fn append_lines(&mut self, n: u16) -> io::Result<()> {
        self.inner.append_lines(n)
    }

    fn hide_cursor(&mut self) -> io::Result<()> {
        self.inner.hide_cursor()
    }

    fn show_cursor(&mut self) -> io::Result<()> {
        self.inner.show_cursor()
    }

    fn get_cursor_position(&mut self) -> io::Result<Position> {
        self.inner.get_cursor_position()
    }

    fn set_cursor_position<P: Into<Position>>(&mut self, position: P) -> io::Result<()> {
        self.inner.set_cursor_position(position)
    }

    fn clear(&mut self) -> io::Result<()> {
        self.shown.clear();
        self.inner.clear()
    }

    fn clear_region(&mut self, clear_type: ClearType) -> io::Result<()> {
        self.inner.clear_region(clear_type)
    }

    fn size(&self) -> io::Result<Size> {
        self.inner.size()
    }

    fn window_size(&mut self) -> io::Result<WindowSize> {
        self.inner.window_size()
    }

    fn flush(&mut self) -> io::Result<()> {
        Backend::flush(&mut self.inner)
    }
}

impl<W: Write> Write for SpriteBackend<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Write::flush(&mut self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn written(backend: &mut SpriteBackend<Vec<u8>>) -> String {
        let bytes = std::mem::take(backend.inner.writer_mut());
        String::from_utf8(bytes).expect("utf8")
    }

    #[test]
    fn registry_keeps_one_sprite_per_cell() {
        let mut registry = SpriteRegistry::default();
        registry.set(10, 2, "a".into());
        registry.set(1, 2, "b".into());
        registry.set(10, 2, "c".into());
        registry.set(4, 0, "d".into());
        assert_eq!(registry.len(), 3);
        assert_eq!(
            registry.entries(),
            vec![
                ((4, 0), "d".to_string()),
                ((1, 2), "b".to_string()),
                ((10, 2), "c".to_string()),
            ]
        );
        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn backend_draws_every_placement_once() {
        let registry = Arc::new(Mutex::new(SpriteRegistry::default()));
        let mut backend = SpriteBackend::new(Vec::<u8>::new(), registry.clone());
        lock(&registry).set(0, 0, "<card-1>".into());
        lock(&registry).set(20, 0, "<card-2>".into());

        backend.draw(std::iter::empty()).expect("draw");
        let first = written(&mut backend);
        assert!(first.contains("<card-1>") && first.contains("<card-2>"));
        assert!(!first.contains(DELETE_ALL_IMAGES));

        // Same placements next frame: nothing is re-sent.
        backend.draw(std::iter::empty()).expect("draw");
        assert!(!written(&mut backend).contains("<card"));
    }

    #[test]
    fn backend_deletes_images_when_registry_empties() {
        let registry = Arc::new(Mutex::new(SpriteRegistry::default()));
        let mut backend = SpriteBackend::new(Vec::<u8>::new(), registry.clone());
        lock(&registry).set(0, 0, "<img>".into());
        backend.draw(std::iter::empty()).expect("draw");
        written(&mut backend);

        lock(&registry).clear();
        backend.draw(std::iter::empty()).expect("draw");
        assert!(written(&mut backend).contains(DELETE_ALL_IMAGES));
        assert!(backend.shown.is_empty());
    }
}
