//! Decoded sprite images and the kitty graphics escape sequences that draw them.

use base64::{engine::general_purpose, Engine as _};
use image::GenericImageView;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Terminal cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 2.0;
const CHUNK_SIZE: usize = 4096;
const PNG_FORMAT: u32 = 100;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpriteData {
    /// Base64 of the original PNG bytes.
    pub payload: String,
    pub width: u32,
    pub height: u32,
}

impl SpriteData {
    /// Largest `(cols, rows)` box that keeps the image ratio inside the given cell budget.
    pub fn fit(&self, max_cols: u16, max_rows: u16) -> (u16, u16) {
        if max_cols == 0 || max_rows == 0 || self.height == 0 {
            return (max_cols, max_rows);
        }
        let image_ratio = self.width as f32 / self.height as f32;
        let cols_for_max_rows = image_ratio * max_rows as f32 * CELL_ASPECT;
        if cols_for_max_rows <= max_cols as f32 {
            let cols = cols_for_max_rows.max(1.0).round() as u16;
            return (cols.max(1), max_rows);
        }
        let rows_for_max_cols = max_cols as f32 / (image_ratio * CELL_ASPECT);
        let rows = rows_for_max_cols.max(1.0).round() as u16;
        (max_cols, rows.clamp(1, max_rows))
    }
}

pub fn decode_sprite(bytes: &[u8]) -> Result<SpriteData, ApiError> {
    let image = image::load_from_memory(bytes).map_err(|err| ApiError::Image(err.to_string()))?;
    let (width, height) = image.dimensions();
    Ok(SpriteData {
        payload: general_purpose::STANDARD.encode(bytes),
        width,
        height,
    })
}

pub fn kitty_sequence(sprite: &SpriteData, cols: u16, rows: u16) -> String {
    let payload = sprite.payload.as_bytes();
    let total_chunks = payload.len().div_ceil(CHUNK_SIZE);
    let mut sequences = String::new();

    // base64 output is ASCII, so every chunk boundary is a char boundary.
    for (index, chunk) in payload.chunks(CHUNK_SIZE).enumerate() {
        let more = u8::from(index + 1 < total_chunks);
        let chunk = String::from_utf8_lossy(chunk);
        if index == 0 {
            let mut params = format!(
                "f={PNG_FORMAT},s={},v={},a=T,t=d",
                sprite.width, sprite.height
            );
            if cols > 0 {
                params.push_str(&format!(",c={cols}"));
            }
            if rows > 0 {
                params.push_str(&format!(",r={rows}"));
            }
            sequences.push_str(&format!("\x1b_G{params},m={more};{chunk}\x1b\\"));
        } else {
            sequences.push_str(&format!("\x1b_Gm={more};{chunk}\x1b\\"));
        }
    }
    sequences
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprite(width: u32, height: u32, payload_len: usize) -> SpriteData {
        SpriteData {
            payload: "A".repeat(payload_len),
            width,
            height,
        }
    }

    #[test]
    fn fit_square_sprite_is_bounded_by_rows() {
        // 96x96 in a 40x10 box: 10 rows need 20 columns.
        assert_eq!(sprite(96, 96, 4).fit(40, 10), (20, 10));
    }

    #[test]
    fn fit_wide_sprite_is_bounded_by_columns() {
        assert_eq!(sprite(400, 100, 4).fit(16, 10), (16, 2));
    }

    #[test]
    fn fit_passes_through_empty_boxes() {
        assert_eq!(sprite(96, 96, 4).fit(0, 10), (0, 10));
    }

    #[test]
    fn kitty_sequence_chunks_large_payloads() {
        let seq = kitty_sequence(&sprite(96, 96, CHUNK_SIZE + 10), 20, 10);
        assert!(seq.starts_with("\x1b_Gf=100,s=96,v=96,a=T,t=d,c=20,r=10,m=1;"));
        assert!(seq.contains("\x1b_Gm=0;"));
        assert_eq!(seq.matches("\x1b_G").count(), 2);
    }

    #[test]
    fn kitty_sequence_single_chunk_is_final() {
        let seq = kitty_sequence(&sprite(10, 10, 8), 0, 0);
        assert_eq!(seq, "\x1b_Gf=100,s=10,v=10,a=T,t=d,m=0;AAAAAAAA\x1b\\");
    }

    #[test]
    fn decode_rejects_non_images() {
        assert!(matches!(
            decode_sprite(b"definitely not a png"),
            Err(ApiError::Image(_))
        ));
    }
}
