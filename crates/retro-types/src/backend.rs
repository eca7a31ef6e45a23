//! Backend trait definitions.
//!
//! Every platform implements these traits. The core framework dispatches all
//! I/O through trait boundaries -- it never calls platform-specific APIs.
//!
//! `RenderBackend` has a small required surface (clear, rect, text, present)
//! and a few shape helpers with default implementations built on top of it,
//! which backends can override with faster native calls.

pub use crate::color::Color;
use crate::error::Result;
use crate::input::InputEvent;

/// Width of one glyph cell of the built-in font at scale 1.
pub const GLYPH_CELL: u32 = 8;

/// Immediate-mode rendering backend.
pub trait RenderBackend {
    /// Clear the whole frame to `color`.
    fn clear(&mut self, color: Color) -> Result<()>;

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Color) -> Result<()>;

    /// Draw `text` with its top-left corner at (x, y). `font_size` is in
    /// pixels; the bitmap font scales in multiples of 8.
    fn draw_text(&mut self, text: &str, x: i32, y: i32, font_size: u16, color: Color)
    -> Result<()>;

    /// Present the frame.
    fn swap_buffers(&mut self) -> Result<()>;

    /// Release platform resources.
    fn shutdown(&mut self) -> Result<()>;

    /// Width in pixels of `text` at `font_size`.
    fn measure_text(&self, text: &str, font_size: u16) -> u32 {
        text.chars().count() as u32 * GLYPH_CELL * font_scale(font_size)
    }

    /// Rectangle outline drawn inside the given bounds.
    fn stroke_rect(
        &mut self,
        x: i32,
        y: i32,
        w: u32,
        h: u32,
        stroke_width: u16,
        color: Color,
    ) -> Result<()> {
        let s = (stroke_width as u32).min(w / 2).min(h / 2).max(1);
        self.fill_rect(x, y, w, s, color)?;
        self.fill_rect(x, y + h as i32 - s as i32, w, s, color)?;
        self.fill_rect(x, y, s, h, color)?;
        self.fill_rect(x + w as i32 - s as i32, y, s, h, color)
    }

    /// Filled circle, rasterised as horizontal spans.
    fn fill_circle(&mut self, cx: i32, cy: i32, radius: u16, color: Color) -> Result<()> {
        let r = radius as i32;
        for dy in -r..=r {
            let half = ((r * r - dy * dy) as f32).sqrt() as i32;
            self.fill_rect(cx - half, cy + dy, (half * 2 + 1) as u32, 1, color)?;
        }
        Ok(())
    }
}

/// Integer scale factor of the bitmap font for a pixel size.
pub fn font_scale(font_size: u16) -> u32 {
    if font_size >= 8 {
        (font_size / 8) as u32
    } else {
        1
    }
}

/// Input backend: drains platform events once per frame.
pub trait InputBackend {
    fn poll_events(&mut self) -> Vec<InputEvent>;
}

/// Audio output collaborator for the background music loop.
///
/// The core only ever asks for three things: loop the music, pause it, and
/// scale its output gain.
pub trait AudioBackend {
    /// Start (or resume) the looping background track.
    fn play(&mut self) -> Result<()>;

    /// Pause playback, keeping the loop position.
    fn pause(&mut self) -> Result<()>;

    /// Set the linear output gain (0.0 = silent, 1.0 = full scale).
    fn set_gain(&mut self, gain: f32) -> Result<()>;

    /// Return `true` if audio is currently playing.
    fn is_playing(&self) -> bool;
}
