//! Bitmap font re-export from `retro-types::bitmap_font`.

pub use retro_types::bitmap_font::*;
