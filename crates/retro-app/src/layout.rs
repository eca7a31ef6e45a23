//! Screen geometry shared by the renderer and pointer hit-testing.

use retro_core::config::RetroConfig;

pub const TOP_BAR_H: u32 = 48;
pub const FOOTER_H: u32 = 48;
pub const GRID_PAD: u32 = 24;
pub const GRID_GAP: u32 = 16;
pub const CARD_H: u32 = 100;
pub const POWER_RADIUS: u16 = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && py >= self.y && px < self.x + self.w as i32 && py < self.y + self.h as i32
    }
}

/// Geometry for one window size and grid width.
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub columns: usize,
}

impl Layout {
    pub fn new(config: &RetroConfig, columns: usize) -> Self {
        Self {
            width: config.screen_width,
            height: config.screen_height,
            columns: columns.max(1),
        }
    }

    /// Centre of the power button.
    pub fn power_center(&self) -> (i32, i32) {
        (self.width as i32 / 2, self.height as i32 / 2 - 24)
    }

    pub fn hits_power(&self, x: i32, y: i32) -> bool {
        let (cx, cy) = self.power_center();
        let (dx, dy) = (x - cx, y - cy);
        let r = POWER_RADIUS as i32;
        dx * dx + dy * dy <= r * r
    }

    pub fn card_w(&self) -> u32 {
        let cols = self.columns as u32;
        let spare = self
            .width
            .saturating_sub(2 * GRID_PAD + (cols - 1) * GRID_GAP);
        (spare / cols).max(1)
    }

    fn grid_top(&self) -> i32 {
        (TOP_BAR_H + GRID_PAD) as i32
    }

    /// Card rows that fit between the top bar and the footer.
    pub fn visible_rows(&self) -> usize {
        let area = self
            .height
            .saturating_sub(TOP_BAR_H + FOOTER_H + 2 * GRID_PAD);
        (((area + GRID_GAP) / (CARD_H + GRID_GAP)) as usize).max(1)
    }

    /// First visible row: the grid scrolls just enough to show `selected`.
    pub fn first_row(&self, selected: usize) -> usize {
        let row = selected / self.columns;
        (row + 1).saturating_sub(self.visible_rows())
    }

    /// On-screen rectangle of card `index`, if scrolled into view.
    pub fn card_rect(&self, index: usize, selected: usize) -> Option<Rect> {
        let first = self.first_row(selected);
        let row = index / self.columns;
        if row < first || row >= first + self.visible_rows() {
            return None;
        }
        let col = (index % self.columns) as u32;
        let w = self.card_w();
        Some(Rect::new(
            (GRID_PAD + col * (w + GRID_GAP)) as i32,
            self.grid_top() + ((row - first) as u32 * (CARD_H + GRID_GAP)) as i32,
            w,
            CARD_H,
        ))
    }

    /// Card under the pointer, if any.
    pub fn card_at(&self, x: i32, y: i32, selected: usize, len: usize) -> Option<usize> {
        let first = self.first_row(selected) * self.columns;
        let last = (first + self.visible_rows() * self.columns).min(len);
        (first..last).find(|&i| {
            self.card_rect(i, selected)
                .is_some_and(|r| r.contains(x, y))
        })
    }

    /// The `[ESC] EXIT` button in the game header.
    pub fn game_exit(&self) -> Rect {
        Rect::new(self.width as i32 - 112, 8, 100, 24)
    }

    /// `[ESC] BACK` and `PLAY`/`PAUSE` on the radio panel.
    pub fn radio_buttons(&self) -> (Rect, Rect) {
        let cx = self.width as i32 / 2;
        let y = self.height as i32 / 2 + 72;
        (Rect::new(cx - 164, y, 152, 32), Rect::new(cx + 12, y, 152, 32))
    }

    /// The `[ESC] TO EXIT` label in the terminal header.
    pub fn chat_exit(&self) -> Rect {
        Rect::new(self.width as i32 - 136, 20, 120, 24)
    }
}
