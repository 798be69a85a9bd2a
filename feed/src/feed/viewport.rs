/// Scroll geometry of the rendered list, in rows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// Total height of the rendered content
    pub scroll_height: u32,
    /// Offset of the first visible row
    pub scroll_top: u32,
    /// Height of the visible area
    pub offset_height: u32,
}

impl Viewport {
    /// Distance from the bottom of the visible area to the end of the content
    pub fn remaining(&self) -> u32 {
        self.scroll_height
            .saturating_sub(self.scroll_top.saturating_add(self.offset_height))
    }

    pub fn near_end(&self, threshold: u32) -> bool {
        self.remaining() < threshold
    }
}
