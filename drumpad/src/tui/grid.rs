use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

use crate::shared::{PadView, NUM_COLUMNS};

const SIDE_PADDING: u16 = 2; // on each side
const COLUMN_GAP: u16 = 1;
const MIN_PAD_HEIGHT: u16 = 3; // border + label + border

// Pad placement for a given width. Sizes only change with the width; moving
// the area just moves the origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GridLayout {
    area: Rect,
    pad_width: u16,
    pad_height: u16,
    pad_count: usize,
}

impl GridLayout {
    pub fn new(area: Rect, pad_count: usize) -> Self {
        let pad_width = pad_width_for(area.width);
        Self {
            area,
            pad_width,
            // terminal cells are about twice as tall as wide
            pad_height: (pad_width / 2).max(MIN_PAD_HEIGHT),
            pad_count,
        }
    }

    // returns true when the pad size had to be recomputed
    pub fn update(&mut self, area: Rect, pad_count: usize) -> bool {
        if area.width != self.area.width {
            *self = Self::new(area, pad_count);
            return true;
        }
        self.area = area;
        self.pad_count = pad_count;
        false
    }

    pub fn pad_size(&self) -> (u16, u16) {
        (self.pad_width, self.pad_height)
    }

    // clipped to the grid area, so pads that don't fit come back empty
    pub fn pad_rect(&self, index: usize) -> Rect {
        let col = (index % NUM_COLUMNS) as u16;
        let row = (index / NUM_COLUMNS) as u16;
        let x = self.area.x + SIDE_PADDING + col * (self.pad_width + COLUMN_GAP);
        let y = self.area.y.saturating_add(row.saturating_mul(self.pad_height));
        Rect::new(x, y, self.pad_width, self.pad_height).intersection(self.area)
    }

    pub fn hit_test(&self, column: u16, row: u16) -> Option<usize> {
        (0..self.pad_count).find(|&i| {
            let r = self.pad_rect(i);
            column >= r.x && column < r.x + r.width && row >= r.y && row < r.y + r.height
        })
    }
}

fn pad_width_for(width: u16) -> u16 {
    let cols = NUM_COLUMNS as u16;
    let chrome = SIDE_PADDING * 2 + COLUMN_GAP * (cols - 1);
    width.saturating_sub(chrome) / cols
}

pub fn draw_pad_grid(frame: &mut Frame, layout: &GridLayout, pads: &[PadView]) {
    for (idx, pad) in pads.iter().enumerate() {
        let cell = layout.pad_rect(idx);
        if cell.is_empty() {
            continue;
        }
        let color = pad.color.parse::<Color>().unwrap_or(Color::Magenta);
        let style = if pad.loading {
            Style::default().fg(Color::DarkGray)
        } else if pad.pressed {
            Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        };

        let label = if pad.loading {
            format!("{} ⏳", pad.label)
        } else {
            pad.label.clone()
        };
        let block = Block::bordered().border_style(style).style(style);
        let inner = block.inner(cell);
        frame.render_widget(block, cell);

        // vertically centre the label inside the border
        let label_row = Rect {
            y: inner.y + inner.height / 2,
            height: inner.height.min(1),
            ..inner
        };
        frame.render_widget(Paragraph::new(label).style(style).centered(), label_row);
    }
}
