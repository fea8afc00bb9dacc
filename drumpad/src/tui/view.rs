use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Gauge, Paragraph};
use ratatui::Frame;

use super::grid::draw_pad_grid;
use super::mode::TuiState;
use crate::shared::DisplayState;

const TITLE: &str = "drumpad";
const HELP: &str = "click or 123 qwe asd zxc vbn · space stops · [ ] volume · esc quits";

pub fn render(frame: &mut Frame, area: Rect, state: &DisplayState, ts: &mut TuiState) {
    let loading_height = if state.loading_percent.is_some() { 3 } else { 0 };
    let [title, loading, grid, status, help] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(loading_height),
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    frame.render_widget(
        Paragraph::new(TITLE).style(Style::default().add_modifier(Modifier::BOLD)).centered(),
        title,
    );
    if let Some(percent) = state.loading_percent {
        draw_loading(frame, loading, percent);
    }

    ts.grid.update(grid, state.pads.len());
    draw_pad_grid(frame, &ts.grid, &state.pads);

    frame.render_widget(Paragraph::new(state.status.as_str()).centered(), status);
    frame.render_widget(Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)).centered(), help);
}

fn draw_loading(frame: &mut Frame, area: Rect, percent: u8) {
    // 80% of the width, centred
    let [_, bar, _] = Layout::horizontal([
        Constraint::Percentage(10),
        Constraint::Percentage(80),
        Constraint::Percentage(10),
    ])
    .areas(area);
    let gauge = Gauge::default()
        .block(Block::bordered())
        .gauge_style(Style::default().fg(Color::Rgb(0x4d, 0x96, 0xff)))
        .percent(u16::from(percent.min(100)))
        .label(format!("Loading sounds… {percent}%"));
    frame.render_widget(gauge, bar);
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::shared::PadView;

    fn screen_text(state: &DisplayState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
        let mut ts = TuiState::default();
        terminal.draw(|f| render(f, f.area(), state, &mut ts)).unwrap();
        terminal.backend().buffer().content().iter().map(|c| c.symbol()).collect()
    }

    fn pads() -> Vec<PadView> {
        ["Kick", "Snare", "Hat"]
            .iter()
            .map(|label| PadView {
                label: label.to_string(),
                color: "#ff6b6b".into(),
                loading: false,
                pressed: false,
            })
            .collect()
    }

    #[test]
    fn loading_bar_shows_percent() {
        let text = screen_text(&DisplayState { pads: pads(), loading_percent: Some(33), status: String::new() });
        assert!(text.contains("33%"));
        assert!(text.contains("Snare"));
    }

    #[test]
    fn loading_bar_gone_when_done() {
        let status = "Kick 80%".to_string();
        let text = screen_text(&DisplayState { pads: pads(), loading_percent: None, status });
        assert!(!text.contains("Loading"));
        assert!(text.contains("Kick 80%"));
    }
}
