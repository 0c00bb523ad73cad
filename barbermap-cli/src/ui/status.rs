//! Header/status widget: query box, viewport center, and activity line.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use barbermap::shop::SearchState;

/// Widget displaying the query, the viewport center, and a status line.
pub struct StatusWidget<'a> {
    state: &'a SearchState,
    message: &'a str,
}

impl<'a> StatusWidget<'a> {
    pub fn new(state: &'a SearchState, message: &'a str) -> Self {
        Self { state, message }
    }
}

impl Widget for StatusWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" barbermap ");

        let query_line = Line::from(vec![
            Span::styled("Search: ", Style::default().fg(Color::DarkGray)),
            Span::styled(&self.state.query, Style::default().fg(Color::White)),
            Span::styled("▏", Style::default().fg(Color::Cyan)),
        ]);

        let center_line = Line::from(vec![
            Span::styled("Center: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                self.state.coordinates.to_string(),
                Style::default().fg(Color::Cyan),
            ),
            if self.state.loading {
                Span::styled("  searching...", Style::default().fg(Color::Yellow))
            } else {
                Span::raw("")
            },
        ]);

        let status_line = Line::from(vec![
            Span::styled(self.message, Style::default().fg(Color::Green)),
        ]);

        let help_line = Line::from(vec![Span::styled(
            "type to search  ↑/↓ select  Enter recenter  Ctrl+S snapshot  Esc quit",
            Style::default().fg(Color::DarkGray),
        )]);

        let paragraph =
            Paragraph::new(vec![query_line, center_line, status_line, help_line]).block(block);
        paragraph.render(area, buf);
    }
}
