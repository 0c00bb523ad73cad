//! Scrollable result list widget.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, StatefulWidget, Widget},
};

use barbermap::shop::Shop;

/// Widget displaying the current result set with a selection cursor.
pub struct ShopListWidget<'a> {
    shops: &'a [Shop],
}

impl<'a> ShopListWidget<'a> {
    pub fn new(shops: &'a [Shop]) -> Self {
        Self { shops }
    }

    fn item(shop: &Shop) -> ListItem<'_> {
        let rating = if shop.rating > 0.0 {
            format!(" {:.1}★", shop.rating)
        } else {
            String::new()
        };

        let mut spans = vec![
            Span::styled(&shop.name, Style::default().fg(Color::White)),
            Span::styled(rating, Style::default().fg(Color::Yellow)),
        ];
        if !shop.address.is_empty() {
            spans.push(Span::styled(
                format!("  {}", shop.address),
                Style::default().fg(Color::DarkGray),
            ));
        }

        ListItem::new(Line::from(spans))
    }
}

impl StatefulWidget for ShopListWidget<'_> {
    type State = ListState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut ListState) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Barbershops ({}) ", self.shops.len()));

        if self.shops.is_empty() {
            let empty = List::new([ListItem::new(Line::from(Span::styled(
                "  No results - move the map or change the query",
                Style::default().fg(Color::DarkGray),
            )))])
            .block(block);
            Widget::render(empty, area, buf);
            return;
        }

        let items: Vec<ListItem> = self.shops.iter().map(Self::item).collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("» ");

        StatefulWidget::render(list, area, buf, state);
    }
}
