// ============================================================================
// Sell dialog
// ============================================================================
// Centered modal overlay for selling the selected holding. Populated
// synchronously when opened; the price input and status line update once the
// background price lookup settles.
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{SellDialog, SellField, Tone};

/// Style of a status-line tone.
pub fn tone_style(tone: Tone) -> Style {
    let color = match tone {
        Tone::Muted => Color::DarkGray,
        Tone::Success => Color::Green,
        Tone::Warning => Color::Yellow,
        Tone::Danger => Color::Red,
    };
    Style::default().fg(color)
}

/// Draws the sell dialog centered over the current screen.
pub fn render_sell_dialog(frame: &mut Frame, dialog: &SellDialog, area: Rect) {
    let popup = centered_rect(area, 54, 12);
    if popup.width == 0 || popup.height == 0 {
        return;
    }

    // Clear whatever the dashboard drew underneath
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Sell Asset ")
        .title_alignment(Alignment::Center);

    let text = vec![
        Line::from(Span::styled(
            dialog.asset_name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{}  ({})", dialog.symbol, dialog.asset_type.label()),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(format!("Max quantity: {}", dialog.max_quantity_text())),
        input_line(
            "Quantity",
            &dialog.quantity_input,
            dialog.focus == SellField::Quantity,
            false,
        ),
        input_line(
            "Price",
            &dialog.price_input,
            dialog.focus == SellField::Price,
            dialog.price_locked,
        ),
        Line::from(Span::styled(
            dialog.status.text(),
            tone_style(dialog.status.tone()),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("[Tab]", Style::default().fg(Color::Yellow)),
            Span::raw(" Field  "),
            Span::styled("[Enter]", Style::default().fg(Color::Green)),
            Span::raw(" Sell  "),
            Span::styled("[Esc]", Style::default().fg(Color::Red)),
            Span::raw(" Cancel"),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Left);
    frame.render_widget(paragraph, popup);
}

/// One labeled input row with a focus cursor and a lock marker.
fn input_line<'a>(label: &'a str, value: &'a str, focused: bool, locked: bool) -> Line<'a> {
    let mut spans = vec![
        Span::styled(
            format!("{:<9}: ", label),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw(value),
    ];

    if focused && !locked {
        spans.push(Span::styled(
            "█",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::SLOW_BLINK),
        ));
    }
    if locked {
        spans.push(Span::styled(
            "  (auto)",
            Style::default().fg(Color::DarkGray),
        ));
    }

    Line::from(spans)
}

/// Centers a fixed-size rect inside `area`, clamped to its bounds.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::App;
    use crate::models::{AssetType, Holding};
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_tone_styles_are_distinct() {
        assert_eq!(tone_style(Tone::Muted).fg, Some(Color::DarkGray));
        assert_eq!(tone_style(Tone::Success).fg, Some(Color::Green));
        assert_eq!(tone_style(Tone::Warning).fg, Some(Color::Yellow));
        assert_eq!(tone_style(Tone::Danger).fg, Some(Color::Red));
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 6);
        let popup = centered_rect(area, 54, 12);
        assert!(popup.width <= area.width);
        assert!(popup.height <= area.height);
    }

    #[test]
    fn test_render_smoke() {
        let mut app = App::with_holdings(
            "http://localhost:5000".to_string(),
            vec![Holding::new(1, "Gold", "XAU/USD", AssetType::Commodity, 5.0, 2000.0)],
        );
        app.open_sell_dialog().unwrap();

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.size();
                render_sell_dialog(frame, app.sell_dialog.as_ref().unwrap(), area);
            })
            .unwrap();
    }
}
