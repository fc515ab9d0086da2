// ============================================================================
// Dashboard rendering
// ============================================================================
// Draws the main screen: header, holdings table, allocation chart, footer.
// The sell dialog renders as an overlay on top of the dashboard.
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{App, Screen};
use crate::models::format_fixed2;
use crate::ui::{chart, sell_dialog};

/// Draws the whole interface, routed by the active screen.
pub fn render(frame: &mut Frame, app: &App) {
    render_dashboard(frame, app);

    if app.current_screen == Screen::SellDialog {
        if let Some(dialog) = app.sell_dialog.as_ref() {
            sell_dialog::render_sell_dialog(frame, dialog, frame.size());
        }
    }
}

fn render_dashboard(frame: &mut Frame, app: &App) {
    let chunks = create_layout(frame.size());

    render_header(frame, chunks[0]);
    render_holdings(frame, app, chunks[1]);

    let series = app.allocation();
    let selected = app.selected_holding().map(|h| h.name.clone());
    chart::render_allocation_chart(frame, &series, selected.as_deref(), chunks[2]);

    render_footer(frame, app, chunks[3]);
}

/// Header, holdings, chart, footer.
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(7),
            Constraint::Length(3),
        ])
        .split(area)
        .to_vec()
}

fn render_header(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" FolioView ")
        .title_alignment(Alignment::Center);

    let text = vec![Line::from(Span::styled(
        "Portfolio Dashboard",
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    ))];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_holdings(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Holdings ");

    if app.holdings.is_empty() {
        let text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No active positions",
                Style::default().fg(Color::Gray),
            )),
        ];
        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .holdings
        .iter()
        .enumerate()
        .map(|(index, holding)| {
            let line = format!(
                " {:<20} {:<10} {:<12} {:>10} {:>14}",
                truncate(&holding.name, 20),
                holding.symbol,
                holding.asset_type.label(),
                format_fixed2(holding.quantity),
                format!("${}", format_fixed2(holding.market_value())),
            );

            let mut item = ListItem::new(line);
            if index == app.selected_index {
                item = item.style(
                    Style::default()
                        .add_modifier(Modifier::BOLD)
                        .add_modifier(Modifier::REVERSED),
                );
            }
            item
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let line = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled(
                "Press ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " again to quit, any other key to cancel",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else if let Some((message, tone)) = app.status_message.as_ref() {
        Line::from(Span::styled(
            message.clone(),
            sell_dialog::tone_style(*tone).add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(vec![
            Span::styled("[q]", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::raw(" Quit  "),
            Span::styled(
                "[↑↓ / j k]",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" Navigate  "),
            Span::styled("[s]", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
            Span::raw(" Sell"),
        ])
    };

    let paragraph = Paragraph::new(vec![line])
        .block(block)
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn truncate(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        let cut: String = name.chars().take(max - 1).collect();
        format!("{}…", cut)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetType, Holding};
    use ratatui::{backend::TestBackend, Terminal};

    fn sample_app() -> App {
        App::with_holdings(
            "http://localhost:5000".to_string(),
            vec![
                Holding::new(1, "Apple Inc.", "AAPL", AssetType::Stock, 10.0, 250.0),
                Holding::new(2, "Gold", "XAU/USD", AssetType::Commodity, 2.0, 2000.0),
            ],
        )
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Gold", 20), "Gold");
        assert_eq!(truncate("A very long holding name", 10), "A very lo…");
    }

    #[test]
    fn test_render_dashboard_smoke() {
        let app = sample_app();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
    }

    #[test]
    fn test_render_with_sell_dialog_overlay() {
        let mut app = sample_app();
        app.open_sell_dialog().unwrap();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
    }

    #[test]
    fn test_render_empty_portfolio() {
        let app = App::new("http://localhost:5000".to_string());
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(frame, &app)).unwrap();
    }
}
