// ============================================================================
// Allocation chart
// ============================================================================
// Renders the asset allocation as a proportional slice bar with a detail
// line for the highlighted slice and a legend. The legend is rebuilt from
// scratch on every frame, entries in series order.
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::models::{format_thousands, AllocationSeries, SliceColor};

fn to_color(color: SliceColor) -> Color {
    Color::Rgb(color.r, color.g, color.b)
}

/// Draws the allocation chart into `area`.
///
/// A degenerate surface (zero-sized rect) is silently skipped, and an empty
/// series renders an empty chart with an empty legend. Neither is an error.
pub fn render_allocation_chart(
    frame: &mut Frame,
    series: &AllocationSeries,
    selected: Option<&str>,
    area: Rect,
) {
    if area.width == 0 || area.height == 0 {
        return;
    }

    let title = if series.is_empty() {
        " Allocation ".to_string()
    } else {
        format!(" Allocation  (total ${}) ", format_thousands(series.total()))
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Slice bar
            Constraint::Length(1), // Detail line for the highlighted slice
            Constraint::Min(0),    // Legend
        ])
        .split(inner)
        .to_vec();

    let bar = Paragraph::new(slice_bar_line(series, chunks[0].width));
    frame.render_widget(bar, chunks[0]);

    if chunks.len() > 1 {
        if let Some(text) = detail_text(series, selected) {
            let detail = Paragraph::new(text).alignment(Alignment::Center);
            frame.render_widget(detail, chunks[1]);
        }
    }

    if chunks.len() > 2 {
        let legend = Paragraph::new(legend_line(series)).wrap(Wrap { trim: true });
        frame.render_widget(legend, chunks[2]);
    }
}

/// One bar of colored segments, width proportional to value, separated by
/// white dividers (the slice border).
fn slice_bar_line(series: &AllocationSeries, width: u16) -> Line<'static> {
    let widths = slice_widths(&series.values, width);
    if widths.is_empty() {
        return Line::default();
    }

    let mut spans = Vec::new();
    for (i, ((_, _, color), &w)) in series.entries().zip(&widths).enumerate() {
        if i > 0 {
            spans.push(Span::styled("│", Style::default().fg(Color::White)));
        }
        spans.push(Span::styled(
            "█".repeat(w as usize),
            Style::default().fg(to_color(color)),
        ));
    }
    Line::from(spans)
}

/// Splits `width` cells between slices proportionally to their values.
///
/// Separator cells (one per gap) are reserved up front; the remainder after
/// the proportional floor goes to the leftmost slices. Returns an empty vec
/// when there is nothing to draw (no values, non-positive total, no room).
fn slice_widths(values: &[f64], width: u16) -> Vec<u16> {
    let total: f64 = values.iter().filter(|v| v.is_finite()).sum();
    if values.is_empty() || total <= 0.0 {
        return Vec::new();
    }

    let separators = (values.len() - 1) as u16;
    if width <= separators {
        return Vec::new();
    }
    let available = width - separators;

    let mut widths: Vec<u16> = values
        .iter()
        .map(|v| ((v.max(0.0) / total) * f64::from(available)).floor() as u16)
        .collect();

    let mut leftover = available - widths.iter().sum::<u16>().min(available);
    for w in widths.iter_mut() {
        if leftover == 0 {
            break;
        }
        *w += 1;
        leftover -= 1;
    }

    widths
}

/// Tooltip analogue: `"<label>: <value>"` for the highlighted slice, with
/// thousands separators.
fn detail_text(series: &AllocationSeries, selected: Option<&str>) -> Option<String> {
    let selected = selected?;
    series
        .entries()
        .find(|(label, _, _)| *label == selected)
        .map(|(label, value, _)| format!("{}: {}", label, format_thousands(value)))
}

/// Legend line: one swatch + label per slice, series order, left to right.
fn legend_line(series: &AllocationSeries) -> Line<'static> {
    let mut spans = Vec::new();
    for (label, _, color) in series.entries() {
        spans.push(Span::styled("■ ", Style::default().fg(to_color(color))));
        spans.push(Span::raw(label.to_string()));
        spans.push(Span::raw("   "));
    }
    Line::from(spans)
}

// ============================================================================
// Tests
// ============================================================================
