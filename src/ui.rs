use ratatui::{
    layout::{Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use crate::details::{EMPTY_PROMPT, PanelContent, UNAVAILABLE_PROMPT};
use crate::interaction::Tooltip;
use crate::map_draw;
use crate::state::{AppState, LoadStatus};

pub fn draw(f: &mut Frame, state: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(f.area());

    // Map
    let title = match state.status {
        LoadStatus::Loading => "World map (loading)".to_string(),
        LoadStatus::Ready => match state.controller.selected() {
            Some(region) => format!("World map: {}", region.label),
            None => format!("World map ({} regions)", state.controller.shapes().len()),
        },
        LoadStatus::Failed => "World map".to_string(),
    };
    map_draw::render(f, chunks[0], &title, state.controller.shapes());
    state.set_map_area(chunks[0].inner(Margin { horizontal: 1, vertical: 1 }));

    // Details
    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(5)])
        .split(chunks[1]);
    let details = Paragraph::new(panel_text(state.controller.panel()))
        .block(Block::default().borders(Borders::ALL).title("Itineraries"))
        .wrap(Wrap { trim: true });
    f.render_widget(details, right[0]);

    let help = Paragraph::new(AppState::HELP_TEXT)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, right[1]);

    draw_tooltip(f, state.map_area, state.controller.tooltip());
}

fn panel_text(panel: Option<&PanelContent>) -> Text<'static> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let Some(content) = panel else {
        return Text::from("Click a country to see its itineraries");
    };
    match content {
        PanelContent::Unavailable => Text::from(vec![
            Line::styled(content.header(), bold.fg(Color::Red)),
            Line::from(UNAVAILABLE_PROMPT),
        ]),
        PanelContent::Empty { label } => Text::from(vec![
            Line::styled(label.clone(), bold),
            Line::from(EMPTY_PROMPT),
        ]),
        PanelContent::Posts { cards, .. } => {
            let mut lines = vec![Line::styled(content.header(), bold), Line::default()];
            for card in cards {
                lines.push(Line::from(vec![
                    Span::styled(card.date.clone(), Style::default().fg(Color::DarkGray)),
                    Span::raw(" · "),
                    Span::styled(card.location.clone(), Style::default().fg(Color::DarkGray)),
                ]));
                lines.push(Line::styled(card.title.clone(), Style::default().fg(Color::Cyan)));
                lines.push(Line::from(card.summary.clone()));
                lines.push(Line::styled(card.url.clone(), Style::default().fg(Color::Blue)));
                lines.push(Line::default());
            }
            Text::from(lines)
        }
    }
}

/// Label plus one cell of padding each side.
fn tooltip_width(text: &str) -> u16 {
    u16::try_from(text.chars().count())
        .unwrap_or(u16::MAX)
        .saturating_add(2)
}

/// Tooltip position is relative to the map surface. Whatever falls off screen is clipped.
fn draw_tooltip(f: &mut Frame, surface: Rect, tooltip: &Tooltip) {
    if !tooltip.visible || tooltip.text.is_empty() {
        return;
    }
    let x = surface.x as f64 + tooltip.position.x;
    let y = surface.y as f64 + tooltip.position.y;
    if x < 0.0 || y < 0.0 {
        return;
    }
    let area = Rect::new(x as u16, y as u16, tooltip_width(&tooltip.text), 1).intersection(f.area());
    if area.is_empty() {
        return;
    }
    f.render_widget(Clear, area);
    let label = Paragraph::new(format!(" {} ", tooltip.text))
        .style(Style::default().fg(Color::Black).bg(Color::Yellow));
    f.render_widget(label, area);
}
