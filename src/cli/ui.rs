use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::alerts::synthesizer::fmt_currency;
use crate::alerts::{AlertView, RefreshState, Severity};
use crate::cli::state::App;

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.size();
    let view = app.view();

    // header | alerts | status bar
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(6), Constraint::Length(3)])
        .split(size);

    draw_header(f, root[0], app, &view);

    if view.state == RefreshState::Error {
        draw_error(f, root[1], &view);
    } else {
        draw_alerts(f, root[1], app, &view);
    }

    let status = Paragraph::new(app.status.clone()).block(Block::default().borders(Borders::ALL));
    f.render_widget(status, root[2]);

    if app.show_help {
        let area = center_rect(size, 56, 14);
        f.render_widget(Clear, area);
        draw_help(f, area);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App, view: &AlertView) {
    let (label, color) = match view.state {
        RefreshState::Idle => ("idle", Color::DarkGray),
        RefreshState::Loading => ("loading…", Color::Yellow),
        RefreshState::Ready => ("up to date", Color::Green),
        RefreshState::Error => ("error", Color::Red),
    };
    let line = Line::from(vec![
        Span::styled(format!("{}", app.scope), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(label, Style::default().fg(color)),
    ]);
    let header = Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("Budget Alerts"));
    f.render_widget(header, area);
}

fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Critical => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        Severity::Danger => Style::default().fg(Color::LightRed),
        Severity::Warning => Style::default().fg(Color::Yellow),
        Severity::None => Style::default(),
    }
}

fn draw_alerts(f: &mut Frame, area: Rect, app: &mut App, view: &AlertView) {
    let mut items: Vec<ListItem> = view
        .alerts
        .iter()
        .map(|a| {
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", a.icon)),
                Span::styled(a.message.clone(), severity_style(a.severity)),
                Span::styled(
                    format!("  ({} of {})", fmt_currency(a.spent), fmt_currency(a.limit)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    if items.is_empty() {
        let text = match view.state {
            RefreshState::Loading => "Loading budgets…",
            _ => "No budget alerts. Spending is on track.",
        };
        items.push(ListItem::new(Line::from(Span::raw(text))));
        app.sel.select(None);
    } else if app.sel.selected().map_or(true, |i| i >= view.alerts.len()) {
        app.sel.select(Some(0));
    }

    let title = match view.overflow_label() {
        Some(more) => format!("Alerts  (↑/↓ select, d dismiss)  {more}"),
        None => "Alerts  (↑/↓ select, d dismiss)".to_string(),
    };

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    f.render_stateful_widget(list, area, &mut app.sel);
}

fn draw_error(f: &mut Frame, area: Rect, view: &AlertView) {
    let text = format!(
        "Budget alerts are unavailable.\n\n{}\n\nPress e to retry.",
        view.error_message.as_deref().unwrap_or("Unknown error")
    );
    let p = Paragraph::new(text)
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Error"));
    f.render_widget(p, area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let help_text = [
        "Keys:",
        "  ←/→      : Previous / next month",
        "  t        : Jump to the current month",
        "  ↑/↓      : Select alert",
        "  d / Del  : Dismiss selected alert",
        "  r        : Refresh",
        "  e        : Retry after an error",
        "  ?        : Toggle this help",
        "  q        : Quit",
        "",
        "Dismissed alerts come back when they get worse,",
        "and all of them come back in another month.",
    ]
    .join("\n");

    let p = Paragraph::new(help_text)
        .block(Block::default().borders(Borders::ALL).title("Help & Keybindings"));
    f.render_widget(p, area);
}

fn center_rect(rect: Rect, w: u16, h: u16) -> Rect {
    let x = rect.x + rect.width.saturating_sub(w) / 2;
    let y = rect.y + rect.height.saturating_sub(h) / 2;
    Rect { x, y, width: w.min(rect.width), height: h.min(rect.height) }
}
