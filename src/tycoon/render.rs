//! Idle Tycoon rendering.

use ratzilla::ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::format::format_money;

use super::view::{BusinessView, GameView};

/// Width of a business progress bar, in cells.
const BAR_WIDTH: usize = 12;

/// Spinner characters for a running business.
const SPINNER: &[char] = &['◐', '◓', '◑', '◒'];

pub fn render(view: &GameView, f: &mut Frame, area: Rect) {
    // Log panel on the right when wide enough (>= 80 cols)
    let (main_area, log_area) = if area.width >= 80 {
        let h_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(area);
        (h_chunks[0], Some(h_chunks[1]))
    } else {
        (area, None)
    };

    let upgrade_rows = view.upgrades.len().max(1) as u16 + 2;
    let prestige_rows = view.prestige_upgrades.len() as u16 + 3;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(4),
            Constraint::Length(upgrade_rows),
            Constraint::Length(prestige_rows),
        ])
        .split(main_area);

    render_header(view, f, chunks[0]);
    render_businesses(view, f, chunks[1]);
    render_upgrades(view, f, chunks[2]);
    render_prestige(view, f, chunks[3]);
    if let Some(log_area) = log_area {
        render_log(view, f, log_area);
    }
}

fn render_header(view: &GameView, f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(vec![
            Span::styled(
                view.money.as_str(),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  (this run {})", view.lifetime),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(Span::styled(
            "j/k select  b buy  m max  u unlock  h manager  r run  a-f upgrade  P prestige",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Idle Tycoon "),
    );
    f.render_widget(widget, area);
}

fn progress_bar(progress: f64) -> String {
    let filled = ((progress.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn business_line(b: &BusinessView, selected: bool) -> Line<'static> {
    let cursor = if selected { "▶ " } else { "  " };
    let cursor_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);

    if !b.unlocked {
        let style = if b.can_afford {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        return Line::from(vec![
            Span::styled(cursor, cursor_style),
            Span::styled(
                format!("{:<16} 🔒 open for {}", b.name, format_money(b.unlock_cost)),
                style,
            ),
        ]);
    }

    let indicator = if b.in_progress {
        let idx = (b.progress * SPINNER.len() as f64) as usize % SPINNER.len();
        SPINNER[idx]
    } else {
        ' '
    };
    let run_style = if b.in_progress {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let cost_style = if b.can_afford {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let cycle = match b.cycle_time {
        Some(t) if t < 60.0 => format!("{:.1}s", t),
        Some(t) => format!("{:.0}m", t / 60.0),
        None => "---".to_string(),
    };
    let manager = if b.has_manager {
        Span::styled(" ★mgr", Style::default().fg(Color::Magenta))
    } else {
        Span::styled(
            format!(" mgr {}", format_money(b.manager_cost)),
            Style::default().fg(Color::DarkGray),
        )
    };

    Line::from(vec![
        Span::styled(cursor, cursor_style),
        Span::styled(
            format!("{:<16} x{:<4} ", b.name, b.owned),
            Style::default().fg(Color::White),
        ),
        Span::styled(format!("{} {} ", indicator, progress_bar(b.progress)), run_style),
        Span::styled(format!("{:>6} ", cycle), run_style),
        Span::styled(format!("+{} ", format_money(b.payout)), run_style),
        Span::styled(format!("next {}", format_money(b.next_cost)), cost_style),
        manager,
    ])
}

fn render_businesses(view: &GameView, f: &mut Frame, area: Rect) {
    let items: Vec<ListItem> = view
        .businesses
        .iter()
        .map(|b| ListItem::new(business_line(b, view.selected == Some(b.id))))
        .collect();
    let widget = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(" Businesses "),
    );
    f.render_widget(widget, area);
}

fn render_upgrades(view: &GameView, f: &mut Frame, area: Rect) {
    let items: Vec<ListItem> = if view.upgrades.is_empty() {
        vec![ListItem::new(Span::styled(
            " (all purchased)",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        view.upgrades
            .iter()
            .enumerate()
            .map(|(slot, u)| {
                let key = (b'a' + slot as u8) as char;
                let style = if u.can_afford {
                    Style::default().fg(Color::White)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!(" {} ", key),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("{} - {} ({})", u.name, u.description, format_money(u.cost)),
                        style,
                    ),
                ]))
            })
            .collect()
    };
    let widget = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta))
            .title(" Upgrades "),
    );
    f.render_widget(widget, area);
}

fn render_prestige(view: &GameView, f: &mut Frame, area: Rect) {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!(" Angels {} (+{:.0}% profit)", view.prestige_total, view.prestige_bonus_pct),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("  P to claim +{}", view.available_award),
            if view.available_award > 0 {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            },
        ),
    ])];
    for (slot, u) in view.prestige_upgrades.iter().enumerate() {
        let style = if u.purchased {
            Style::default().fg(Color::Green)
        } else if u.can_afford {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mark = if u.purchased { "✓" } else { " " };
        lines.push(Line::from(Span::styled(
            format!(" {}{} {} - {} ({})", mark, slot + 1, u.name, u.description, u.cost),
            style,
        )));
    }
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Prestige "),
    );
    f.render_widget(widget, area);
}

fn render_log(view: &GameView, f: &mut Frame, area: Rect) {
    let visible_height = area.height.saturating_sub(2) as usize;

    // Newest first
    let log_lines: Vec<Line> = view
        .log
        .iter()
        .rev()
        .take(visible_height)
        .enumerate()
        .map(|(i, entry)| {
            let style = match (entry.is_important, i < 3) {
                (true, true) => Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
                (true, false) => Style::default().fg(Color::Yellow),
                (false, true) => Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
                (false, false) => Style::default().fg(Color::DarkGray),
            };
            Line::from(Span::styled(entry.text.as_str(), style))
        })
        .collect();

    let widget = Paragraph::new(log_lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Blue))
                .title(" Log "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}
