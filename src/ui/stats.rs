use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(5),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let Some(view) = app.stats() else {
        frame.render_widget(Paragraph::new("No stats loaded."), chunks[1]);
        return;
    };
    let summary = &view.summary;

    let mut header = vec![
        Line::from(Span::styled(
            "GAME HISTORY",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(format!(
            "Games: {}   Average score: {}   Fastest: {}",
            summary.total_games,
            summary.average_label(),
            summary.fastest_label()
        )),
    ];
    if let Some(last) = view.last_score {
        header.push(Line::from(Span::styled(
            format!("Your last score: {last}"),
            Style::default().fg(Color::Green),
        )));
    }
    frame.render_widget(
        Paragraph::new(header).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Color::DarkGray),
        ),
        chunks[0],
    );

    let mut rows = vec![Line::from(Span::styled(
        format!("{:<12} {:>6} {:>8}", "Date", "Score", "Time"),
        Style::default().fg(Color::DarkGray).bold(),
    ))];
    rows.extend(summary.games.iter().rev().map(|game| {
        Line::from(format!(
            "{:<12} {:>6} {:>7}s",
            game.date, game.score, game.time_taken
        ))
    }));
    frame.render_widget(
        Paragraph::new(rows).block(Block::default().padding(Padding::horizontal(2))),
        chunks[1],
    );

    frame.render_widget(
        Paragraph::new("b back  ·  q quit")
            .alignment(Alignment::Center)
            .fg(Color::DarkGray),
        chunks[2],
    );
}
