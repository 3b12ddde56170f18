use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::App;
use crate::engine::EngineMode;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(11),
        Constraint::Fill(1),
    ])
    .split(area);

    let engine = app.session().engine();
    let mode = match engine.mode() {
        EngineMode::Free => "Free play".to_string(),
        EngineMode::Timed { seconds } => format!("{seconds}s per question"),
    };
    let player = match app.session().username() {
        Some(name) => format!("Signed in as {name}"),
        None => "Playing as guest".to_string(),
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "F1 TRIVIA",
            Style::default().fg(Color::Red).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{} Questions · {}", engine.total_questions(), mode),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(player, Style::default().fg(Color::DarkGray))),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "ENTER",
            Style::default().fg(Color::Green).bold(),
        )),
        Line::from("to start  ·  q to quit".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );

    frame.render_widget(widget, chunks[1]);
}
