mod quiz;
mod result;
mod stats;
mod welcome;

use ratatui::{prelude::*, widgets::Block};

use crate::app::{App, Screen, StatusLine, Tone};

pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match app.screen {
        Screen::Welcome => welcome::render(frame, area, app),
        Screen::Quiz => quiz::render(frame, area, app),
        Screen::Result => result::render(frame, area, app),
        Screen::Stats => stats::render(frame, area, app),
    }
}

fn status_span(status: Option<&StatusLine>) -> Span<'_> {
    let Some(status) = status else {
        return Span::raw("");
    };
    let color = match status.tone {
        Tone::Good => Color::Green,
        Tone::Bad => Color::Red,
        Tone::Info => Color::Cyan,
    };
    Span::styled(status.text.as_str(), Style::default().fg(color))
}
