use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::engine::{Answer, QuestionReview};

const QUESTION_PREVIEW_LENGTH: usize = 55;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let engine = app.session().engine();
    let score = engine.score();
    let total = engine.total_questions();
    let percentage = calculate_percentage(score, total);
    let time_taken = engine.record().map(|r| r.time_taken);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(6),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[1], score, total, percentage, time_taken);
    render_question_breakdown(frame, chunks[2], &engine.review(), app.result_scroll());
    frame.render_widget(
        Paragraph::new(super::status_span(app.status())).alignment(Alignment::Center),
        chunks[3],
    );
    render_controls(frame, chunks[4]);
}

fn calculate_percentage(score: usize, total: usize) -> f64 {
    if total > 0 {
        (score as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

fn get_grade_color(percentage: f64) -> Color {
    match percentage as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_score_summary(
    frame: &mut Frame,
    area: Rect,
    score: usize,
    total: usize,
    percentage: f64,
    time_taken: Option<u64>,
) {
    let time = time_taken.map_or_else(String::new, |secs| format!("  ·  Time: {secs}s"));
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "QUIZ COMPLETE",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Score: {score}/{total}  ({percentage:.0}%){time}"),
            Style::default().fg(get_grade_color(percentage)).bold(),
        )),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_question_breakdown(
    frame: &mut Frame,
    area: Rect,
    review: &[QuestionReview<'_>],
    scroll: usize,
) {
    let lines: Vec<Line> = review
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let (symbol, color) = if item.correct {
                ("+", Color::Green)
            } else {
                ("-", Color::Red)
            };
            let given = match item.answer {
                Some(Answer::Chosen(chosen)) => item.question.option(chosen).unwrap_or("?"),
                Some(Answer::TimedOut) => "time up",
                None => "skipped",
            };

            Line::from(vec![
                Span::styled(format!(" {symbol} "), Style::default().fg(color)),
                Span::styled(
                    format!("{:2}. ", index + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    truncate_question(&item.question.text),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(
                    format!("  [{} / {}]", given, item.question.correct_answer()),
                    Style::default().fg(Color::DarkGray),
                ),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}

fn truncate_question(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count > QUESTION_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(QUESTION_PREVIEW_LENGTH).collect();
        format!("{truncated}...")
    } else {
        text.to_string()
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  s stats  ·  e export  ·  r restart  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_question() {
        let long = "x".repeat(QUESTION_PREVIEW_LENGTH + 5);
        assert_eq!(truncate_question(&long).chars().count(), QUESTION_PREVIEW_LENGTH + 3);
        assert_eq!(truncate_question("short"), "short");
    }

    #[test]
    fn test_grade_colors() {
        assert_eq!(get_grade_color(calculate_percentage(9, 10)), Color::Green);
        assert_eq!(get_grade_color(calculate_percentage(1, 2)), Color::Yellow);
        assert_eq!(get_grade_color(calculate_percentage(0, 0)), Color::Red);
    }
}
