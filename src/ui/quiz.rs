use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::engine::Countdown;
use crate::models::Question;

const OPTION_LABELS: [char; 4] = ['1', '2', '3', '4'];

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let engine = app.session().engine();
    let question = engine.current_question();

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_header(frame, chunks[0], app);
    render_question_text(frame, chunks[1], &question.text);
    render_options(frame, chunks[2], app, question);
    frame.render_widget(
        Paragraph::new(super::status_span(app.status())).alignment(Alignment::Center),
        chunks[3],
    );
    render_controls(frame, chunks[4], app.is_timed());
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let engine = app.session().engine();
    let halves = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(area);

    let left = Line::from(vec![
        Span::styled(
            format!("Score: {}", engine.score()),
            Style::default().fg(Color::Cyan).bold(),
        ),
        Span::raw("   "),
        timer_span(engine.countdown()),
    ]);
    frame.render_widget(Paragraph::new(left), halves[0]);

    let progress = format!(
        "Question {} of {}",
        engine.index() + 1,
        engine.total_questions()
    );
    let widget = Paragraph::new(progress)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, halves[1]);
}

fn timer_span(countdown: Option<&Countdown>) -> Span<'static> {
    let Some(countdown) = countdown else {
        return Span::raw("");
    };
    let color = if countdown.is_low() {
        Color::Red
    } else {
        Color::Yellow
    };
    Span::styled(
        format!("Time: {}", countdown.display()),
        Style::default().fg(color).bold(),
    )
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, app: &App, question: &Question) {
    let engine = app.session().engine();
    // Free play shows right/wrong as soon as an answer is recorded.
    let chosen = if app.is_timed() {
        None
    } else {
        engine.answer_for(&question.id).and_then(|a| a.chosen())
    };

    let mut lines: Vec<Line> = Vec::with_capacity(question.options.len() * 2);
    for (index, option) in question.options.iter().enumerate() {
        let number = index + 1;
        let is_selected = index == app.selected_option();

        let mut style = match chosen {
            Some(_) if question.is_correct(number) => Style::default().fg(Color::Green),
            Some(c) if c == number => Style::default().fg(Color::Red),
            _ => Style::default().fg(Color::Gray),
        };
        if is_selected {
            style = style.bold().add_modifier(Modifier::REVERSED);
        }
        let marker = if is_selected { ">" } else { " " };

        lines.push(Line::from(vec![
            Span::styled(format!(" {marker} "), style),
            Span::styled(format!("{}. ", OPTION_LABELS[index]), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Color::DarkGray)
            .padding(Padding::vertical(1)),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, timed: bool) {
    let text = if timed {
        "j/k navigate  ·  enter answer  ·  r restart  ·  q quit"
    } else {
        "j/k navigate  ·  enter answer  ·  h/l prev/next  ·  f finish  ·  r restart  ·  q quit"
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
