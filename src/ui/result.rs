use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::app::App;
use crate::models::AnsweredRecord;
use crate::session::QuizOutcome;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(outcome) = app.outcome() else {
        return;
    };
    let percentage = outcome.percentage();
    let grade_color = get_grade_color(percentage);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(7),
        Constraint::Fill(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[1], outcome, grade_color);
    render_answer_breakdown(frame, chunks[2], &outcome.history, app.result_scroll());
    render_controls(frame, chunks[3]);
}

fn get_grade_color(percentage: f64) -> Color {
    match percentage as u32 {
        90..=100 => Color::Green,
        70..=89 => Color::Cyan,
        50..=69 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_score_summary(frame: &mut Frame, area: Rect, outcome: &QuizOutcome, grade_color: Color) {
    let subtitle = format!(
        "{} · category {}{}",
        outcome.config.difficulty(),
        outcome.config.category(),
        if outcome.degraded { " · offline questions" } else { "" }
    );

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "YOUR SCORE",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{} / {}  ({:.0}%)",
                outcome.score,
                outcome.total,
                outcome.percentage()
            ),
            Style::default().fg(grade_color).bold(),
        )),
        Line::from(subtitle.fg(Color::DarkGray)),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_answer_breakdown(frame: &mut Frame, area: Rect, history: &[AnsweredRecord], scroll: usize) {
    let mut lines: Vec<Line> = Vec::with_capacity(history.len() * 4);

    for (index, record) in history.iter().enumerate() {
        let (symbol, color) = if record.is_correct() {
            ("+", Color::Green)
        } else {
            ("-", Color::Red)
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
            Span::styled(
                format!("{:2}. ", index + 1),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(record.question.as_str(), Style::default().fg(Color::White)),
        ]));
        lines.push(Line::from(vec![
            Span::raw("      correct  "),
            Span::styled(record.correct_answer.as_str(), Style::default().fg(Color::Green)),
        ]));
        lines.push(Line::from(vec![
            Span::raw("      yours    "),
            Span::styled(record.chosen_answer.as_str(), Style::default().fg(color)),
        ]));
        lines.push(Line::from(""));
    }

    // Each record takes four lines; scroll by record.
    let offset = u16::try_from(scroll * 4).unwrap_or(u16::MAX);
    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((offset, 0));
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  r play again  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
