use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use crate::app::App;
use crate::models::PresentedQuestion;
use crate::session::Phase;

const OPTION_LABELS: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.session();

    let question = match session.phase() {
        Phase::Ready => session.current_question(),
        Phase::Error => {
            let message = session.notice().unwrap_or("No questions are available.");
            render_centered(frame, area, message, Color::Red);
            return;
        }
        _ => None,
    };

    let Some(question) = question else {
        render_centered(frame, area, "Loading quiz...", Color::DarkGray);
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_progress(frame, chunks[0], app);
    if let Some(notice) = session.notice() {
        render_notice(frame, chunks[1], notice);
    }
    render_question_text(frame, chunks[2], question.text());
    render_options(frame, chunks[3], app, question);
    render_controls(frame, chunks[4], session.is_revealed());
}

fn render_centered(frame: &mut Frame, area: Rect, text: &str, color: Color) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .split(area);

    let widget = Paragraph::new(vec![
        Line::from(text.to_string()),
        Line::from(""),
        Line::from("n new quiz  ·  q quit".fg(Color::DarkGray)),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .fg(color);
    frame.render_widget(widget, chunks[1]);
}

fn render_progress(frame: &mut Frame, area: Rect, app: &App) {
    let session = app.session();
    let progress = format!(
        "score {}  ·  {}/{}",
        session.score(),
        session.current_index() + 1,
        session.total_questions()
    );
    let widget = Paragraph::new(progress)
        .alignment(Alignment::Right)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

fn render_notice(frame: &mut Frame, area: Rect, notice: &str) {
    let widget = Paragraph::new(notice.to_string()).fg(Color::Yellow).italic();
    frame.render_widget(widget, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text.to_string())
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, app: &App, question: &PresentedQuestion) {
    let session = app.session();
    let answers = question.answers();
    let mut lines: Vec<Line> = Vec::with_capacity(answers.len() * 2);

    for (index, answer) in answers.iter().enumerate() {
        let is_cursor = index == app.selected_option();
        let style = option_style(
            answer,
            question,
            session.is_revealed(),
            session.selected_answer(),
            is_cursor,
        );
        let marker = if is_cursor && !session.is_revealed() {
            ">"
        } else {
            " "
        };
        let label = OPTION_LABELS.get(index).copied().unwrap_or('?');

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", label), style),
            Span::styled(answer.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn option_style(
    answer: &str,
    question: &PresentedQuestion,
    revealed: bool,
    chosen: Option<&str>,
    is_cursor: bool,
) -> Style {
    if revealed {
        if question.is_correct(answer) {
            return Style::default().fg(Color::Green).bold();
        }
        if chosen == Some(answer) {
            return Style::default().fg(Color::Red).bold();
        }
        return Style::default().fg(Color::DarkGray);
    }

    if is_cursor {
        Style::default().fg(Color::Cyan).bold()
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn render_controls(frame: &mut Frame, area: Rect, revealed: bool) {
    let text = if revealed {
        "enter next  ·  n new quiz  ·  q quit"
    } else {
        "j/k navigate  ·  enter select  ·  n new quiz  ·  q quit"
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
