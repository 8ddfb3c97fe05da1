use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, SelectionField};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(15),
        Constraint::Fill(1),
    ])
    .split(area);

    let columns = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length(56),
        Constraint::Fill(1),
    ])
    .split(chunks[1]);

    let category = app.selected_category();
    let difficulty = app.selected_difficulty().to_string();
    let count = app.selected_count().to_string();

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "QUIZ MASTER",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from("Choose your quiz".fg(Color::DarkGray)),
        Line::from(""),
        field_line("Category", category.name, app.focus() == SelectionField::Category),
        field_line(
            "Difficulty",
            &difficulty,
            app.focus() == SelectionField::Difficulty,
        ),
        field_line("Questions", &count, app.focus() == SelectionField::Count),
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "ENTER",
            Style::default().fg(Color::Green).bold(),
        )),
        Line::from("to start".fg(Color::DarkGray)),
        Line::from(""),
        Line::from("j/k field  ·  h/l change  ·  q quit".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );

    frame.render_widget(widget, columns[1]);
}

fn field_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let style = if focused {
        Style::default().fg(Color::Cyan).bold()
    } else {
        Style::default().fg(Color::Gray)
    };
    let (left, right) = if focused { ("< ", " >") } else { ("  ", "  ") };

    Line::from(vec![
        Span::styled(format!("{:>11}  ", label), Style::default().fg(Color::DarkGray)),
        Span::styled(left, style),
        Span::styled(value, style),
        Span::styled(right, style),
    ])
}
