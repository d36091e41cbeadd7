use crate::app::App;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

mod suggestion_list;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Search input
            Constraint::Min(0),    // Suggestions
            Constraint::Length(1), // Status
        ])
        .split(frame.area());

    render_search_box(frame, app, chunks[0]);
    if app.dropdown_visible() {
        suggestion_list::render_suggestions(frame, app, chunks[1]);
    }
    render_status(frame, app, chunks[2]);
}

fn render_search_box(frame: &mut Frame, app: &App, area: Rect) {
    let (before, after) = app.input.split_at_cursor();
    let text = if app.input.value.is_empty() {
        "█ Search SharePoint...".to_string()
    } else {
        format!("{}█{}", before, after)
    };

    let title = if app.state.loading {
        " Search · loading "
    } else {
        " Search "
    };

    let search_box = Paragraph::new(text)
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Left)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(title)
                .padding(Padding::horizontal(1)),
        );
    frame.render_widget(search_box, area);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let style = if app.state.error.is_some() {
        Style::default().fg(Color::Red)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    frame.render_widget(Paragraph::new(app.status_line()).style(style), area);
}
