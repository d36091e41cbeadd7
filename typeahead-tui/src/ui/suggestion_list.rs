use super::*;
use ratatui::{
    style::Modifier,
    text::{Line, Span},
    widgets::{List, ListItem, ListState},
};
use typeahead::SuggestionItem;

fn icon_tag(icon: &str) -> &'static str {
    match icon {
        "PDF" => "[pdf]",
        "WordDocument" => "[doc]",
        "ExcelDocument" => "[xls]",
        "PowerPointDocument" => "[ppt]",
        "TextDocument" => "[txt]",
        "FileHTML" => "[htm]",
        _ => "[   ]",
    }
}

fn suggestion_row(item: &SuggestionItem, highlighted: bool) -> ListItem<'_> {
    let title_style = if highlighted {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(icon_tag(item.icon_name()), Style::default().fg(Color::Cyan)),
        Span::raw(" "),
        Span::styled(item.title.as_str(), title_style),
    ])];
    if !item.subtitle.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("      {}", item.subtitle),
            Style::default().fg(Color::DarkGray),
        )));
    }
    ListItem::new(lines)
}

pub(super) fn render_suggestions(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .state
        .suggestions
        .iter()
        .enumerate()
        .map(|(i, item)| suggestion_row(item, app.highlighted == Some(i)))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" Suggestions ({}) ", app.state.suggestions.len())),
    );

    let mut state = ListState::default().with_selected(app.highlighted);
    frame.render_stateful_widget(list, area, &mut state);
}
