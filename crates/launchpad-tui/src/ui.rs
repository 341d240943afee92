//! Rendering.

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem, ListState, Paragraph, Tabs, Wrap},
};

use launchpad_core::registry::RegistrySnapshot;
use launchpad_core::types::{InstallStatus, SearchHit};
use launchpad_core::view::{ClientCard, SearchView, Tab, TabView, project};

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &App, snapshot: &RegistrySnapshot) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(2),
    ])
    .areas(frame.area());

    draw_tabs(frame, app, header);
    match project(app.tab, snapshot) {
        TabView::Clients { cards, loading } => {
            draw_clients(frame, app, body, &cards, loading);
        }
        TabView::Installed { cards } => draw_installed(frame, app, body, &cards),
        TabView::Mods { search } => draw_mods(frame, app, body, search),
        TabView::Unavailable { title } => {
            let text = Paragraph::new(format!("{title} are not available yet."))
                .block(Block::bordered().title(title))
                .centered();
            frame.render_widget(text, body);
        }
    }
    draw_footer(frame, app, footer);
}

fn draw_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.title())))
        .collect();
    let tabs = Tabs::new(titles)
        .select(app.tab.index())
        .block(Block::bordered().title(" Launchpad "))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(tabs, area);
}

fn draw_clients(frame: &mut Frame, app: &App, area: Rect, cards: &[ClientCard<'_>], loading: bool) {
    let block = Block::bordered().title(if loading {
        " Clients (scanning…) "
    } else {
        " Clients "
    });

    if cards.is_empty() {
        let message = if loading {
            "Scanning for clients…"
        } else {
            "No clients found. Press r to scan again."
        };
        frame.render_widget(Paragraph::new(message).block(block).centered(), area);
        return;
    }

    let items: Vec<ListItem> = cards.iter().map(client_item).collect();
    render_list(frame, app, area, block, items, cards.len());
}

fn draw_installed(frame: &mut Frame, app: &App, area: Rect, cards: &[ClientCard<'_>]) {
    let block = Block::bordered().title(" Installed ");
    if cards.is_empty() {
        let message = Paragraph::new("No clients installed. Install one from the Clients tab.")
            .block(block)
            .centered();
        frame.render_widget(message, area);
        return;
    }

    let items: Vec<ListItem> = cards
        .iter()
        .map(|card| {
            let installed = card
                .installed_label()
                .map(|date| format!("installed {date}"))
                .unwrap_or_default();
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<24}", card.client.name),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(" {:<10} ", card.client.version)),
                Span::styled(installed, Style::default().fg(Color::DarkGray)),
            ]))
        })
        .collect();
    render_list(frame, app, area, block, items, cards.len());
}

fn draw_mods(frame: &mut Frame, app: &App, area: Rect, search: SearchView<'_>) {
    let [input_area, results_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

    let (query, style) = match &app.input {
        Some(text) => (format!("{text}▏"), Style::default().fg(Color::Yellow)),
        None => match search {
            SearchView::Searching { query } | SearchView::NoResults { query } => {
                (query.to_string(), Style::default())
            }
            _ => (
                "Press / to search".to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        },
    };
    frame.render_widget(
        Paragraph::new(query)
            .style(style)
            .block(Block::bordered().title(" Search mods ")),
        input_area,
    );

    let block = Block::bordered().title(" Results ");
    let message = match search {
        SearchView::NeverSearched => "Search for mods, shaders and modpacks.".to_string(),
        SearchView::Searching { .. } => "Searching…".to_string(),
        SearchView::NoResults { .. } => "No results found.".to_string(),
        SearchView::Failed { reason } => format!("Search failed: {reason}"),
        SearchView::Results(hits) => {
            let items: Vec<ListItem> = hits.iter().map(hit_item).collect();
            render_list(frame, app, results_area, block, items, hits.len());
            return;
        }
    };
    frame.render_widget(
        Paragraph::new(message)
            .block(block)
            .wrap(Wrap { trim: true })
            .centered(),
        results_area,
    );
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let help = match (app.tab, app.is_editing()) {
        (_, true) => "Enter search · Esc cancel",
        (Tab::Clients, false) => "↑↓ select · Enter install · r rescan · Tab switch · q quit",
        (Tab::Installed, false) => "↑↓ select · Enter launch · r refresh · Tab switch · q quit",
        (Tab::Mods, false) => "/ search · ↑↓ select · Tab switch · q quit",
        (Tab::Profiles, false) => "Tab switch · q quit",
    };

    let mut lines = vec![Line::styled(help, Style::default().fg(Color::DarkGray))];
    if let Some(notice) = &app.notice {
        let color = if notice.is_error {
            Color::Red
        } else {
            Color::Green
        };
        lines.insert(0, Line::styled(notice.text.clone(), Style::default().fg(color)));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_list(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    block: Block<'_>,
    items: Vec<ListItem<'_>>,
    len: usize,
) {
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("› ");
    let mut state = ListState::default().with_selected(app.selected(len));
    frame.render_stateful_widget(list, area, &mut state);
}

fn client_item<'a>(card: &ClientCard<'a>) -> ListItem<'a> {
    let client = card.client;
    let mut spans = vec![
        Span::styled(
            format!("{:<24}", client.name),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {:<10} {:>9} ", client.version, card.size_label())),
    ];
    if let Some(badge) = card.badge() {
        spans.push(Span::styled(
            format!("[{badge}] "),
            Style::default().fg(Color::Cyan),
        ));
    }
    spans.push(status_span(card.status));

    let mut lines = vec![Line::from(spans)];
    if let Some(warning) = &client.warning {
        lines.push(Line::styled(
            format!("  ⚠ {warning}"),
            Style::default().fg(Color::Yellow),
        ));
    }
    ListItem::new(lines)
}

fn status_span(status: Option<InstallStatus>) -> Span<'static> {
    match status {
        Some(InstallStatus::Installing) => {
            Span::styled("installing…", Style::default().fg(Color::Yellow))
        }
        Some(InstallStatus::Success) => Span::styled("installed ✓", Style::default().fg(Color::Green)),
        Some(InstallStatus::Error) => Span::styled("install failed", Style::default().fg(Color::Red)),
        None => Span::raw(""),
    }
}

fn hit_item(hit: &SearchHit) -> ListItem<'_> {
    let updated = hit
        .date_modified
        .as_ref()
        .map(|ts| ts.date_label())
        .unwrap_or_default();
    ListItem::new(vec![
        Line::from(vec![
            Span::styled(hit.title.as_str(), Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("  ⬇ {}  {}", hit.downloads, updated),
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::raw(format!("  {}", hit.description)),
    ])
}
