use crate::app_state::{App, FocusArea, InputMode, Screen};
use crate::catalog::{Certification, Commerce, CommerceRow, Effective, ProducerCard, Rating};
use crate::view::ViewItems;
use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 顶部状态栏
            Constraint::Min(0),    // 中间内容区域
            Constraint::Length(9), // 底部命令/日志区域
        ])
        .split(f.size());

    render_top_bar(f, chunks[0], app);

    let middle_chunks = Layout::default()
        .direction(ratatui::layout::Direction::Horizontal)
        .constraints([Constraint::Length(32), Constraint::Min(0)])
        .split(chunks[1]);

    render_facet_panel(f, middle_chunks[0], app);

    match app.screen {
        Screen::List => render_list(f, middle_chunks[1], app),
        Screen::Detail => render_detail(f, middle_chunks[1], app),
    }

    render_bottom_bar(f, chunks[2], app);
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    }
}

fn bold(text: &str) -> Span<'_> {
    Span::styled(text, Style::default().add_modifier(Modifier::BOLD))
}

fn rating_span(rating: &Rating) -> Span<'static> {
    let color = if rating.is_rated() {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    Span::styled(rating.to_string(), Style::default().fg(color))
}

fn format_date(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|t| t.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn location(city: &str, department: &str, region: &str) -> String {
    [city, department, region]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" · ")
}

fn render_top_bar(f: &mut Frame, area: Rect, app: &App) {
    let view = app.controller.view();
    let mut spans = vec![
        Span::styled(
            " Vitrine ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            " {} · {} résultats · page {}/{} ",
            view.mode,
            view.total_filtered(),
            view.page.page,
            view.page.total_pages
        )),
    ];
    if app.loading {
        spans.push(Span::styled(
            " chargement… ",
            Style::default().fg(Color::Yellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        )
        .alignment(ratatui::layout::Alignment::Center);

    f.render_widget(paragraph, area);
}

fn render_facet_panel(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    let view = app.controller.view();
    let region = if view.region.is_empty() {
        "toutes"
    } else {
        view.region.as_str()
    };
    let summary = vec![
        Line::from(vec![bold("Tri: "), Span::raw(view.sort_label)]),
        Line::from(vec![
            bold("Région: "),
            Span::styled(region, Style::default().fg(Color::Yellow)),
        ]),
        Line::from(vec![
            bold("Recherche: "),
            Span::raw(app.controller.raw_query()),
        ]),
    ];
    f.render_widget(
        Paragraph::new(summary).block(Block::default().borders(Borders::ALL).title("Filtres")),
        chunks[0],
    );

    let focused = app.focus_area == FocusArea::Facets;
    let items: Vec<ListItem> = view
        .facets
        .departments
        .iter()
        .map(|d| {
            let checked = view.departments.iter().any(|s| s == d);
            let mark = if checked { "[x] " } else { "[ ] " };
            let style = if checked {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!("{}{}", mark, d)).style(style)
        })
        .collect();

    let title = if focused {
        "Départements (Espace cocher)"
    } else {
        "Départements (Tab)"
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .style(focus_style(focused)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        );
    f.render_stateful_widget(list, chunks[1], &mut app.facet_state);
}

fn producer_line(card: &ProducerCard) -> Line<'_> {
    Line::from(vec![
        Span::styled(
            format!("{:<28}", card.name),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "{:<36}",
            location(&card.city, &card.department, &card.region)
        )),
        Span::styled(
            format!("{:>2} commerce(s)  ", card.commerce_count),
            Style::default().fg(Color::Gray),
        ),
        rating_span(&card.rating),
    ])
}

fn commerce_line(row: &CommerceRow) -> Line<'_> {
    Line::from(vec![
        Span::styled(
            format!("{:<28}", row.name),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{:<22}", row.producer_name),
            Style::default().fg(Color::Magenta),
        ),
        Span::raw(format!(
            "{:<36}",
            location(&row.city, &row.department, &row.region)
        )),
        rating_span(&row.rating),
    ])
}

fn render_list(f: &mut Frame, area: Rect, app: &mut App) {
    let view = app.controller.view();
    let items: Vec<ListItem> = match &view.items {
        ViewItems::Producers(cards) => cards
            .iter()
            .map(|c| ListItem::new(producer_line(c)))
            .collect(),
        ViewItems::Commerces(rows) => rows
            .iter()
            .map(|r| ListItem::new(commerce_line(r)))
            .collect(),
    };
    let empty = items.is_empty();

    let focused = app.focus_area == FocusArea::List;
    let title = format!(
        "{} (v mode, s tri, r région, n/p page, Enter détail)",
        view.mode
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(focus_style(focused));

    if empty {
        let text = if app.loading {
            "Chargement du catalogue…"
        } else if app.controller.catalog().is_empty() {
            "Aucun producteur disponible (F5 pour recharger)"
        } else {
            "Aucun résultat pour ces filtres (c pour effacer)"
        };
        f.render_widget(
            Paragraph::new(text)
                .style(Style::default().fg(Color::Gray))
                .block(block),
            area,
        );
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ");
    app.list_state.select(Some(app.selected_index));
    f.render_stateful_widget(list, area, &mut app.list_state);
}

fn certification_spans(certs: &[Certification]) -> Vec<Span<'_>> {
    certs
        .iter()
        .map(|c| Span::styled(format!("[{}] ", c.label), Style::default().fg(Color::Green)))
        .collect()
}

fn commerce_lines(commerce: &Commerce) -> Vec<Line<'_>> {
    let rating = Rating::from_parts(commerce.avg_rating, commerce.rating_count);
    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!("  • {}  ", commerce.effective_display_name()),
            Style::default().fg(Color::Cyan),
        ),
        rating_span(&rating),
    ])];
    if let Some(address) = &commerce.address {
        let one_line = address.one_line();
        if !one_line.is_empty() {
            lines.push(Line::from(format!("    {}", one_line)));
        }
    }
    if !commerce.certifications.is_empty() {
        let mut spans = vec![Span::raw("    ")];
        spans.extend(certification_spans(&commerce.certifications));
        lines.push(Line::from(spans));
    }
    lines
}

fn producer_detail(card: &ProducerCard) -> Vec<Line<'_>> {
    let mut lines = vec![
        Line::from(vec![Span::styled(
            card.name.as_str(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(location(&card.city, &card.department, &card.region)),
        Line::from(vec![bold("Note: "), rating_span(&card.rating)]),
        Line::from(vec![
            bold("Inscrit le: "),
            Span::raw(format_date(card.joined_at)),
        ]),
        Line::from(""),
    ];
    if !card.bio.is_empty() {
        lines.push(Line::from(card.bio.as_str()));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(vec![Span::styled(
        format!("--- Commerces ({}) ---", card.commerce_count),
        Style::default().fg(Color::Yellow),
    )]));
    for commerce in card.commerces() {
        lines.extend(commerce_lines(commerce));
    }
    lines
}

fn commerce_detail(row: &CommerceRow) -> Vec<Line<'_>> {
    let commerce = row.commerce();
    let mut lines = vec![
        Line::from(vec![Span::styled(
            row.name.as_str(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(vec![
            bold("Producteur: "),
            Span::styled(row.producer_name.as_str(), Style::default().fg(Color::Magenta)),
        ]),
        Line::from(location(&row.city, &row.department, &row.region)),
        Line::from(vec![bold("Note: "), rating_span(&row.rating)]),
    ];
    if let Some(address) = &commerce.address {
        lines.push(Line::from(vec![bold("Adresse: "), Span::raw(address.one_line())]));
    }
    for (label, value) in [
        ("Email: ", &commerce.email),
        ("Téléphone: ", &commerce.phone),
        ("Site: ", &commerce.website),
    ] {
        if let Some(v) = value.as_deref().filter(|v| !v.trim().is_empty()) {
            lines.push(Line::from(vec![bold(label), Span::raw(v)]));
        }
    }
    if let Some(desc) = commerce.description.as_deref().filter(|d| !d.trim().is_empty()) {
        lines.push(Line::from(""));
        lines.push(Line::from(desc));
    }
    if !row.certifications().is_empty() {
        lines.push(Line::from(""));
        let mut spans = vec![bold("Certifications: ")];
        spans.extend(certification_spans(row.certifications()));
        lines.push(Line::from(spans));
    }
    lines
}

fn render_detail(f: &mut Frame, area: Rect, app: &App) {
    let content = if let Some(card) = app.selected_producer() {
        producer_detail(card)
    } else if let Some(row) = app.selected_commerce() {
        commerce_detail(row)
    } else {
        vec![Line::from("Aucune sélection")]
    };

    let paragraph = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Détail (↑↓ défiler, x retour)")
                .style(focus_style(true)),
        )
        .wrap(Wrap { trim: true })
        .scroll((app.detail_scroll, 0));
    f.render_widget(paragraph, area);
}

fn render_bottom_bar(f: &mut Frame, area: Rect, app: &App) {
    let bottom_chunks = Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let (title, prompt, color) = match app.input_mode {
        InputMode::Command => {
            let (left, right) = app.command_split();
            let mut spans = vec![
                Span::styled(
                    ":",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(left),
                Span::styled("_", Style::default().fg(Color::Yellow)),
                Span::raw(right),
            ];
            if let Some(hint) = app.get_completion_hint() {
                spans.push(Span::styled(hint, Style::default().fg(Color::DarkGray)));
            }
            ("Commande (Enter exécuter, Esc annuler, Tab compléter)", Line::from(spans), Color::Green)
        }
        InputMode::Search => (
            "Recherche (Enter valider)",
            Line::from(vec![
                Span::styled("/", Style::default().fg(Color::Green)),
                Span::raw(app.controller.raw_query()),
                Span::styled("_", Style::default().fg(Color::Yellow)),
            ]),
            Color::Green,
        ),
        InputMode::Normal => (
            "Aide",
            Line::from("/ recherche  : commande  v mode  s/S tri  r/R région  Tab focus  Espace cocher  c effacer  F5 recharger  q quitter"),
            Color::White,
        ),
    };
    let command_paragraph = Paragraph::new(prompt).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(Style::default().fg(color)),
    );
    f.render_widget(command_paragraph, bottom_chunks[0]);

    // 最新的日志在顶部
    let log_items: Vec<ListItem> = app
        .log_messages
        .iter()
        .rev()
        .take(20)
        .map(|msg| {
            let style = if msg.starts_with("✓") {
                Style::default().fg(Color::Green)
            } else if msg.starts_with("✗") {
                Style::default().fg(Color::Red)
            } else if msg.starts_with("⚠") {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(msg.as_str()).style(style)
        })
        .collect();

    let log = List::new(log_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Journal ({})", app.log_messages.len()))
            .style(Style::default().fg(Color::White)),
    );
    f.render_widget(log, bottom_chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewController;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[test]
    fn draws_empty_and_loaded_catalog() {
        let (cmd_tx, _cmd_rx) = mpsc::unbounded_channel();
        let (_evt_tx, evt_rx) = mpsc::unbounded_channel();
        let controller = ViewController::new(12, Duration::from_millis(250));
        let mut app = App::new(controller, Vec::new(), cmd_tx, evt_rx);
        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|f| draw(f, &mut app)).unwrap();

        let producers = serde_json::from_value(serde_json::json!([
            {"id": 1, "display_name": "Ferme Abel", "commerces": [
                {"id": 1, "name": "Épicerie", "certifications": ["AB"]}
            ]}
        ]))
        .unwrap();
        app.handle_event(crate::app_state::AppEvent::CatalogLoaded {
            ticket: app.load_ticket,
            producers,
        });
        app.screen = Screen::Detail;
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        app.controller.toggle_view_mode();
        terminal.draw(|f| draw(f, &mut app)).unwrap();
    }
}
