//! TUI rendering for Civic using ratatui.

mod input;
mod pie;
mod theme;

pub use input::{apply_event, handle_events};
pub use theme::{Glyphs, Palette, glyphs, palette, styles};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use civic_engine::{
    App, InputMode, Layer, Phase, Region, Scene, StatusLevel, format_millions,
};

use self::pie::{PieSpec, render_pie};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);
    // Clear with background color
    let bg_block = Block::default().style(Style::default().bg(palette.bg_dark));
    frame.render_widget(bg_block, frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(3), // Advisor
            Constraint::Min(1),    // Scene body
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0], &palette);
    draw_advisor(frame, app, chunks[1], &palette);

    let pie_area = match app.scene() {
        Scene::Intro => {
            draw_intro(frame, chunks[2], &palette);
            None
        }
        Scene::Debrief => {
            draw_debrief(frame, app, chunks[2], &palette, &glyphs);
            None
        }
        Scene::Revenue => Some(draw_revenue(frame, app, chunks[2], &palette, &glyphs)),
        Scene::Blind | Scene::Adjust => draw_allocation(frame, app, chunks[2], &palette, &glyphs),
        Scene::Compare => {
            draw_compare(frame, app, chunks[2], &palette, &glyphs);
            None
        }
    };
    app.set_pie_region(pie_area.map(|r| Region::new(r.x, r.y, r.width, r.height)));

    draw_status_bar(frame, app, chunks[3], &palette);

    if app.confirm_prompt().is_some() {
        draw_confirm_prompt(frame, app, &palette);
    }
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let active = app.active_layer();
    let mut spans = vec![
        Span::styled(" Civic ", styles::title(palette)),
        Span::styled(
            format!(" {} ", app.scene().title()),
            Style::default().fg(palette.text_secondary),
        ),
        Span::raw("  "),
    ];
    for layer in Layer::ALL {
        let style = if layer == active {
            styles::layer_active(palette)
        } else {
            styles::layer_inactive(palette)
        };
        spans.push(Span::styled(format!(" {} ", layer.display_name()), style));
    }
    spans.push(Span::styled(
        format!("  Funds ${}", format_millions(app.total_budget())),
        Style::default().fg(palette.accent),
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_advisor(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let block = Block::default()
        .borders(Borders::LEFT)
        .border_type(BorderType::Thick)
        .border_style(Style::default().fg(palette.primary))
        .padding(Padding::horizontal(1));
    let advisor = Paragraph::new(app.advisor())
        .style(Style::default().fg(palette.text_secondary))
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(advisor, area);
}

fn panel<'a>(title: &str, palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.bg_border))
        .title(format!(" {title} "))
        .padding(Padding::horizontal(1))
}

fn draw_intro(frame: &mut Frame, area: Rect, palette: &Palette) {
    let text = Style::default().fg(palette.text_primary);
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled("Civic Budget", styles::title(palette))),
        Line::from(""),
        Line::from(Span::styled(
            "Split the city's budget the way you would.",
            text,
        )),
        Line::from(Span::styled(
            "There are two layers: Operating pays for day-to-day services, Capital for long-term projects.",
            text,
        )),
        Line::from(Span::styled(
            "You allocate each one blind first, then adjust after seeing the city's own numbers.",
            text,
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", styles::key_highlight(palette)),
            Span::styled(" to begin", styles::key_hint(palette)),
        ]),
    ];
    let intro = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(panel("Welcome", palette));
    frame.render_widget(intro, area);
}

fn draw_debrief(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let registry = app.registry();
    let text = Style::default().fg(palette.text_primary);
    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                "Operating budget: ${}   Capital budget: ${}",
                format_millions(registry.total_budget(Layer::Operating)),
                format_millions(registry.total_budget(Layer::Capital))
            ),
            Style::default().fg(palette.accent),
        )),
        Line::from(""),
        Line::from(Span::styled("You will divide 100% across:", text)),
    ];
    for (i, sector) in registry.iter().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {} ", glyphs.bullet),
                Style::default().fg(palette.sector(i)),
            ),
            Span::styled(sector_label(sector.icon(), sector.name(), glyphs), text),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Enter", styles::key_highlight(palette)),
        Span::styled(" see where the money goes  ", styles::key_hint(palette)),
        Span::styled("s", styles::key_highlight(palette)),
        Span::styled(" skip to allocating", styles::key_hint(palette)),
    ]));
    let debrief = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(panel("Debrief", palette));
    frame.render_widget(debrief, area);
}

fn draw_revenue(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let layer = app.active_layer();
    let registry = app.registry();
    let reference = registry.reference_vector(layer);
    let focus = app.revenue_focus();
    let title = format!("City {} split", layer.display_name());
    let inner = render_pie(
        frame,
        chunks[0],
        &PieSpec {
            title: &title,
            values: &reference,
            highlight: focus,
            active: true,
        },
        palette,
        glyphs,
    );

    let width = name_width(app, glyphs);
    let mut lines = Vec::new();
    for (i, sector) in registry.iter().enumerate() {
        let focused = focus == Some(i);
        let pointer = if focused { glyphs.selected } else { " " };
        let style = if focused {
            Style::default()
                .fg(palette.text_primary)
                .bg(palette.bg_highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text_primary)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{pointer} "), Style::default().fg(palette.accent)),
            Span::styled(
                pad(&sector_label(sector.icon(), sector.name(), glyphs), width),
                style,
            ),
            Span::styled(
                format!(" {:>3}%", sector.reference_share(layer)),
                Style::default().fg(palette.sector(i)),
            ),
        ]));
    }
    lines.push(Line::from(""));
    match app.revenue_detail() {
        Some(detail) => {
            lines.push(Line::from(Span::styled(
                sector_label(&detail.icon, &detail.name, glyphs),
                styles::title(palette),
            )));
            lines.push(Line::from(Span::styled(
                format!(
                    "{}% of ${} is about ${}",
                    detail.share,
                    format_millions(app.total_budget()),
                    format_millions(detail.amount)
                ),
                Style::default().fg(palette.text_secondary),
            )));
        }
        None => lines.push(Line::from(Span::styled(
            "Select a sector to see what it costs.",
            Style::default().fg(palette.text_muted),
        ))),
    }
    let detail = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(panel("Sectors", palette));
    frame.render_widget(detail, chunks[1]);
    inner
}

fn draw_allocation(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) -> Option<Rect> {
    let editor = app.active_editor()?;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(area);

    let mode = app.input_mode();
    let body = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(chunks[0]);

    let list = match mode {
        InputMode::Presets => preset_lines(app, palette, glyphs),
        InputMode::Sliders | InputMode::Pie => {
            slider_lines(app, editor.sliders().values(), body[0], palette, glyphs)
        }
    };
    let list = Paragraph::new(list).block(panel(mode.label(), palette));
    frame.render_widget(list, body[0]);

    let draft = editor.draft();
    let (summary, color) = if editor.is_locked() {
        (format!("{} Submitted", glyphs.locked), palette.text_muted)
    } else if draft.is_complete() {
        (
            format!("{} 100% allocated - Enter to submit", glyphs.complete),
            palette.success,
        )
    } else {
        (
            format!(
                "{} {}% allocated - {}% left",
                glyphs.incomplete,
                draft.total(),
                draft.remaining()
            ),
            palette.warning,
        )
    };
    let total = Paragraph::new(Line::from(Span::styled(
        summary,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .block(panel("Total", palette));
    frame.render_widget(total, body[1]);

    let values = editor.chart().values();
    let title = format!("Your {} split", app.active_layer().display_name());
    let highlight = (mode != InputMode::Presets).then(|| app.selected());
    Some(render_pie(
        frame,
        chunks[1],
        &PieSpec {
            title: &title,
            values: &values,
            highlight,
            active: mode == InputMode::Pie,
        },
        palette,
        glyphs,
    ))
}

fn slider_lines(
    app: &App,
    values: &[u32],
    area: Rect,
    palette: &Palette,
    glyphs: &Glyphs,
) -> Vec<Line<'static>> {
    let layer = app.active_layer();
    let show_city = app.scene().phase() == Some(Phase::Adjusted);
    let width = name_width(app, glyphs);
    let fixed = width + 16 + if show_city { 11 } else { 0 };
    let bar_width = usize::from(area.width).saturating_sub(fixed).max(10);
    let selected = app.selected();

    app.registry()
        .iter()
        .zip(values)
        .enumerate()
        .map(|(i, (sector, value))| {
            let is_selected = i == selected;
            let pointer = if is_selected { glyphs.selected } else { " " };
            let name_style = if is_selected {
                Style::default()
                    .fg(palette.text_primary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.text_secondary)
            };
            let mut spans = vec![
                Span::styled(format!("{pointer} "), Style::default().fg(palette.accent)),
                Span::styled(
                    pad(&sector_label(sector.icon(), sector.name(), glyphs), width),
                    name_style,
                ),
                Span::raw(" "),
                Span::styled(
                    bar(*value, bar_width, glyphs),
                    Style::default().fg(palette.sector(i)),
                ),
                Span::styled(
                    format!(" {value:>3}%"),
                    Style::default().fg(palette.text_primary),
                ),
            ];
            if show_city {
                spans.push(Span::styled(
                    format!("  city {:>3}%", sector.reference_share(layer)),
                    Style::default().fg(palette.text_muted),
                ));
            }
            Line::from(spans)
        })
        .collect()
}

fn preset_lines(app: &App, palette: &Palette, glyphs: &Glyphs) -> Vec<Line<'static>> {
    let cursor = app.preset_cursor();
    let registry = app.registry();
    let mut lines: Vec<Line> = app
        .presets()
        .iter()
        .enumerate()
        .map(|(i, preset)| {
            let is_cursor = i == cursor;
            let pointer = if is_cursor { glyphs.selected } else { " " };
            let style = if is_cursor {
                Style::default()
                    .fg(palette.text_primary)
                    .bg(palette.bg_highlight)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.text_primary)
            };
            Line::from(vec![
                Span::styled(format!("{pointer} "), Style::default().fg(palette.accent)),
                Span::styled(format!("{} ", i + 1), styles::key_highlight(palette)),
                Span::styled(preset.label(registry), style),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Space", styles::key_highlight(palette)),
        Span::styled(" apply  ", styles::key_hint(palette)),
        Span::styled("m", styles::key_highlight(palette)),
        Span::styled(" fine-tune with sliders", styles::key_hint(palette)),
    ]));
    lines
}

fn draw_compare(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let report = app.comparison();
    let table_height = u16::try_from(report.rows.len()).unwrap_or(u16::MAX).saturating_add(6);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(table_height), Constraint::Min(1)])
        .split(area);

    let width = name_width(app, glyphs);
    let header = Style::default()
        .fg(palette.text_secondary)
        .add_modifier(Modifier::BOLD);
    let cell = Style::default().fg(palette.text_primary);
    let mut lines = vec![Line::from(Span::styled(
        format!(
            "{}  {:>6}  {:>8}  {:>6}",
            pad("Sector", width),
            "Blind",
            "Adjusted",
            "City"
        ),
        header,
    ))];
    for row in &report.rows {
        lines.push(Line::from(Span::styled(
            format!(
                "{}  {:>5}%  {:>7}%  {:>5}%",
                pad(&sector_label(&row.icon, &row.name, glyphs), width),
                row.blind,
                row.adjusted,
                row.city
            ),
            cell,
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Awareness ", Style::default().fg(palette.text_secondary)),
        Span::styled(
            report.awareness_label(),
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}  ", glyphs.separator),
            Style::default().fg(palette.text_muted),
        ),
        Span::styled("Alignment ", Style::default().fg(palette.text_secondary)),
        Span::styled(
            report.alignment_label(),
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    let title = format!("Results - {}", report.layer.display_name());
    frame.render_widget(Paragraph::new(lines).block(panel(&title, palette)), chunks[0]);

    let series = app.compare_series();
    let label_width = series
        .iter()
        .map(|s| s.label.width())
        .max()
        .unwrap_or(0);
    let bar_width = usize::from(chunks[1].width)
        .saturating_sub(label_width + 14)
        .max(10);
    let mut chart = Vec::new();
    for (i, sector) in app.registry().iter().enumerate() {
        chart.push(Line::from(Span::styled(
            sector_label(sector.icon(), sector.name(), glyphs),
            Style::default()
                .fg(palette.text_primary)
                .add_modifier(Modifier::BOLD),
        )));
        for (j, s) in series.iter().enumerate() {
            let value = s.values.get(i).copied().unwrap_or(0);
            let color = palette.series[j % palette.series.len()];
            chart.push(Line::from(vec![
                Span::styled(
                    format!("  {} ", pad(&s.label, label_width)),
                    Style::default().fg(palette.text_secondary),
                ),
                Span::styled(bar(value, bar_width, glyphs), Style::default().fg(color)),
                Span::styled(format!(" {value:>3}%"), cell),
            ]));
        }
    }
    let title = format!("Chart - {} (v to change)", app.compare_view().as_str());
    frame.render_widget(Paragraph::new(chart).block(panel(&title, palette)), chunks[1]);
}

pub(crate) fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let line = if let Some(status) = app.status() {
        let color = match status.level() {
            StatusLevel::Info => palette.success,
            StatusLevel::Warning => palette.warning,
        };
        Line::from(Span::styled(
            status.text().to_string(),
            Style::default().fg(color),
        ))
    } else {
        let mut spans = Vec::new();
        for (key, action) in key_hints(app) {
            spans.push(Span::styled(key, styles::key_highlight(palette)));
            spans.push(Span::styled(format!(" {action}  "), styles::key_hint(palette)));
        }
        Line::from(spans)
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn key_hints(app: &App) -> Vec<(&'static str, &'static str)> {
    let mut hints = match app.scene() {
        Scene::Intro => vec![("Enter", "start")],
        Scene::Debrief => vec![("Enter", "continue"), ("s", "skip")],
        Scene::Revenue => vec![("↑↓", "focus"), ("Esc", "clear"), ("Enter", "continue")],
        Scene::Blind | Scene::Adjust => {
            let mut hints = vec![("Enter", "submit"), ("↑↓", "select")];
            if app.input_mode() == InputMode::Presets {
                hints.push(("1-5", "preset"));
            } else {
                hints.push(("←→", "adjust"));
            }
            hints.extend([("m", "mode"), ("r", "random"), ("s", "save")]);
            hints
        }
        Scene::Compare => vec![("v", "view"), ("R", "restart")],
    };
    hints.extend([("Tab", "layer"), ("b", "debrief"), ("q", "quit")]);
    hints
}

fn draw_confirm_prompt(frame: &mut Frame, app: &App, palette: &Palette) {
    let Some(prompt) = app.confirm_prompt() else {
        return;
    };
    let max_width = frame.area().width.saturating_sub(8).clamp(20, 64);
    let lines = vec![
        Line::from(Span::styled(
            " Unsaved changes ",
            Style::default()
                .fg(palette.text_primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            prompt.message,
            Style::default().fg(palette.text_secondary),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", styles::key_highlight(palette)),
            Span::styled(" switch and discard  ", styles::key_hint(palette)),
            Span::styled("n/Esc", styles::key_highlight(palette)),
            Span::styled(" stay", styles::key_hint(palette)),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.warning))
        .style(Style::default().bg(palette.bg_panel))
        .padding(Padding::horizontal(1));

    let width = max_width.saturating_add(4);
    let height = 10;
    let area = frame.area();
    let rect = Rect {
        x: area.x + (area.width.saturating_sub(width) / 2),
        y: area.y + (area.height.saturating_sub(height) / 2),
        width: width.min(area.width),
        height: height.min(area.height),
    };
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(block),
        rect,
    );
}

fn sector_label(icon: &str, name: &str, glyphs: &Glyphs) -> String {
    if glyphs.icons && !icon.is_empty() {
        format!("{icon} {name}")
    } else {
        name.to_string()
    }
}

fn name_width(app: &App, glyphs: &Glyphs) -> usize {
    app.registry()
        .iter()
        .map(|s| sector_label(s.icon(), s.name(), glyphs).width())
        .max()
        .unwrap_or(0)
}

/// Right-pad `text` to `width` display columns.
fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(text.width());
    format!("{text}{}", " ".repeat(fill))
}

/// Horizontal bar of `width` cells, filled in proportion to `percent`.
fn bar(percent: u32, width: usize, glyphs: &Glyphs) -> String {
    let percent = percent.min(100) as usize;
    let filled = (percent * width + 50) / 100;
    format!(
        "{}{}",
        glyphs.bar_full.repeat(filled),
        glyphs.bar_empty.repeat(width - filled)
    )
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use civic_engine::{MemoryStore, SectorRegistry, ThreadRandom, UiOptions};

    use super::*;

    fn ascii() -> Glyphs {
        glyphs(UiOptions {
            ascii_only: true,
            high_contrast: false,
        })
    }

    fn test_app() -> App {
        App::new(
            SectorRegistry::ottawa_2025(),
            Box::new(MemoryStore::new()),
            Box::new(ThreadRandom),
            UiOptions {
                ascii_only: true,
                high_contrast: false,
            },
        )
    }

    fn render(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 36)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn bar_fills_in_proportion() {
        let g = ascii();
        assert_eq!(bar(50, 10, &g), "#####.....");
        assert_eq!(bar(0, 4, &g), "....");
        assert_eq!(bar(100, 4, &g), "####");
        assert_eq!(bar(250, 4, &g), "####");
    }

    #[test]
    fn pad_uses_display_width() {
        assert_eq!(pad("ab", 4), "ab  ");
        assert_eq!(pad("abcdef", 4), "abcdef");
    }

    #[test]
    fn intro_renders_without_pie() {
        let mut app = test_app();
        let screen = render(&mut app);
        assert!(screen.contains("Civic"));
        assert!(screen.contains("Operating"));
        assert!(app.pie_region().is_none());
    }

    #[test]
    fn blind_scene_records_pie_region_and_sliders() {
        let mut app = test_app();
        app.continue_scene();
        app.skip();
        let screen = render(&mut app);
        assert!(screen.contains("Transit"));
        assert!(screen.contains("100% allocated"));
        let region = app.pie_region().unwrap();
        assert!(region.width > 0 && region.height > 0);
    }

    #[test]
    fn confirm_prompt_is_drawn_over_the_scene() {
        let mut app = test_app();
        app.continue_scene();
        app.skip();
        app.set_slider(0, 30);
        app.toggle_layer();
        let screen = render(&mut app);
        assert!(screen.contains("Unsaved changes"));
    }

    #[test]
    fn compare_scene_shows_metrics() {
        let mut app = test_app();
        app.continue_scene();
        app.skip();
        app.submit().unwrap();
        app.submit().unwrap();
        app.submit().unwrap();
        assert_eq!(app.scene(), Scene::Compare);
        let screen = render(&mut app);
        assert!(screen.contains("Awareness"));
        assert!(screen.contains("Alignment"));
    }
}
