//! TUI rendering.
//!
//! ┌──────────────────────────────────────────────────────┐
//! │  🫀 CardioImmune Atlas v2   Immune Cell Marker Explorer │
//! ├──────────────────┬───────────────────────────────────┤
//! │  Cell types      │  Macrophages                      │
//! │  ▸ Macrophages   │  Macrophages clear debris, ...    │
//! │    Monocytes     ├───────────────────────────────────┤
//! │    ...           │  CD68 Expression in Heart Tissues │
//! ├──────────────────┤     ┌─┐                           │
//! │  Marker genes    │     │─│ · ·        ┌─┐            │
//! │  ▸ CD68          │     └─┘            │─│            │
//! │    CD163         │  Heart_Atrial   Heart_Ventricular │
//! ├──────────────────┴───────────────────────────────────┤
//! │  tab: switch list   ↑↓ select   s: export   q: quit  │
//! └──────────────────────────────────────────────────────┘

use cardioimmune_core::{BoxTrace, DashboardView, Figure};
use ratatui::{prelude::*, widgets::*};

use super::app::{App, Focus};

/// Half the width of a drawn box, in x-axis units (one unit per tissue).
const BOX_HALF_WIDTH: f64 = 0.2;

const TRACE_COLORS: [Color; 2] = [Color::LightBlue, Color::LightRed];

pub fn draw(f: &mut Frame, app: &mut App) {
    let view = app.view();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(12),   // main
            Constraint::Length(1), // keys
        ])
        .split(f.area());

    draw_title(f, rows[0], app);
    draw_main(f, rows[1], app, &view);
    draw_keys(f, rows[2], app);
}

fn draw_title(f: &mut Frame, area: Rect, app: &App) {
    let note = if app.is_simulated() {
        format!("  data: {} (placeholder) ", app.source_name())
    } else {
        format!("  data: {} ", app.source_name())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(Line::from(vec![
            Span::styled(
                " 🫀 CardioImmune Atlas v2 ",
                Style::default().bold().fg(Color::Red),
            ),
            Span::styled(
                " Immune Cell Marker Explorer ",
                Style::default().bold().fg(Color::White),
            ),
            Span::styled(note, Style::default().fg(Color::DarkGray)),
        ]));
    f.render_widget(block, area);
}

fn draw_main(f: &mut Frame, area: Rect, app: &mut App, view: &DashboardView) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(40)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(view.cell_types.len() as u16 + 2),
            Constraint::Min(3),
        ])
        .split(cols[0]);

    let focus = app.focus();
    let cells = selection_list(
        " Cell types ",
        &view.cell_types,
        focus == Focus::CellTypes,
    );
    f.render_stateful_widget(cells, left[0], app.cell_state_mut());

    let genes = selection_list(" Marker genes ", view.genes, focus == Focus::Genes);
    f.render_stateful_widget(genes, left[1], app.gene_state_mut());

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(8)])
        .split(cols[1]);

    draw_info(f, right[0], view);
    draw_chart(f, right[1], &view.figure);
}

fn selection_list<'a>(title: &'a str, items: &[&'a str], focused: bool) -> List<'a> {
    let border = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    List::new(items.iter().map(|s| ListItem::new(*s)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(title),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).fg(Color::White).bold())
        .highlight_symbol("▸ ")
}

fn draw_info(f: &mut Frame, area: Rect, view: &DashboardView) {
    let title = format!(" {} ", view.selected_cell_type.unwrap_or("Info"));
    let mut lines = vec![Line::from(Span::styled(
        view.description.unwrap_or("Select a cell type"),
        Style::default().fg(Color::Cyan),
    ))];

    lines.push(Line::from(vec![
        Span::styled("Markers: ", Style::default().bold()),
        Span::raw(view.genes.join(", ")),
    ]));

    for (i, trace) in view.figure.traces.iter().enumerate() {
        if let Some(s) = trace.summary {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:<18}", trace.name),
                    Style::default().fg(TRACE_COLORS[i % TRACE_COLORS.len()]),
                ),
                Span::raw(format!(
                    "n={}  mean={:.2}  median={:.2}  IQR={:.2}",
                    s.n,
                    s.mean,
                    s.median,
                    s.iqr()
                )),
            ]));
        }
    }

    let block = Block::default().borders(Borders::ALL).title(title);
    let p = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    f.render_widget(p, area);
}

/// Line segments outlining one box, its median and whiskers, centred on `cx`.
fn box_outline(trace: &BoxTrace, cx: f64) -> Vec<Vec<(f64, f64)>> {
    let Some(s) = trace.summary else {
        return Vec::new();
    };
    let (l, r) = (cx - BOX_HALF_WIDTH, cx + BOX_HALF_WIDTH);
    let (cl, cr) = (cx - BOX_HALF_WIDTH / 2.0, cx + BOX_HALF_WIDTH / 2.0);
    vec![
        vec![(l, s.q1), (r, s.q1), (r, s.q3), (l, s.q3), (l, s.q1)],
        vec![(l, s.median), (r, s.median)],
        vec![(cx, s.q3), (cx, s.upper_whisker)],
        vec![(cl, s.upper_whisker), (cr, s.upper_whisker)],
        vec![(cx, s.q1), (cx, s.lower_whisker)],
        vec![(cl, s.lower_whisker), (cr, s.lower_whisker)],
    ]
}

/// Jittered points for one trace, centred on `cx`.
fn point_cloud(trace: &BoxTrace, salt: u64, cx: f64) -> Vec<(f64, f64)> {
    trace
        .jittered_points(salt)
        .into_iter()
        .map(|(dx, y)| (cx + dx * 2.0 * BOX_HALF_WIDTH, y))
        .collect()
}

fn draw_chart(f: &mut Frame, area: Rect, fig: &Figure) {
    if fig.is_empty() {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", fig.title));
        let p = Paragraph::new("No expression data for this gene")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    // Trace i sits at x = i + 1; the axis runs 0..=n+1 so labels land on integers.
    let outlines: Vec<(usize, Vec<Vec<(f64, f64)>>)> = fig
        .traces
        .iter()
        .enumerate()
        .map(|(i, t)| (i, box_outline(t, (i + 1) as f64)))
        .collect();
    let clouds: Vec<(usize, Vec<(f64, f64)>)> = fig
        .traces
        .iter()
        .enumerate()
        .map(|(i, t)| (i, point_cloud(t, i as u64, (i + 1) as f64)))
        .collect();

    let mut datasets = Vec::new();
    for (i, segments) in &outlines {
        let color = TRACE_COLORS[i % TRACE_COLORS.len()];
        for seg in segments {
            datasets.push(
                Dataset::default()
                    .marker(symbols::Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(color))
                    .data(seg),
            );
        }
    }
    for (i, points) in &clouds {
        let color = TRACE_COLORS[i % TRACE_COLORS.len()];
        datasets.push(
            Dataset::default()
                .name(fig.traces[*i].name.clone())
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Scatter)
                .style(Style::default().fg(color))
                .data(points),
        );
    }

    let (y_min, y_max) = fig.y_bounds();
    let mut x_labels = vec![Line::from("")];
    x_labels.extend(fig.traces.iter().map(|t| Line::from(t.name.clone())));
    x_labels.push(Line::from(""));

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", fig.title)),
        )
        .x_axis(
            Axis::default()
                .bounds([0.0, (fig.traces.len() + 1) as f64])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(fig.y_axis_title.clone())
                .bounds([y_min, y_max])
                .labels(vec![
                    Line::from(format!("{y_min:.1}")),
                    Line::from(format!("{:.1}", (y_min + y_max) / 2.0)),
                    Line::from(format!("{y_max:.1}")),
                ]),
        );

    f.render_widget(chart, area);
}

fn draw_keys(f: &mut Frame, area: Rect, app: &App) {
    let status = match (app.export_error(), app.last_export()) {
        (Some(e), _) => format!("   export failed: {e}"),
        (None, Some(path)) => format!("   saved {}", path.display()),
        (None, None) => String::new(),
    };
    let bar = Paragraph::new(format!(
        " tab/←→: switch list   ↑↓ jk: select   s: export figure   q: quit{status}"
    ))
    .style(Style::default().bg(Color::DarkGray).fg(Color::White));
    f.render_widget(bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardioimmune_core::load_expression_data;
    use ratatui::backend::TestBackend;

    #[test]
    fn outline_has_box_median_and_whiskers() {
        let fig = Figure::for_gene(&load_expression_data(), "CD68");
        let segs = box_outline(&fig.traces[0], 1.0);
        assert_eq!(segs.len(), 6);
        assert_eq!(segs[0].len(), 5);
        assert_eq!(segs[0].first(), segs[0].last());
        let s = fig.traces[0].summary.unwrap();
        assert_eq!(
            segs[1],
            vec![
                (1.0 - BOX_HALF_WIDTH, s.median),
                (1.0 + BOX_HALF_WIDTH, s.median)
            ]
        );
    }

    #[test]
    fn points_stay_inside_box_width() {
        let fig = Figure::for_gene(&load_expression_data(), "CD68");
        let pts = point_cloud(&fig.traces[1], 1, 2.0);
        assert_eq!(pts.len(), 50);
        assert!(pts.iter().all(|(x, _)| (x - 2.0).abs() <= BOX_HALF_WIDTH));
    }

    #[test]
    fn renders_full_frame() {
        let mut app = App::new(load_expression_data());
        let mut terminal = Terminal::new(TestBackend::new(120, 36)).unwrap();
        terminal.draw(|f| draw(f, &mut app)).unwrap();

        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("CardioImmune Atlas v2"));
        assert!(text.contains("Macrophages"));
        assert!(text.contains("CD68"));
        assert!(text.contains("Heart_Atrial"));
    }
}
