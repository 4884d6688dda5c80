//! Server-side SVG rendering of a [`Figure`] with plotters.

use std::error::Error;

use cardioimmune_core::{BoxTrace, Figure};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

const WIDTH: u32 = 800;

/// Half a box's width in x-axis units (one unit per tissue).
const BOX_HALF_WIDTH: f64 = 0.3;

/// Trace colours, cycled.
const PALETTE: [RGBColor; 2] = [RGBColor(0x63, 0x6e, 0xfa), RGBColor(0xef, 0x55, 0x3b)];

type Chart<'a, 'b> = ChartContext<'a, SVGBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Escape text for HTML content and attribute values.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the figure as a standalone `<svg>` document.
///
/// Drawing failures are logged and whatever was drawn so far is returned.
pub fn render(fig: &Figure) -> String {
    let mut out = String::new();
    if let Err(e) = draw(fig, &mut out) {
        log::warn!("failed to draw figure for {}: {e}", fig.gene);
    }
    out
}

fn draw(fig: &Figure, out: &mut String) -> Result<(), Box<dyn Error>> {
    let root = SVGBackend::with_string(out, (WIDTH, fig.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let slots = fig.traces.len().max(1);
    let (y_lo, y_hi) = fig.y_bounds();
    let mut chart = ChartBuilder::on(&root)
        .caption(&fig.title, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5..(slots as f64 - 0.5), y_lo..y_hi)?;

    let tissue_label = |x: &f64| label_at(fig, *x);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(2 * slots + 1)
        .x_label_formatter(&tissue_label)
        .y_desc(fig.y_axis_title.clone())
        .draw()?;

    if fig.is_empty() {
        let style = ("sans-serif", 16)
            .into_font()
            .color(&RGBColor(0x88, 0x88, 0x88))
            .pos(Pos::new(HPos::Center, VPos::Center));
        chart.draw_series(std::iter::once(Text::new(
            "No expression data",
            (0.0, (y_lo + y_hi) / 2.0),
            style,
        )))?;
    }

    for (i, trace) in fig.traces.iter().enumerate() {
        draw_trace(&mut chart, trace, i, PALETTE[i % PALETTE.len()])?;
    }

    root.present()?;
    Ok(())
}

/// Tissue name for the tick at a trace centre; other ticks stay blank.
fn label_at(fig: &Figure, x: f64) -> String {
    let slot = x.round();
    if slot < 0.0 || (x - slot).abs() > 1e-6 {
        return String::new();
    }
    fig.traces
        .get(slot as usize)
        .map(|t| t.name.clone())
        .unwrap_or_default()
}

fn draw_trace(
    chart: &mut Chart<'_, '_>,
    trace: &BoxTrace,
    index: usize,
    color: RGBColor,
) -> Result<(), Box<dyn Error>> {
    let cx = index as f64;
    let (l, r) = (cx - BOX_HALF_WIDTH, cx + BOX_HALF_WIDTH);

    if let Some(s) = trace.summary {
        chart.draw_series([
            Rectangle::new([(l, s.q3), (r, s.q1)], color.mix(0.3).filled()),
            Rectangle::new([(l, s.q3), (r, s.q1)], color.stroke_width(1)),
        ])?;

        let cap = BOX_HALF_WIDTH / 2.0;
        chart.draw_series(
            [
                vec![(l, s.median), (r, s.median)],
                vec![(cx, s.q3), (cx, s.upper_whisker)],
                vec![(cx - cap, s.upper_whisker), (cx + cap, s.upper_whisker)],
                vec![(cx, s.q1), (cx, s.lower_whisker)],
                vec![(cx - cap, s.lower_whisker), (cx + cap, s.lower_whisker)],
            ]
            .into_iter()
            .map(|points| PathElement::new(points, color.stroke_width(2))),
        )?;
    }

    // Offsets are in box widths; the full box is 2 * BOX_HALF_WIDTH wide.
    chart.draw_series(
        trace
            .jittered_points(index as u64)
            .into_iter()
            .map(|(dx, y)| {
                Circle::new((cx + dx * 2.0 * BOX_HALF_WIDTH, y), 3, color.mix(0.7).filled())
            }),
    )?;
    Ok(())
}
