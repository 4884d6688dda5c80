//! Chart model for one gene: a box trace per tissue sharing one frame.
//!
//! The model is renderer-agnostic. The terminal dashboard draws it with
//! ratatui, the server draws it as SVG, and [`Figure::to_plotly`] emits a
//! Plotly figure for external tools.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::expression::{ExpressionTable, Tissue};
use crate::summary::BoxSummary;

/// Fixed chart height in pixels for browser renderers.
pub const FIGURE_HEIGHT: u32 = 400;

/// Horizontal spread of overlaid points, as a fraction of the box width.
pub const POINT_JITTER: f64 = 0.5;

const JITTER_SEED: u64 = 0x4a49_5454_4552;

/// One tissue's distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxTrace {
    pub name: String,
    pub tissue: Tissue,
    pub values: Vec<f64>,
    pub summary: Option<BoxSummary>,
    /// Plotly `boxpoints` mode; every underlying point is drawn.
    pub boxpoints: &'static str,
    pub jitter: f64,
}

impl BoxTrace {
    pub fn new(tissue: Tissue, values: Vec<f64>) -> Self {
        Self {
            name: tissue.label().to_string(),
            tissue,
            summary: BoxSummary::from_values(&values),
            values,
            boxpoints: "all",
            jitter: POINT_JITTER,
        }
    }

    /// Points paired with a reproducible horizontal offset in
    /// `[-jitter / 2, jitter / 2]` (box-width units, centred on the box).
    pub fn jittered_points(&self, salt: u64) -> Vec<(f64, f64)> {
        let mut rng = StdRng::seed_from_u64(JITTER_SEED ^ salt);
        let half = self.jitter / 2.0;
        self.values
            .iter()
            .map(|&y| {
                let dx = if half > 0.0 {
                    rng.random_range(-half..=half)
                } else {
                    0.0
                };
                (dx, y)
            })
            .collect()
    }
}

/// A titled chart frame holding zero or more box traces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub gene: String,
    pub title: String,
    pub y_axis_title: String,
    pub height: u32,
    pub traces: Vec<BoxTrace>,
}

impl Figure {
    /// Build the chart for `gene` from every matching row in `table`.
    ///
    /// A gene with no rows gives a figure with no traces.
    pub fn for_gene(table: &ExpressionTable, gene: &str) -> Self {
        let traces: Vec<BoxTrace> = table
            .tissue_groups(gene)
            .into_iter()
            .map(|(tissue, values)| BoxTrace::new(tissue, values))
            .collect();
        let suffix = if table.is_simulated() {
            format!(" ({})", table.source())
        } else {
            String::new()
        };
        Self {
            gene: gene.to_string(),
            title: format!("{gene} Expression in Heart Tissues{suffix}"),
            y_axis_title: "TPM".to_string(),
            height: FIGURE_HEIGHT,
            traces,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    pub fn trace(&self, tissue: Tissue) -> Option<&BoxTrace> {
        self.traces.iter().find(|t| t.tissue == tissue)
    }

    /// Smallest and largest value across every trace.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        let mut values = self.traces.iter().flat_map(|t| t.values.iter().copied());
        let first = values.next()?;
        Some(values.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    /// Axis bounds with 10% padding; a flat range is widened by one unit.
    pub fn y_bounds(&self) -> (f64, f64) {
        match self.value_range() {
            Some((lo, hi)) if hi > lo => {
                let pad = (hi - lo) * 0.1;
                (lo - pad, hi + pad)
            }
            Some((v, _)) => (v - 1.0, v + 1.0),
            None => (0.0, 1.0),
        }
    }

    /// Plotly-compatible figure JSON (`data` + `layout`).
    pub fn to_plotly(&self) -> serde_json::Value {
        let data: Vec<serde_json::Value> = self
            .traces
            .iter()
            .map(|t| {
                serde_json::json!({
                    "type": "box",
                    "name": t.name,
                    "y": t.values,
                    "boxpoints": t.boxpoints,
                    "jitter": t.jitter,
                })
            })
            .collect();
        serde_json::json!({
            "data": data,
            "layout": {
                "title": { "text": self.title },
                "yaxis": { "title": { "text": self.y_axis_title } },
                "height": self.height,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{ExpressionRow, load_expression_data};

    #[test]
    fn cd68_has_two_traces_of_fifty() {
        let fig = Figure::for_gene(&load_expression_data(), "CD68");
        assert_eq!(fig.traces.len(), 2);
        assert_eq!(fig.traces[0].name, "Heart_Atrial");
        assert_eq!(fig.traces[1].name, "Heart_Ventricular");
        assert!(fig.traces.iter().all(|t| t.values.len() == 50));
        assert!(fig.traces.iter().all(|t| t.summary.is_some()));
    }

    #[test]
    fn title_names_gene_and_simulation() {
        let fig = Figure::for_gene(&load_expression_data(), "MPO");
        assert_eq!(fig.title, "MPO Expression in Heart Tissues (GTEx Simulated)");
        assert_eq!(fig.y_axis_title, "TPM");
        assert_eq!(fig.height, 400);
    }

    #[test]
    fn measured_table_has_plain_title() {
        let table = ExpressionTable::new(
            "atlas",
            false,
            vec![ExpressionRow {
                gene: "KIT".into(),
                tissue: Tissue::HeartVentricular,
                sample: 0,
                tpm: 3.0,
            }],
        );
        let fig = Figure::for_gene(&table, "KIT");
        assert_eq!(fig.title, "KIT Expression in Heart Tissues");
        assert_eq!(fig.traces.len(), 1);
        assert!(fig.trace(Tissue::HeartAtrial).is_none());
    }

    #[test]
    fn unknown_gene_gives_empty_figure() {
        let fig = Figure::for_gene(&load_expression_data(), "NOPE");
        assert!(fig.is_empty());
        assert_eq!(fig.value_range(), None);
        assert_eq!(fig.y_bounds(), (0.0, 1.0));
    }

    #[test]
    fn bounds_cover_all_points() {
        let fig = Figure::for_gene(&load_expression_data(), "CD14");
        let (lo, hi) = fig.y_bounds();
        for t in &fig.traces {
            assert!(t.values.iter().all(|v| *v > lo && *v < hi));
        }
    }

    #[test]
    fn jitter_is_bounded_and_reproducible() {
        let fig = Figure::for_gene(&load_expression_data(), "CD68");
        let trace = &fig.traces[0];
        let a = trace.jittered_points(0);
        let b = trace.jittered_points(0);
        assert_eq!(a, b);
        assert_eq!(a.len(), 50);
        for ((dx, y), v) in a.iter().zip(&trace.values) {
            assert!(dx.abs() <= POINT_JITTER / 2.0);
            assert_eq!(y, v);
        }
    }

    #[test]
    fn plotly_json_shape() {
        let fig = Figure::for_gene(&load_expression_data(), "CD68");
        let json = fig.to_plotly();
        let data = json["data"].as_array().unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0]["type"], "box");
        assert_eq!(data[0]["boxpoints"], "all");
        assert_eq!(data[0]["jitter"], 0.5);
        assert_eq!(data[1]["y"].as_array().unwrap().len(), 50);
        assert_eq!(json["layout"]["yaxis"]["title"]["text"], "TPM");
        assert_eq!(json["layout"]["height"], 400);
    }
}
