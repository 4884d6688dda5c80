//! # cardioimmune-core
//!
//! **Immune-cell marker explorer for cardiac tissue.**
//!
//! `cardioimmune-core` holds everything behind the CardioImmune Atlas
//! dashboards: a static catalog of cardiac immune-cell types and their marker
//! genes, a source of per-tissue expression measurements, and the box-plot
//! figure comparing atrial and ventricular expression for one gene.
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use cardioimmune_core::{Catalog, Dashboard, load_expression_data};
//!
//! let table = Arc::new(load_expression_data());
//! let mut dash = Dashboard::new(Catalog::builtin(), table);
//!
//! dash.select_cell_type("Monocytes").unwrap();
//! let view = dash.view();
//! assert_eq!(view.genes, &["CD14", "FCN1", "LYZ"]);
//! assert_eq!(view.figure.traces.len(), 2);
//! ```
//!
//! ## Architecture
//!
//! Catalog → ExpressionSource → ExpressionTable → Figure
//!
//! The shipped [`SimulatedGtex`] source draws fixed-seed normal values
//! (atrial mean 2, ventricular mean 5, sd 0.5, 50 samples per tissue). These
//! are placeholders for real atlas measurements; an atlas client implements
//! [`ExpressionSource`] and returns the same row shape.

pub mod catalog;
pub mod dashboard;
pub mod error;
pub mod expression;
pub mod figure;
pub mod summary;

pub use catalog::{Catalog, CellTypeEntry};
pub use dashboard::{Dashboard, DashboardView};
pub use error::CatalogError;
pub use expression::{
    ExpressionRow, ExpressionSource, ExpressionTable, MAX_SAMPLES_PER_TISSUE, SimulatedGtex,
    SimulationParams, Tissue, load_expression_data,
};
pub use figure::{BoxTrace, FIGURE_HEIGHT, Figure, POINT_JITTER};
pub use summary::BoxSummary;

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
