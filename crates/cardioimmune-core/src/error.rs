//! Error type shared by catalog lookups and dashboard selection.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The name is not one of the catalog's cell types.
    #[error("unknown cell type: {0}")]
    NotFound(String),
    /// The gene is not a marker of the currently selected cell type.
    #[error("{gene} is not a marker gene of {cell_type}")]
    GeneNotListed { cell_type: String, gene: String },
}
