//! Selection state behind both dashboards.
//!
//! The whole UI state is two indices: the selected cell type and the selected
//! gene within that cell type's marker list. Every control change goes through
//! a method here and the dependent view (gene options, description, figure) is
//! recomputed from scratch by [`Dashboard::view`].

use std::sync::Arc;

use serde::Serialize;

use crate::CatalogError;
use crate::catalog::{Catalog, CellTypeEntry};
use crate::expression::ExpressionTable;
use crate::figure::Figure;

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub cell_types: Vec<&'static str>,
    pub selected_cell_type: Option<&'static str>,
    pub description: Option<&'static str>,
    pub genes: &'static [&'static str],
    pub selected_gene: Option<&'static str>,
    pub figure: Figure,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    catalog: Catalog,
    table: Arc<ExpressionTable>,
    cell: usize,
    gene: usize,
}

impl Dashboard {
    /// Start on the first cell type and its first marker gene.
    pub fn new(catalog: Catalog, table: Arc<ExpressionTable>) -> Self {
        Self {
            catalog,
            table,
            cell: 0,
            gene: 0,
        }
    }

    /// Restore a selection from untrusted names (query strings).
    ///
    /// An unknown cell type keeps the first one. A gene that is missing or
    /// not listed by the chosen cell type keeps that cell type's first gene.
    pub fn with_selection(
        catalog: Catalog,
        table: Arc<ExpressionTable>,
        cell_type: Option<&str>,
        gene: Option<&str>,
    ) -> Self {
        let mut dash = Self::new(catalog, table);
        if let Some(name) = cell_type
            && let Err(e) = dash.select_cell_type(name)
        {
            log::debug!("ignoring selection: {e}");
        }
        if let Some(gene) = gene
            && let Err(e) = dash.select_gene(gene)
        {
            log::debug!("ignoring selection: {e}");
        }
        dash
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn table(&self) -> &ExpressionTable {
        &self.table
    }

    pub fn selected_entry(&self) -> Option<&'static CellTypeEntry> {
        self.catalog.entries().get(self.cell)
    }

    pub fn selected_cell_type(&self) -> Option<&'static str> {
        self.selected_entry().map(|e| e.name)
    }

    pub fn cell_index(&self) -> usize {
        self.cell
    }

    /// Marker genes offered by the second control.
    pub fn gene_options(&self) -> &'static [&'static str] {
        match self.selected_entry() {
            Some(entry) => entry.genes,
            None => &[],
        }
    }

    pub fn gene_index(&self) -> usize {
        self.gene
    }

    pub fn selected_gene(&self) -> Option<&'static str> {
        self.gene_options().get(self.gene).copied()
    }

    pub fn description(&self) -> Option<&'static str> {
        self.selected_entry().map(|e| e.description)
    }

    /// Select a cell type by name. Changing the cell type resets the gene to
    /// the new entry's first marker; re-selecting the current one keeps it.
    pub fn select_cell_type(&mut self, name: &str) -> Result<(), CatalogError> {
        let idx = self
            .catalog
            .position(name)
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))?;
        self.set_cell(idx);
        Ok(())
    }

    /// Select a gene from the current cell type's markers.
    pub fn select_gene(&mut self, gene: &str) -> Result<(), CatalogError> {
        let idx = self
            .gene_options()
            .iter()
            .position(|g| *g == gene)
            .ok_or_else(|| CatalogError::GeneNotListed {
                cell_type: self.selected_cell_type().unwrap_or_default().to_string(),
                gene: gene.to_string(),
            })?;
        self.gene = idx;
        Ok(())
    }

    pub fn next_cell_type(&mut self) {
        let n = self.catalog.len();
        if n > 0 {
            self.set_cell((self.cell + 1) % n);
        }
    }

    pub fn prev_cell_type(&mut self) {
        let n = self.catalog.len();
        if n > 0 {
            self.set_cell((self.cell + n - 1) % n);
        }
    }

    pub fn next_gene(&mut self) {
        let n = self.gene_options().len();
        if n > 0 {
            self.gene = (self.gene + 1) % n;
        }
    }

    pub fn prev_gene(&mut self) {
        let n = self.gene_options().len();
        if n > 0 {
            self.gene = (self.gene + n - 1) % n;
        }
    }

    fn set_cell(&mut self, idx: usize) {
        if idx != self.cell {
            self.cell = idx;
            self.gene = 0;
        }
    }

    /// Chart for the selected gene; empty when nothing is selected.
    pub fn figure(&self) -> Figure {
        Figure::for_gene(&self.table, self.selected_gene().unwrap_or_default())
    }

    pub fn view(&self) -> DashboardView {
        DashboardView {
            cell_types: self.catalog.names(),
            selected_cell_type: self.selected_cell_type(),
            description: self.description(),
            genes: self.gene_options(),
            selected_gene: self.selected_gene(),
            figure: self.figure(),
        }
    }
}
