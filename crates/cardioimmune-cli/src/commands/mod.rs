pub mod catalog;
pub mod explore;
pub mod export;
pub mod figure;
pub mod server;

use cardioimmune_core::{
    Catalog, ExpressionSource, ExpressionTable, SimulatedGtex, SimulationParams,
};

/// Build the simulated expression table for the built-in catalog.
///
/// Only the seed and sample count are exposed on the command line; the
/// per-tissue means and spread keep their defaults.
pub fn load_table(seed: u64, samples: usize) -> ExpressionTable {
    let source = SimulatedGtex::new(SimulationParams {
        seed,
        samples_per_tissue: samples,
        ..SimulationParams::default()
    });
    let table = source.load(&Catalog::builtin());
    log::debug!(
        "loaded {} rows from {} (seed {seed})",
        table.len(),
        source.name()
    );
    table
}

/// Output format for table export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_table_default_size() {
        let table = load_table(42, 50);
        assert_eq!(table.len(), 28 * 2 * 50);
        assert!(table.is_simulated());
    }

    #[test]
    fn test_load_table_sample_override() {
        let table = load_table(1, 3);
        assert_eq!(table.for_gene("CD68").count(), 6);
    }

    #[test]
    fn test_load_table_seed_reproducible() {
        let a = load_table(5, 10);
        let b = load_table(5, 10);
        let tpm = |t: &ExpressionTable| t.rows().iter().map(|r| r.tpm).collect::<Vec<_>>();
        assert_eq!(tpm(&a), tpm(&b));
    }
}
