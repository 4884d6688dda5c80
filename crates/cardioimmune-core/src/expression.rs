//! Expression data: the tabular source seam and the simulated GTEx generator.
//!
//! Every chart is fed from an [`ExpressionTable`], a flat list of
//! (gene, tissue, sample, TPM) rows. Tables come from an [`ExpressionSource`].
//! The only source shipped here is [`SimulatedGtex`], which draws normally
//! distributed TPM values from a fixed seed. **It is a placeholder, not atlas
//! data**: a real deployment swaps in a source that queries an expression
//! atlas and returns the same row shape.

use std::fmt;
use std::io::{self, Write};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::Serialize;

use crate::catalog::Catalog;

// ---------------------------------------------------------------------------
// Tissue
// ---------------------------------------------------------------------------

/// Heart tissue a measurement was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Tissue {
    #[serde(rename = "Heart_Atrial")]
    HeartAtrial,
    #[serde(rename = "Heart_Ventricular")]
    HeartVentricular,
}

impl Tissue {
    /// Both tissues in generation and plotting order.
    pub const ALL: [Tissue; 2] = [Tissue::HeartAtrial, Tissue::HeartVentricular];

    pub fn label(self) -> &'static str {
        match self {
            Self::HeartAtrial => "Heart_Atrial",
            Self::HeartVentricular => "Heart_Ventricular",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }
}

impl fmt::Display for Tissue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Rows and table
// ---------------------------------------------------------------------------

/// One expression measurement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpressionRow {
    pub gene: String,
    pub tissue: Tissue,
    /// Index of this sample within its gene/tissue group.
    pub sample: usize,
    /// Transcripts per million.
    pub tpm: f64,
}

/// Flat table of expression rows, in the order the source produced them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ExpressionTable {
    source: String,
    simulated: bool,
    rows: Vec<ExpressionRow>,
}

impl ExpressionTable {
    pub fn new(source: impl Into<String>, simulated: bool, rows: Vec<ExpressionRow>) -> Self {
        Self {
            source: source.into(),
            simulated,
            rows,
        }
    }

    /// Name of the source that produced the rows.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// True when the values are synthetic placeholders.
    pub fn is_simulated(&self) -> bool {
        self.simulated
    }

    pub fn rows(&self) -> &[ExpressionRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows for one gene. Unknown genes yield an empty iterator.
    pub fn for_gene<'a>(&'a self, gene: &'a str) -> impl Iterator<Item = &'a ExpressionRow> + 'a {
        self.rows.iter().filter(move |r| r.gene == gene)
    }

    /// TPM values for one gene grouped by tissue, groups in order of first
    /// appearance in the table.
    pub fn tissue_groups(&self, gene: &str) -> Vec<(Tissue, Vec<f64>)> {
        let mut groups: Vec<(Tissue, Vec<f64>)> = Vec::new();
        for row in self.for_gene(gene) {
            match groups.iter_mut().find(|(t, _)| *t == row.tissue) {
                Some((_, values)) => values.push(row.tpm),
                None => groups.push((row.tissue, vec![row.tpm])),
            }
        }
        groups
    }

    /// Distinct genes in order of first appearance.
    pub fn genes(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !out.contains(&row.gene.as_str()) {
                out.push(&row.gene);
            }
        }
        out
    }

    /// Write the table as CSV with a `Gene,Tissue,Sample,TPM` header.
    pub fn write_csv<W: Write>(&self, writer: W) -> io::Result<()> {
        let mut w = io::BufWriter::new(writer);
        writeln!(w, "Gene,Tissue,Sample,TPM")?;
        for row in &self.rows {
            writeln!(w, "{},{},{},{}", row.gene, row.tissue, row.sample, row.tpm)?;
        }
        w.flush()
    }
}

// ---------------------------------------------------------------------------
// Source trait
// ---------------------------------------------------------------------------

/// Anything that can produce expression rows for a catalog's genes.
pub trait ExpressionSource {
    /// Short identifier shown in UI footers and API responses.
    fn name(&self) -> &str;

    /// Whether the values are synthetic.
    fn is_simulated(&self) -> bool {
        false
    }

    /// Produce rows for every gene in `catalog`.
    fn load(&self, catalog: &Catalog) -> ExpressionTable;
}

// ---------------------------------------------------------------------------
// Simulated GTEx
// ---------------------------------------------------------------------------

/// Upper bound on `samples_per_tissue`; larger requests are clamped.
pub const MAX_SAMPLES_PER_TISSUE: usize = 100_000;

/// Generation parameters for [`SimulatedGtex`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimulationParams {
    pub seed: u64,
    pub samples_per_tissue: usize,
    pub atrial_mean: f64,
    pub ventricular_mean: f64,
    pub std_dev: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            seed: 42,
            samples_per_tissue: 50,
            atrial_mean: 2.0,
            ventricular_mean: 5.0,
            std_dev: 0.5,
        }
    }
}

impl SimulationParams {
    pub fn mean_for(&self, tissue: Tissue) -> f64 {
        match tissue {
            Tissue::HeartAtrial => self.atrial_mean,
            Tissue::HeartVentricular => self.ventricular_mean,
        }
    }

    fn is_valid(&self) -> bool {
        self.atrial_mean.is_finite()
            && self.ventricular_mean.is_finite()
            && self.std_dev.is_finite()
            && self.std_dev >= 0.0
    }
}

/// Fixed-seed normal draws standing in for GTEx heart-tissue measurements.
#[derive(Debug, Clone, Default)]
pub struct SimulatedGtex {
    params: SimulationParams,
}

impl SimulatedGtex {
    /// Distributions that cannot be sampled (non-finite means, negative or
    /// non-finite spread) are replaced by the defaults.
    ///
    /// Sample counts above [`MAX_SAMPLES_PER_TISSUE`] are clamped to it.
    pub fn new(mut params: SimulationParams) -> Self {
        if params.samples_per_tissue > MAX_SAMPLES_PER_TISSUE {
            log::warn!(
                "{} samples per tissue requested, clamping to {MAX_SAMPLES_PER_TISSUE}",
                params.samples_per_tissue
            );
            params.samples_per_tissue = MAX_SAMPLES_PER_TISSUE;
        }
        let params = if params.is_valid() {
            params
        } else {
            log::warn!("invalid simulation parameters {params:?}, using defaults");
            SimulationParams {
                seed: params.seed,
                samples_per_tissue: params.samples_per_tissue,
                ..SimulationParams::default()
            }
        };
        Self { params }
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    /// One draw from N(mean(tissue), std_dev^2).
    fn draw<R: Rng>(&self, tissue: Tissue, rng: &mut R) -> f64 {
        let z: f64 = rng.sample(StandardNormal);
        self.params.mean_for(tissue) + self.params.std_dev * z
    }
}

impl ExpressionSource for SimulatedGtex {
    fn name(&self) -> &str {
        "GTEx Simulated"
    }

    fn is_simulated(&self) -> bool {
        true
    }

    fn load(&self, catalog: &Catalog) -> ExpressionTable {
        let genes = catalog.genes();
        let n = self.params.samples_per_tissue;
        let mut rng = StdRng::seed_from_u64(self.params.seed);

        let capacity = genes
            .len()
            .checked_mul(Tissue::ALL.len() * n)
            .unwrap_or(0);
        let mut rows = Vec::with_capacity(capacity);
        for gene in &genes {
            for tissue in Tissue::ALL {
                for sample in 0..n {
                    rows.push(ExpressionRow {
                        gene: gene.to_string(),
                        tissue,
                        sample,
                        tpm: self.draw(tissue, &mut rng),
                    });
                }
            }
        }

        log::debug!(
            "simulated {} rows for {} genes (seed {})",
            rows.len(),
            genes.len(),
            self.params.seed
        );
        ExpressionTable::new(self.name(), true, rows)
    }
}

/// Generate the default simulated table for the built-in catalog.
pub fn load_expression_data() -> ExpressionTable {
    SimulatedGtex::default().load(&Catalog::builtin())
}
