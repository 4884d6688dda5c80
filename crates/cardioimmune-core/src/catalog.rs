//! Static immune-cell marker catalog.
//!
//! The catalog maps each cardiac immune-cell type to an ordered list of marker
//! gene symbols and a one-sentence description. It is a literal table that
//! lives for the whole process; there is no mutation API.

use serde::Serialize;

use crate::CatalogError;

/// One immune-cell type with its marker genes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellTypeEntry {
    /// Display name, unique within the catalog.
    pub name: &'static str,
    /// Marker gene symbols in display order. Never empty.
    pub genes: &'static [&'static str],
    pub description: &'static str,
}

impl CellTypeEntry {
    /// Whether `gene` is one of this entry's markers.
    pub fn lists_gene(&self, gene: &str) -> bool {
        self.genes.iter().any(|g| *g == gene)
    }

    /// First marker gene, the default selection for this entry. `None` only
    /// for entries built through [`Catalog::from_static`] with no markers.
    pub fn default_gene(&self) -> Option<&'static str> {
        self.genes.first().copied()
    }
}

const MACROPHAGES: &[&str] = &["CD68", "CD163", "MRC1", "MARCO"];
const MONOCYTES: &[&str] = &["CD14", "FCN1", "LYZ"];
const NEUTROPHILS: &[&str] = &["S100A8", "S100A9", "MPO"];
const CD4_T: &[&str] = &["CD4", "IL7R", "FOXP3"];
const CD8_T: &[&str] = &["CD8A", "GZMB", "PRF1"];
const B_CELLS: &[&str] = &["CD19", "MS4A1", "CD79A"];
const NK_CELLS: &[&str] = &["NCAM1", "NKG7", "KLRK1"];
const EOSINOPHILS: &[&str] = &["SIGLEC8", "IL5RA", "CCR3"];
const MAST_CELLS: &[&str] = &["TPSAB1", "CPA3", "KIT"];

const BUILTIN_ENTRIES: &[CellTypeEntry] = &[
    CellTypeEntry {
        name: "Macrophages",
        genes: MACROPHAGES,
        description: "Macrophages clear debris, regulate inflammation, and aid tissue repair.",
    },
    CellTypeEntry {
        name: "Monocytes",
        genes: MONOCYTES,
        description: "Monocytes are recruited during inflammation and differentiate into macrophages.",
    },
    CellTypeEntry {
        name: "Neutrophils",
        genes: NEUTROPHILS,
        description: "Neutrophils are first responders that fight infection and modulate inflammation.",
    },
    CellTypeEntry {
        name: "CD4+ T cells",
        genes: CD4_T,
        description: "CD4+ T cells coordinate immune responses and regulate other immune cells.",
    },
    CellTypeEntry {
        name: "CD8+ T cells",
        genes: CD8_T,
        description: "CD8+ T cells directly kill infected or damaged cells.",
    },
    CellTypeEntry {
        name: "B cells",
        genes: B_CELLS,
        description: "B cells produce antibodies and mediate humoral immunity.",
    },
    CellTypeEntry {
        name: "NK cells",
        genes: NK_CELLS,
        description: "Natural Killer cells target virus-infected and cancerous cells.",
    },
    CellTypeEntry {
        name: "Eosinophils",
        genes: EOSINOPHILS,
        description: "Eosinophils are involved in parasitic defense and allergic responses.",
    },
    CellTypeEntry {
        name: "Mast cells",
        genes: MAST_CELLS,
        description: "Mast cells release histamine and modulate inflammation.",
    },
];

/// Read-only view over a static table of [`CellTypeEntry`] values.
#[derive(Debug, Clone, Copy)]
pub struct Catalog {
    entries: &'static [CellTypeEntry],
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// The built-in cardiac immune-cell catalog.
    pub const fn builtin() -> Self {
        Self {
            entries: BUILTIN_ENTRIES,
        }
    }

    /// Wrap a caller-provided static table.
    ///
    /// Entries with an empty gene list are not rejected here; callers building
    /// custom tables are expected to keep every list non-empty.
    pub const fn from_static(entries: &'static [CellTypeEntry]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'static [CellTypeEntry] {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cell-type names in display order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.name).collect()
    }

    /// Look up an entry by exact name.
    pub fn get(&self, name: &str) -> Result<&'static CellTypeEntry, CatalogError> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))
    }

    /// Position of `name` in display order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }

    /// Every marker gene in catalog order, keeping only the first occurrence
    /// of a symbol listed by more than one entry.
    pub fn genes(&self) -> Vec<&'static str> {
        let mut out: Vec<&'static str> = Vec::new();
        for entry in self.entries {
            for &gene in entry.genes {
                if !out.contains(&gene) {
                    out.push(gene);
                }
            }
        }
        out
    }

    /// Entries whose marker list contains `gene`.
    pub fn cell_types_for_gene(&self, gene: &str) -> Vec<&'static CellTypeEntry> {
        self.entries.iter().filter(|e| e.lists_gene(gene)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_entry_has_markers() {
        for entry in Catalog::builtin().entries() {
            assert!(!entry.genes.is_empty(), "{} has no genes", entry.name);
        }
    }

    #[test]
    fn names_are_unique_and_ordered() {
        let names = Catalog::builtin().names();
        assert_eq!(names.len(), 9);
        assert_eq!(names[0], "Macrophages");
        assert_eq!(names[1], "Monocytes");
        assert_eq!(names[8], "Mast cells");
        for (i, a) in names.iter().enumerate() {
            assert!(!names[i + 1..].contains(a), "duplicate name {a}");
        }
    }

    #[test]
    fn macrophages_lookup() {
        let entry = Catalog::builtin().get("Macrophages").unwrap();
        assert_eq!(entry.genes, &["CD68", "CD163", "MRC1", "MARCO"]);
        assert_eq!(
            entry.description,
            "Macrophages clear debris, regulate inflammation, and aid tissue repair."
        );
        assert_eq!(entry.default_gene(), Some("CD68"));
    }

    #[test]
    fn entry_without_markers_has_no_default_gene() {
        static BARE: [CellTypeEntry; 1] = [CellTypeEntry {
            name: "Unannotated",
            genes: &[],
            description: "No markers yet.",
        }];
        let catalog = Catalog::from_static(&BARE);
        let entry = catalog.get("Unannotated").unwrap();
        assert_eq!(entry.default_gene(), None);
        assert!(!entry.lists_gene("CD68"));
        assert!(catalog.genes().is_empty());
    }

    #[test]
    fn unknown_name_is_not_found() {
        let err = Catalog::builtin().get("Platelets").unwrap_err();
        assert_eq!(err, CatalogError::NotFound("Platelets".to_string()));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert!(Catalog::builtin().get("macrophages").is_err());
    }

    #[test]
    fn gene_universe_covers_every_entry() {
        let catalog = Catalog::builtin();
        let genes = catalog.genes();
        assert_eq!(genes.len(), 28);
        assert_eq!(genes.first(), Some(&"CD68"));
        assert_eq!(genes.last(), Some(&"KIT"));
        for entry in catalog.entries() {
            for gene in entry.genes {
                assert!(genes.contains(gene));
            }
        }
    }

    #[test]
    fn repeated_gene_is_listed_once() {
        static SHARED: &[CellTypeEntry] = &[
            CellTypeEntry {
                name: "A",
                genes: &["X", "Y"],
                description: "a",
            },
            CellTypeEntry {
                name: "B",
                genes: &["Y", "Z"],
                description: "b",
            },
        ];
        let catalog = Catalog::from_static(SHARED);
        assert_eq!(catalog.genes(), vec!["X", "Y", "Z"]);
        let owners: Vec<&str> = catalog
            .cell_types_for_gene("Y")
            .iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(owners, vec!["A", "B"]);
    }

    #[test]
    fn builtin_genes_trace_to_one_entry() {
        let catalog = Catalog::builtin();
        for gene in catalog.genes() {
            assert_eq!(catalog.cell_types_for_gene(gene).len(), 1, "{gene}");
        }
    }
}
