use cardioimmune_core::{Catalog, Figure};

pub fn run(gene: &str, output: Option<&str>, seed: u64, samples: usize) {
    let catalog = Catalog::builtin();
    if catalog.cell_types_for_gene(gene).is_empty() {
        eprintln!("Unknown marker gene '{gene}'. Use `cardioimmune catalog` to list genes.");
        std::process::exit(1);
    }

    let table = super::load_table(seed, samples);
    let figure = Figure::for_gene(&table, gene);
    let json = match serde_json::to_string_pretty(&figure.to_plotly()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to serialize figure: {e}");
            std::process::exit(1);
        }
    };

    match output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &json) {
                eprintln!("Failed to write figure to {path}: {e}");
                std::process::exit(1);
            }
            eprintln!("📄 {} saved to: {path}", figure.title);
        }
        None => println!("{json}"),
    }
}
