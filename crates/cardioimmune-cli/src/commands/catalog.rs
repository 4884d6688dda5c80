use cardioimmune_core::{Catalog, CellTypeEntry};

pub fn run(json: bool) {
    let catalog = Catalog::builtin();

    if json {
        match serde_json::to_string_pretty(catalog.entries()) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Failed to serialize catalog: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    println!("{} immune cell types, {} marker genes", catalog.len(), catalog.genes().len());
    println!();
    for entry in catalog.entries() {
        println!("{}", format_entry(entry));
    }
}

fn format_entry(entry: &CellTypeEntry) -> String {
    format!(
        "  {:<14} {}\n  {:<14} {}\n",
        entry.name,
        entry.genes.join(", "),
        "",
        entry.description
    )
}
