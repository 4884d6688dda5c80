use cardioimmune_core::Catalog;
use cardioimmune_server::AppState;

pub fn run(host: &str, port: u16, seed: u64, samples: usize) {
    let table = super::load_table(seed, samples);

    let base = format!("http://{host}:{port}");

    println!("🫀 CardioImmune Atlas v{}", cardioimmune_core::VERSION);
    println!("   {base}");
    println!(
        "   {} rows from {}{}",
        table.len(),
        table.source(),
        if table.is_simulated() { " (simulated placeholder)" } else { "" }
    );
    println!();
    println!("   Endpoints:");
    println!("     GET /                          Dashboard page (params: cell, gene)");
    println!("     GET /api                       API index");
    println!("     GET /api/v1/cell-types         Cell types with marker genes");
    println!("     GET /api/v1/cell-types/<name>  One cell type");
    println!("     GET /api/v1/expression?gene=   Expression rows for a gene");
    println!("     GET /api/v1/figure?gene=       Plotly figure JSON for a gene");
    println!("     GET /health                    Health check");
    println!();
    println!("   Examples:");
    println!("     curl {base}/api/v1/cell-types");
    println!("     curl '{base}/api/v1/figure?gene=CD68'");
    println!();

    let state = AppState::new(Catalog::builtin(), table);
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = rt.block_on(cardioimmune_server::run_server(state, host, port)) {
        eprintln!("Server error on {host}:{port}: {e}");
        std::process::exit(1);
    }
}
