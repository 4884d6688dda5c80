pub fn run(seed: u64, samples: usize) {
    let table = super::load_table(seed, samples);
    let mut app = crate::tui::app::App::new(table);
    if let Err(e) = app.run() {
        eprintln!("TUI error: {e}");
        std::process::exit(1);
    }
}
