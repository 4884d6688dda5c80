//! TUI application state and event loop.
//!
//! Two dependent lists stand in for the browser dropdowns: the cell-type list
//! drives the gene list, and the gene list drives the chart. Every key press
//! mutates the [`Dashboard`] selection and the next frame recomputes the view.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use ratatui::widgets::ListState;

use cardioimmune_core::{Catalog, Dashboard, DashboardView, ExpressionTable};

// ---------------------------------------------------------------------------
// Focus
// ---------------------------------------------------------------------------

/// Which list the arrow keys move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    CellTypes,
    Genes,
}

impl Focus {
    pub fn toggle(self) -> Self {
        match self {
            Self::CellTypes => Self::Genes,
            Self::Genes => Self::CellTypes,
        }
    }
}

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

pub struct App {
    dashboard: Dashboard,
    focus: Focus,
    running: bool,
    cell_state: ListState,
    gene_state: ListState,
    last_export: Option<PathBuf>,
    export_error: Option<String>,
}

impl App {
    pub fn new(table: ExpressionTable) -> Self {
        let dashboard = Dashboard::new(Catalog::builtin(), Arc::new(table));
        let mut app = Self {
            dashboard,
            focus: Focus::default(),
            running: true,
            cell_state: ListState::default(),
            gene_state: ListState::default(),
            last_export: None,
            export_error: None,
        };
        app.sync_list_states();
        app
    }

    pub fn run(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Restore the terminal before a panic message is printed.
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen, crossterm::cursor::Show);
            original_hook(info);
        }));

        let result = self.run_loop(&mut terminal);

        let _ = std::panic::take_hook();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            crossterm::cursor::Show
        )?;

        if let Some(path) = &self.last_export {
            println!("Last figure exported to {}", path.display());
        }

        result
    }

    fn run_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> io::Result<()> {
        while self.running {
            terminal.draw(|f| super::ui::draw(f, self))?;

            // Nothing changes between events, so block until the next one.
            if let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key.code);
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                self.focus = self.focus.toggle();
            }
            KeyCode::Char('h') => self.focus = Focus::CellTypes,
            KeyCode::Char('l') => self.focus = Focus::Genes,
            KeyCode::Up | KeyCode::Char('k') => match self.focus {
                Focus::CellTypes => self.dashboard.prev_cell_type(),
                Focus::Genes => self.dashboard.prev_gene(),
            },
            KeyCode::Down | KeyCode::Char('j') => match self.focus {
                Focus::CellTypes => self.dashboard.next_cell_type(),
                Focus::Genes => self.dashboard.next_gene(),
            },
            KeyCode::Enter => {
                if self.focus == Focus::CellTypes {
                    self.focus = Focus::Genes;
                }
            }
            KeyCode::Char('s') => self.export_snapshot(),
            _ => {}
        }
        self.sync_list_states();
    }

    fn sync_list_states(&mut self) {
        self.cell_state.select(Some(self.dashboard.cell_index()));
        let gene = if self.dashboard.gene_options().is_empty() {
            None
        } else {
            Some(self.dashboard.gene_index())
        };
        self.gene_state.select(gene);
    }

    /// Write the current view (selection, description and figure) as JSON
    /// into the working directory.
    fn export_snapshot(&mut self) {
        let gene = self.dashboard.selected_gene().unwrap_or("none");
        let epoch = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let path = PathBuf::from(format!("cardioimmune-{gene}-{epoch}.json"));
        match export_view(&self.dashboard.view(), &path) {
            Ok(()) => {
                log::debug!("exported view to {}", path.display());
                self.last_export = Some(path);
                self.export_error = None;
            }
            Err(e) => self.export_error = Some(e.to_string()),
        }
    }

    // --- Accessors for the renderer ---

    pub fn view(&self) -> DashboardView {
        self.dashboard.view()
    }
    pub fn focus(&self) -> Focus {
        self.focus
    }
    pub fn is_running(&self) -> bool {
        self.running
    }
    pub fn source_name(&self) -> &str {
        self.dashboard.table().source()
    }
    pub fn is_simulated(&self) -> bool {
        self.dashboard.table().is_simulated()
    }
    pub fn last_export(&self) -> Option<&PathBuf> {
        self.last_export.as_ref()
    }
    pub fn export_error(&self) -> Option<&str> {
        self.export_error.as_deref()
    }
    pub fn cell_state_mut(&mut self) -> &mut ListState {
        &mut self.cell_state
    }
    pub fn gene_state_mut(&mut self) -> &mut ListState {
        &mut self.gene_state
    }
}

fn export_view(view: &DashboardView, path: &std::path::Path) -> io::Result<()> {
    let contents = serde_json::to_string_pretty(view).map_err(io::Error::other)?;
    std::fs::write(path, contents)
}
