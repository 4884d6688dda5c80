use std::fs::File;
use std::io::{self, BufWriter, Write};

use cardioimmune_core::ExpressionTable;

use super::ExportFormat;

pub fn run(output: Option<&str>, format: ExportFormat, seed: u64, samples: usize) {
    let table = super::load_table(seed, samples);

    let result = match output {
        Some(path) => File::create(path).and_then(|f| write_table(&table, format, BufWriter::new(f))),
        None => write_table(&table, format, io::stdout().lock()),
    };

    match (result, output) {
        (Ok(()), Some(path)) => {
            eprintln!("Exported {} rows ({}) to {path}", table.len(), table.source());
        }
        (Ok(()), None) => {}
        (Err(e), Some(path)) => {
            eprintln!("Failed to write {path}: {e}");
            std::process::exit(1);
        }
        (Err(e), None) => {
            eprintln!("Failed to write table: {e}");
            std::process::exit(1);
        }
    }
}

fn write_table<W: Write>(table: &ExpressionTable, format: ExportFormat, mut writer: W) -> io::Result<()> {
    match format {
        ExportFormat::Csv => table.write_csv(writer),
        ExportFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, table).map_err(io::Error::other)?;
            writeln!(writer)?;
            writer.flush()
        }
    }
}
