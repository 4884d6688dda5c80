//! CLI for the CardioImmune Atlas: browse immune-cell marker genes and their
//! expression in heart tissues.

mod commands;
mod tui;

use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};

use cardioimmune_core::MAX_SAMPLES_PER_TISSUE;
use commands::ExportFormat;

/// `--samples` accepts 1 through the generator's per-tissue cap.
fn samples_parser() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::new().range(1..=MAX_SAMPLES_PER_TISSUE as u64)
}

#[derive(Parser)]
#[command(name = "cardioimmune")]
#[command(about = "CardioImmune Atlas: immune cell marker explorer for heart tissues")]
#[command(version = cardioimmune_core::VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal dashboard: pick a cell type, then a marker gene
    Explore {
        /// Seed for the simulated expression values
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Samples generated per tissue
        #[arg(long, default_value = "50", value_parser = samples_parser())]
        samples: usize,
    },

    /// Run the browser dashboard and JSON API
    Server {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value = "8050")]
        port: u16,

        /// Seed for the simulated expression values
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Samples generated per tissue
        #[arg(long, default_value = "50", value_parser = samples_parser())]
        samples: usize,
    },

    /// List immune cell types with their marker genes and descriptions
    Catalog {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the expression table (one row per gene, tissue and sample)
    Export {
        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,

        /// Seed for the simulated expression values
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Samples generated per tissue
        #[arg(long, default_value = "50", value_parser = samples_parser())]
        samples: usize,
    },

    /// Print the box-plot figure for one marker gene as Plotly JSON
    Figure {
        /// Marker gene symbol, e.g. CD68
        gene: String,

        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<String>,

        /// Seed for the simulated expression values
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Samples generated per tissue
        #[arg(long, default_value = "50", value_parser = samples_parser())]
        samples: usize,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Explore { seed, samples } => commands::explore::run(seed, samples),
        Commands::Server {
            host,
            port,
            seed,
            samples,
        } => commands::server::run(&host, port, seed, samples),
        Commands::Catalog { json } => commands::catalog::run(json),
        Commands::Export {
            output,
            format,
            seed,
            samples,
        } => commands::export::run(output.as_deref(), format, seed, samples),
        Commands::Figure {
            gene,
            output,
            seed,
            samples,
        } => commands::figure::run(&gene, output.as_deref(), seed, samples),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn server_defaults() {
        let cli = Cli::parse_from(["cardioimmune", "server"]);
        match cli.command {
            Commands::Server {
                host,
                port,
                seed,
                samples,
            } => {
                assert_eq!(host, "127.0.0.1");
                assert_eq!(port, 8050);
                assert_eq!(seed, 42);
                assert_eq!(samples, 50);
            }
            _ => panic!("expected server"),
        }
    }

    #[test]
    fn figure_takes_gene_positional() {
        let cli = Cli::parse_from(["cardioimmune", "figure", "CD68", "--output", "cd68.json"]);
        match cli.command {
            Commands::Figure { gene, output, .. } => {
                assert_eq!(gene, "CD68");
                assert_eq!(output.as_deref(), Some("cd68.json"));
            }
            _ => panic!("expected figure"),
        }
    }

    #[test]
    fn export_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["cardioimmune", "export", "--format", "xlsx"]).is_err());
    }

    #[test]
    fn export_format_parses_to_enum() {
        let cli = Cli::parse_from(["cardioimmune", "export", "--format", "json"]);
        match cli.command {
            Commands::Export { format, .. } => assert_eq!(format, ExportFormat::Json),
            _ => panic!("expected export"),
        }
        let cli = Cli::parse_from(["cardioimmune", "export"]);
        match cli.command {
            Commands::Export { format, .. } => assert_eq!(format, ExportFormat::Csv),
            _ => panic!("expected export"),
        }
    }

    #[test]
    fn samples_flag_is_bounded() {
        for cmd in ["explore", "server", "export"] {
            assert!(Cli::try_parse_from(["cardioimmune", cmd, "--samples", "0"]).is_err());
            assert!(Cli::try_parse_from(["cardioimmune", cmd, "--samples", "100001"]).is_err());
            assert!(
                Cli::try_parse_from(["cardioimmune", cmd, "--samples", "18446744073709551615"])
                    .is_err()
            );
        }
        let cli = Cli::parse_from(["cardioimmune", "figure", "CD68", "--samples", "100000"]);
        match cli.command {
            Commands::Figure { samples, .. } => assert_eq!(samples, MAX_SAMPLES_PER_TISSUE),
            _ => panic!("expected figure"),
        }
    }
}
