//! cardledger CLI - credit card statement to CSV
//!
//! Usage:
//!   cardledger extract statement.json --password ABCD0100 --bank axis
//!   cardledger layouts
//!   cardledger config init

use anyhow::{Context, Result, bail};
use cardledger_core::{CardField, TransactionField};
use cardledger_export::{CsvExporter, default_filename};
use cardledger_ingest::{
    CreditCardStatement, DocumentLoader, ExtractedDumpLoader, Layout, StatementDocument,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "cardledger",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CARDLEDGER_BUILD_SHA"), ")"),
    about = "Extract credit card statement transactions to CSV"
)]
struct Cli {
    /// Verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a statement and write its transactions to CSV
    Extract {
        /// Extracted statement (JSON dump of page text and tables)
        statement: PathBuf,

        /// Statement password
        #[arg(long, default_value = "")]
        password: String,

        /// Bank layout (axis, hdfc); detected from the statement when omitted
        #[arg(long)]
        bank: Option<Layout>,

        /// Output CSV path (default: "<card name>-<last 4>.csv")
        #[arg(long)]
        out: Option<PathBuf>,

        /// Transaction columns, e.g. DATE,AMOUNT,TYPE
        #[arg(long, value_delimiter = ',')]
        fields: Option<Vec<TransactionField>>,

        /// Card columns repeated on every row, e.g. CARDNAME,BANKNAME
        #[arg(long, value_delimiter = ',')]
        card_fields: Option<Vec<CardField>>,

        /// Use the layout's fixed page/row range instead of searching for
        /// the end-of-statement marker
        #[arg(long)]
        fixed_range: bool,
    },

    /// List supported bank layouts
    Layouts,

    /// Manage ~/.cardledger/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Command::Extract {
            statement,
            password,
            bank,
            out,
            fields,
            card_fields,
            fixed_range,
        } => {
            let cfg = config::load_config()?;
            let opts = ExtractOptions {
                bank,
                out,
                fields,
                card_fields,
                fixed_range,
            };
            extract(&cfg, &statement, &password, opts)?;
        }

        Command::Layouts => {
            for layout in Layout::ALL {
                let spec = layout.spec();
                println!(
                    "{:<6} {:<10} category column: {:<3} start: page {} row {}",
                    layout.tag(),
                    spec.bank_name,
                    if spec.category_column.is_some() { "yes" } else { "no" },
                    spec.start_page,
                    spec.start_row
                );
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}

struct ExtractOptions {
    bank: Option<Layout>,
    out: Option<PathBuf>,
    fields: Option<Vec<TransactionField>>,
    card_fields: Option<Vec<CardField>>,
    fixed_range: bool,
}

fn extract(cfg: &Config, path: &Path, password: &str, opts: ExtractOptions) -> Result<()> {
    if !path.exists() {
        bail!("statement not found: {}", path.display());
    }

    let doc = ExtractedDumpLoader
        .open(path, password)
        .with_context(|| format!("opening {}", path.display()))?;

    let preferred = match opts.bank {
        Some(layout) => Some(layout),
        None => cfg.default_layout()?,
    };
    let layout = match preferred {
        Some(layout) => layout,
        None => {
            let text = doc.full_text()?;
            Layout::detect(&text).context("could not detect the bank; pass --bank axis|hdfc")?
        }
    };
    debug!(%layout, fixed_range = opts.fixed_range, "layout selected");

    let statement = if opts.fixed_range {
        CreditCardStatement::from_document_with_range(&doc, layout, &layout.fixed_range())
    } else {
        CreditCardStatement::from_document(&doc, layout)
    }
    .with_context(|| format!("parsing {} as {}", path.display(), layout.bank_name()))?;

    let exporter = CsvExporter::new()
        .with_transaction_fields(match opts.fields {
            Some(fields) => fields,
            None => cfg.transaction_fields()?,
        })
        .with_card_fields(match opts.card_fields {
            Some(fields) => fields,
            None => cfg.card_fields()?,
        });

    let target = output_path(cfg, &statement, opts.out);
    let written = exporter.export(&statement, Some(target.as_path()))?;

    let (credits, debits) = statement.totals();
    println!(
        "{} | {} transactions | credits {:.2} | debits {:.2} -> {}",
        statement,
        statement.transactions().len(),
        credits,
        debits,
        written.display()
    );

    Ok(())
}

fn output_path(cfg: &Config, statement: &CreditCardStatement, out: Option<PathBuf>) -> PathBuf {
    match (out, &cfg.export.output_dir) {
        (Some(out), _) => out,
        (None, Some(dir)) => dir.join(default_filename(statement)),
        (None, None) => PathBuf::from(default_filename(statement)),
    }
}
