use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use finboard_core::{FilterSelection, TransactionRecord, parse_month};
use finboard_finance::{Dataset, Pipeline, query};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tracing::info;

mod config;
mod logging;
mod render;
mod state;

#[derive(Parser, Debug)]
#[command(
    name = "finboard",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("FINBOARD_BUILD_SHA"), ")"),
    about = "Categorized cash flow and PnL from a bank transaction export"
)]
struct Cli {
    /// Debug logging for every pipeline stage
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// KPIs, monthly net cash flow and the PnL pivot for the selection
    Report {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Selected transactions, newest first
    Transactions {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Write the PnL pivot with subtotals to a CSV file
    ExportPnl {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        filter: FilterArgs,
        /// Destination CSV
        #[arg(long)]
        out: PathBuf,
    },

    /// Manage ~/.finboard/config.toml
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

#[derive(Args, Debug)]
struct InputArgs {
    /// Bank transaction export (CSV)
    #[arg(long)]
    transactions: PathBuf,

    /// Account lookup (CSV, or XLSX when built with the `xlsx` feature)
    #[arg(long)]
    lookup: PathBuf,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// Keep only these years (repeatable; default: all)
    #[arg(long = "year")]
    years: Vec<i32>,

    /// Keep only these months, by number or name (repeatable; default: all)
    #[arg(long = "month")]
    months: Vec<String>,

    /// Keep only these transaction types (repeatable; default: all)
    #[arg(long = "type")]
    types: Vec<String>,
}

impl FilterArgs {
    /// Start from "everything present" and narrow each dimension that was given.
    fn selection(&self, records: &[TransactionRecord]) -> Result<FilterSelection> {
        let mut selection = FilterSelection::defaults(records);
        if !self.years.is_empty() {
            selection = selection.with_years(self.years.iter().copied());
        }
        if !self.months.is_empty() {
            let months = self
                .months
                .iter()
                .map(|m| parse_month(m).with_context(|| format!("unknown month: {m}")))
                .collect::<Result<Vec<u32>>>()?;
            selection = selection.with_months(months);
        }
        if !self.types.is_empty() {
            selection = selection.with_types(self.types.iter().cloned());
        }
        Ok(selection)
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Command::Report {
            input,
            filter,
            format,
        } => {
            let (pipeline, dataset) = load(&input)?;
            let selection = filter.selection(&dataset.records)?;
            let view = query(&dataset.records, &selection, pipeline.balance_accounts());
            match format {
                Format::Text => print!(
                    "{}",
                    render::report_text(&dataset.audit, &dataset.diagnostics, &view)
                ),
                Format::Json => println!(
                    "{}",
                    render::report_json(&dataset.audit, &dataset.diagnostics, &view)?
                ),
            }
        }

        Command::Transactions {
            input,
            filter,
            format,
        } => {
            let (pipeline, dataset) = load(&input)?;
            let selection = filter.selection(&dataset.records)?;
            let view = query(&dataset.records, &selection, pipeline.balance_accounts());
            match format {
                Format::Text => print!("{}", render::transactions_text(&view.transactions)),
                Format::Json => println!("{}", render::transactions_json(&view)?),
            }
        }

        Command::ExportPnl { input, filter, out } => {
            let (pipeline, dataset) = load(&input)?;
            let selection = filter.selection(&dataset.records)?;
            let view = query(&dataset.records, &selection, pipeline.balance_accounts());

            let file = File::create(&out).with_context(|| format!("create {}", out.display()))?;
            view.pivot
                .write_csv(BufWriter::new(file))
                .with_context(|| format!("write {}", out.display()))?;
            println!(
                "Wrote {} pivot rows ({} months) to {}",
                view.pivot.export_rows().len(),
                view.pivot.months.len(),
                out.display()
            );
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => config::show_config()?,
        },
    }

    Ok(())
}

fn load(input: &InputArgs) -> Result<(Pipeline, Dataset)> {
    for path in [&input.transactions, &input.lookup] {
        if !path.exists() {
            bail!("File not found: {}", path.display());
        }
    }

    let cfg = config::load_config()?;
    info!(
        transactions = %input.transactions.display(),
        lookup = %input.lookup.display(),
        "running pipeline"
    );
    let pipeline = Pipeline::new(&cfg.pipeline()).context("compile category rules")?;
    let dataset = pipeline
        .run_files(&input.transactions, &input.lookup)
        .with_context(|| format!("processing {}", input.transactions.display()))?;
    Ok((pipeline, dataset))
}
