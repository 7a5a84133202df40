mod cmd;
mod core;
mod import;

use clap::{Parser, Subcommand};
use cmd::inventory::InventoryCommand;
use cmd::report::ReportCommand;
use cmd::schema::SchemaCommand;
use cmd::summary::SummaryCommand;
use cmd::validate::ValidateCommand;

#[derive(Parser, Debug)]
#[command(name = "fifotax", version)]
#[command(about = "FIFO capital gains for CoinTracking double-entry ledgers")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Match disposals, print detail and summary, write both to CSV
    Report(ReportCommand),
    /// Totals per asset and counter class
    Summary(SummaryCommand),
    /// List oversold and unlinked disposals; exits 1 when any are found
    Validate(ValidateCommand),
    /// Lots still open after matching
    Inventory(InventoryCommand),
    /// Print the expected ledger columns or the report JSON schema
    Schema(SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Report(cmd) => cmd.exec(),
        Command::Summary(cmd) => cmd.exec(),
        Command::Validate(cmd) => cmd.exec(),
        Command::Inventory(cmd) => cmd.exec(),
        Command::Schema(cmd) => cmd.exec(),
    }
}
