//! Schema command - print the expected ledger columns and the report output format

use super::output::ReportOutput;
use crate::import::headers::{CANONICAL_COLUMNS, COLUMN_ALIASES};
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema, csv-header or csv-fields
    #[arg(value_enum, default_value = "csv-fields")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema of the `report --json` output
    JsonSchema,
    /// CSV header row with canonical column names
    CsvHeader,
    /// Canonical columns with the header spellings accepted for each
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::CsvHeader => self.print_csv_header(),
            SchemaFormat::CsvFields => self.print_csv_fields(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(ReportOutput);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_csv_header(&self) -> anyhow::Result<()> {
        println!("{}", CANONICAL_COLUMNS.join(","));
        Ok(())
    }

    fn print_csv_fields(&self) -> anyhow::Result<()> {
        println!("Ledger CSV Input Format");
        println!("=======================");
        println!();
        for (name, aliases) in COLUMN_ALIASES {
            println!("{:10}  {}", name, aliases.join(" | "));
        }
        println!();
        println!("Headers are matched after removing a BOM, trimming and lower-casing.");
        println!("Separator is sniffed from the header line unless --sep is given.");
        println!("Type labels: compra/buy, venta/sell, comisi*/fee; anything else is ignored.");
        Ok(())
    }
}
