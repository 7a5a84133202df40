//! Reading double-entry ledger CSV exports into canonical ledger rows

pub mod headers;
pub mod values;

use crate::core::LedgerRow;
use chrono::Datelike;
use headers::ColumnMap;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("missing columns in CSV: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("line {line}: invalid {column} '{value}'")]
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },
    #[error("CSV file is empty")]
    Empty,
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportOptions {
    /// Field delimiter; sniffed from the header line when not given
    pub delimiter: Option<u8>,
    /// Keep only rows dated in this calendar year
    pub year: Option<i32>,
}

const CANDIDATE_DELIMITERS: &[u8] = b",;\t|";

/// Pick the delimiter occurring most often outside quotes in the header line
pub fn sniff_delimiter(content: &str) -> u8 {
    let header = content.lines().next().unwrap_or_default();
    let mut counts = [0usize; 4];
    let mut in_quotes = false;
    for b in header.bytes() {
        if b == b'"' {
            in_quotes = !in_quotes;
        } else if !in_quotes {
            if let Some(i) = CANDIDATE_DELIMITERS.iter().position(|d| *d == b) {
                counts[i] += 1;
            }
        }
    }

    // `max_by_key` returns the last maximum; scan in reverse so ties keep the first candidate
    counts
        .iter()
        .enumerate()
        .rev()
        .max_by_key(|(_, c)| **c)
        .filter(|(_, c)| **c > 0)
        .map_or(b',', |(i, _)| CANDIDATE_DELIMITERS[i])
}

/// Read a ledger CSV file into rows, in file order
pub fn read_ledger(path: &Path, options: &ImportOptions) -> anyhow::Result<Vec<LedgerRow>> {
    let content = std::fs::read_to_string(path)?;
    let rows = parse_ledger(&content, options)?;
    log::info!("Read {} ledger rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Parse ledger CSV content into rows, in file order
pub fn parse_ledger(content: &str, options: &ImportOptions) -> Result<Vec<LedgerRow>, ImportError> {
    let content = content.trim_start_matches('\u{feff}');
    if content.trim().is_empty() {
        return Err(ImportError::Empty);
    }

    let delimiter = options.delimiter.unwrap_or_else(|| sniff_delimiter(content));
    log::debug!("Using delimiter {:?}", delimiter as char);

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(content.as_bytes());
    let columns = ColumnMap::from_headers(rdr.headers()?.iter())?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for record in rdr.records() {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        let field = |i: usize| record.get(i).unwrap_or_default();

        let Some(datetime) = values::parse_datetime(field(columns.date)) else {
            log::warn!(
                "Skipping line {}: unparseable date '{}'",
                line,
                field(columns.date)
            );
            skipped += 1;
            continue;
        };
        if options.year.is_some_and(|y| datetime.year() != y) {
            continue;
        }

        let quantity = values::parse_quantity(field(columns.quantity)).ok_or_else(|| {
            ImportError::InvalidNumber {
                line,
                column: "quantity",
                value: field(columns.quantity).to_string(),
            }
        })?;
        let value =
            values::parse_money(field(columns.value)).ok_or_else(|| ImportError::InvalidNumber {
                line,
                column: "value",
                value: field(columns.value).to_string(),
            })?;

        rows.push(LedgerRow::new(
            datetime,
            field(columns.trade_id),
            field(columns.asset),
            field(columns.kind).trim(),
            quantity,
            value,
        ));
    }

    if skipped > 0 {
        log::warn!("Skipped {} rows with unparseable dates", skipped);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classify::OperationKind;
    use rust_decimal_macros::dec;

    const SPANISH: &str = "\u{feff}\"Tipo\";\"Cantidad\";\"Cur.\";\"Valor en EUR en la transacción\";\"Trade ID\";\"Fecha de operación\"
\"Venta\";\"-0.5\";\"BTC\";\"-20,000.00\";\"T2\";\"15.06.2024 10:00:00\"
\"Compra\";\"1\";\"BTC\";\"30,000.00\";\"T1\";\"01.02.2024 09:30:00\"
\"Compra\";\"20000\";\"EUR\";\"20,000.00\";\"T2\";\"15.06.2024 10:00:00\"
\"Comisión\";\"-10\";\"EUR\";\"-10.00\";\"T2\";\"15.06.2024 10:00:00\"
\"Compra\";\"0.1\";\"BTC\";\"3,000.00\";\"T0\";\"20.12.2023 08:00:00\"
";

    #[test]
    fn sniffs_common_delimiters() {
        assert_eq!(sniff_delimiter("a;b;c\n1;2;3"), b';');
        assert_eq!(sniff_delimiter("a\tb\tc"), b'\t');
        assert_eq!(sniff_delimiter("a,b,c"), b',');
        assert_eq!(sniff_delimiter("\"x;y\",b,c"), b',');
        assert_eq!(sniff_delimiter("a|b"), b'|');
        assert_eq!(sniff_delimiter("single"), b',');
        assert_eq!(sniff_delimiter("a,b;c"), b',');
    }

    #[test]
    fn parses_spanish_export() {
        let rows = parse_ledger(SPANISH, &ImportOptions::default()).unwrap();
        assert_eq!(rows.len(), 5);

        let kinds: Vec<_> = rows.iter().map(|r| (r.kind, r.asset.as_str())).collect();
        assert_eq!(
            kinds,
            vec![
                (OperationKind::Disposal, "BTC"),
                (OperationKind::Acquisition, "BTC"),
                (OperationKind::Acquisition, "EUR"),
                (OperationKind::Fee, "EUR"),
                (OperationKind::Acquisition, "BTC"),
            ]
        );
        assert_eq!(rows[4].trade_id, "T0");

        let sale = &rows[0];
        assert_eq!(sale.quantity, dec!(0.5));
        assert_eq!(sale.value, dec!(20000));
        assert_eq!(rows[3].value, dec!(10));
    }

    #[test]
    fn year_filter() {
        let options = ImportOptions {
            year: Some(2023),
            ..ImportOptions::default()
        };
        let rows = parse_ledger(SPANISH, &options).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].trade_id, "T0");
    }

    #[test]
    fn explicit_delimiter() {
        let content = "date|type|amount|cur|eur|trade_id\n2024-01-01|Buy|1|ETH|2000|A\n";
        let options = ImportOptions {
            delimiter: Some(b'|'),
            ..ImportOptions::default()
        };
        let rows = parse_ledger(content, &options).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].asset, "ETH");
    }

    #[test]
    fn dash_value_is_zero() {
        let content = "date,type,amount,cur,eur,trade_id\n2024-01-01,Deposit,1,ETH,-,\n";
        let rows = parse_ledger(content, &ImportOptions::default()).unwrap();
        assert_eq!(rows[0].value, dec!(0));
        assert_eq!(rows[0].trade_id, "");
        assert_eq!(rows[0].kind, OperationKind::Other);
    }

    #[test]
    fn bad_dates_are_skipped() {
        let content = "date,type,amount,cur,eur,trade_id\nnot a date,Buy,1,ETH,10,A\n2024-01-01,Buy,1,ETH,10,B\n";
        let rows = parse_ledger(content, &ImportOptions::default()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].trade_id, "B");
    }

    #[test]
    fn bad_quantity_is_fatal() {
        let content = "date,type,amount,cur,eur,trade_id\n2024-01-01,Buy,lots,ETH,10,A\n";
        let err = parse_ledger(content, &ImportOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            ImportError::InvalidNumber {
                line: 2,
                column: "quantity",
                ..
            }
        ));
    }

    #[test]
    fn missing_columns_are_fatal() {
        let content = "date,type,amount\n2024-01-01,Buy,1\n";
        let err = parse_ledger(content, &ImportOptions::default()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing columns in CSV: asset, value, trade_id"
        );
    }

    #[test]
    fn empty_input() {
        assert!(matches!(
            parse_ledger("", &ImportOptions::default()),
            Err(ImportError::Empty)
        ));
    }
}
