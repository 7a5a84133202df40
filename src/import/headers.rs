//! Column header normalization onto the canonical ledger schema

use super::ImportError;

/// Canonical column names, in the order the importer reads them
pub const CANONICAL_COLUMNS: &[&str] = &["date", "type", "quantity", "asset", "value", "trade_id"];

/// Accepted header spellings (after BOM strip, trim, lower-case) per canonical column
pub const COLUMN_ALIASES: &[(&str, &[&str])] = &[
    ("date", &["date", "fecha de operación", "fecha"]),
    ("type", &["type", "tipo"]),
    ("quantity", &["quantity", "amount", "cantidad"]),
    ("asset", &["asset", "cur.", "cur", "currency", "moneda"]),
    (
        "value",
        &[
            "value",
            "eur",
            "value in eur",
            "valor en eur en la transacción",
        ],
    ),
    ("trade_id", &["trade_id", "trade id", "id de operación"]),
];

/// Column positions of the canonical fields within a CSV record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: usize,
    pub kind: usize,
    pub quantity: usize,
    pub asset: usize,
    pub value: usize,
    pub trade_id: usize,
}

/// Strip BOM and whitespace and lower-case a raw header
pub fn clean_header(raw: &str) -> String {
    raw.replace('\u{feff}', "").trim().to_lowercase()
}

/// Canonical name for a raw header, if it is a known alias
pub fn canonical_name(raw: &str) -> Option<&'static str> {
    let header = clean_header(raw);
    COLUMN_ALIASES
        .iter()
        .find(|(_, aliases)| aliases.contains(&header.as_str()))
        .map(|(canonical, _)| *canonical)
}

impl ColumnMap {
    /// Locate every canonical column; the first matching header wins.
    pub fn from_headers<'a, I>(headers: I) -> Result<Self, ImportError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut found: [Option<usize>; 6] = [None; 6];
        for (index, header) in headers.into_iter().enumerate() {
            let Some(name) = canonical_name(header) else {
                continue;
            };
            if let Some(slot) = CANONICAL_COLUMNS.iter().position(|c| *c == name) {
                found[slot].get_or_insert(index);
            }
        }

        let missing: Vec<String> = CANONICAL_COLUMNS
            .iter()
            .zip(found.iter())
            .filter(|(_, f)| f.is_none())
            .map(|(name, _)| name.to_string())
            .collect();
        match found {
            [Some(date), Some(kind), Some(quantity), Some(asset), Some(value), Some(trade_id)] => {
                Ok(ColumnMap {
                    date,
                    kind,
                    quantity,
                    asset,
                    value,
                    trade_id,
                })
            }
            _ => Err(ImportError::MissingColumns(missing)),
        }
    }
}
