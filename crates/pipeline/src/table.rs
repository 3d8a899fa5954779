//! Input table reading and report export.
//!
//! The input is a delimited file with headers; one column carries the
//! transaction digests and every other column passes through to the report
//! unchanged, with the classification columns appended.

use std::path::Path;

use analyzer_core::{Classification, Error, Result};

/// An input table held in memory: headers plus string rows.
#[derive(Debug, Clone, Default)]
pub struct InputTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl InputTable {
    /// Values of the named column, whitespace-trimmed. Unknown names fail
    /// with the available columns spelled out.
    pub fn column(&self, name: &str) -> Result<Vec<String>> {
        let index = self.headers.iter().position(|h| h == name).ok_or_else(|| {
            Error::input(format!(
                "column '{}' not found; available: {}",
                name,
                self.headers.join(", ")
            ))
        })?;
        Ok(self
            .rows
            .iter()
            .map(|row| {
                row.get(index)
                    .map(|value| value.trim().to_string())
                    .unwrap_or_default()
            })
            .collect())
    }
}

/// Read a delimited file into memory. Tab-separated when the extension is
/// `.tsv`, comma-separated otherwise.
pub fn read_table(path: &Path) -> Result<InputTable> {
    let delimiter = match path.extension().and_then(|e| e.to_str()) {
        Some("tsv") => b'\t',
        _ => b',',
    };
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(str::to_string).collect());
    }
    Ok(InputTable { headers, rows })
}

/// Classification column headers appended to the report; the target-amount
/// header carries the keyword it was filtered by.
pub fn result_headers(keyword: &str) -> Vec<String> {
    vec![
        "Transaction Type".to_string(),
        "Amount (SUI)".to_string(),
        format!("Amount ({keyword})"),
        "Timestamp".to_string(),
        "Sender".to_string(),
        "Recipient".to_string(),
        "Gas Fees (SUI)".to_string(),
    ]
}

/// Render one classification as report cells, in [`result_headers`] order.
pub fn result_cells(result: &Classification) -> Vec<String> {
    vec![
        result.kind.as_str().to_string(),
        result.amount.to_string(),
        result
            .target_amount
            .map(|v| v.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
        result.timestamp.clone(),
        result.sender.clone(),
        result.recipient.clone(),
        result.gas_fee.to_string(),
    ]
}

/// Write the enriched report: original columns preserved, classification
/// columns appended. One output row per input row, same order.
pub fn write_report(
    path: &Path,
    table: &InputTable,
    results: &[Classification],
    keyword: &str,
) -> Result<()> {
    if table.rows.len() != results.len() {
        return Err(Error::report(format!(
            "{} input rows but {} results",
            table.rows.len(),
            results.len()
        )));
    }

    let mut writer = csv::Writer::from_path(path)?;
    let mut headers = table.headers.clone();
    headers.extend(result_headers(keyword));
    writer.write_record(&headers)?;

    for (row, result) in table.rows.iter().zip(results) {
        let mut cells = row.clone();
        // Short rows pad out so the appended columns stay aligned.
        cells.resize(table.headers.len(), String::new());
        cells.extend(result_cells(result));
        writer.write_record(&cells)?;
    }
    writer.flush()?;
    Ok(())
}
