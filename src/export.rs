//! Serializes a transaction collection into downloadable CSV and JSON
//! documents.
//!
//! Both exporters are pure and total: any valid collection, including an
//! empty one, produces a well-formed artifact. Range and search filtering
//! happen before export, in [crate::filter]; the exporters never contact
//! the store or the network.

use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::{Category, Error, transaction::Transaction};

/// The fixed column order of the CSV export.
const CSV_HEADERS: [&str; 6] = ["Date", "Title", "Category", "Type", "Amount (INR)", "Notes"];

/// Render the collection as CSV, one row per transaction in input order.
///
/// Dates are written as `YYYY-MM-DD` and amounts bare: no currency symbol,
/// no thousands separators. Fields containing the delimiter, quotes or
/// newlines are quoted with internal quotes doubled.
///
/// # Errors
/// This function will return a [Error::CSVSerializationError] if a record
/// cannot be written.
pub fn to_csv(transactions: &[Transaction]) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(CSV_HEADERS)
        .map_err(|error| Error::CSVSerializationError(error.to_string()))?;

    for transaction in transactions {
        writer
            .write_record([
                transaction.date.to_string(),
                transaction.title.clone(),
                transaction.category.to_string(),
                transaction.category.flow_label().to_owned(),
                transaction.amount.to_string(),
                transaction.notes.clone(),
            ])
            .map_err(|error| Error::CSVSerializationError(error.to_string()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CSVSerializationError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::CSVSerializationError(error.to_string()))
}

/// The wrapper document produced by [to_json].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    /// When the export was produced, as an RFC 3339 timestamp.
    pub exported_at: String,
    /// The number of exported transactions.
    pub count: usize,
    /// The exported records, in input order.
    pub transactions: Vec<ExportRecord>,
}

/// One exported transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    /// The transaction date.
    pub date: time::Date,
    /// The transaction title.
    pub title: String,
    /// The transaction category.
    pub category: Category,
    /// The coarse flow direction: `"income"` or `"expense"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// The transaction amount, numeric.
    pub amount: f64,
    /// The transaction notes, empty when none were recorded.
    pub notes: String,
}

impl From<&Transaction> for ExportRecord {
    fn from(transaction: &Transaction) -> Self {
        let kind = if transaction.category.is_income() {
            "income"
        } else {
            "expense"
        };

        Self {
            date: transaction.date,
            title: transaction.title.clone(),
            category: transaction.category,
            kind: kind.to_owned(),
            amount: transaction.amount,
            notes: transaction.notes.clone(),
        }
    }
}

/// Render the collection as a pretty-printed JSON document carrying an
/// export timestamp, a record count and the full list of transactions.
///
/// # Errors
/// This function will return a [Error::JSONSerializationError] if the
/// document cannot be serialized.
pub fn to_json(transactions: &[Transaction]) -> Result<String, Error> {
    let exported_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

    let document = ExportDocument {
        exported_at,
        count: transactions.len(),
        transactions: transactions.iter().map(ExportRecord::from).collect(),
    };

    serde_json::to_string_pretty(&document)
        .map_err(|error| Error::JSONSerializationError(error.to_string()))
}

#[cfg(test)]
mod export_tests {
    use time::{Date, macros::date};

    use crate::{Category, transaction::Transaction};

    use super::{ExportDocument, to_csv, to_json};

    fn create_test_transaction(
        title: &str,
        amount: f64,
        category: Category,
        date: Date,
        notes: &str,
    ) -> Transaction {
        Transaction {
            id: title.to_lowercase().replace(' ', "-"),
            title: title.to_owned(),
            amount,
            category,
            date,
            notes: notes.to_owned(),
            created_at: time::macros::datetime!(2024-03-01 12:00 UTC),
            updated_at: None,
        }
    }

    fn create_test_collection() -> Vec<Transaction> {
        vec![
            create_test_transaction(
                "Salary",
                50000.0,
                Category::Income,
                date!(2024 - 01 - 10),
                "",
            ),
            create_test_transaction(
                "Groceries",
                1200.5,
                Category::Food,
                date!(2024 - 01 - 15),
                "weekly shop",
            ),
        ]
    }

    #[test]
    fn csv_starts_with_the_fixed_header_row() {
        let csv = to_csv(&create_test_collection()).expect("export should succeed");

        let header = csv.lines().next().unwrap();
        assert_eq!(header, "Date,Title,Category,Type,Amount (INR),Notes");
    }

    #[test]
    fn csv_writes_one_row_per_transaction_in_input_order() {
        let csv = to_csv(&create_test_collection()).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "2024-01-10,Salary,Income,Income,50000,");
        assert_eq!(lines[2], "2024-01-15,Groceries,Food,Expense,1200.5,weekly shop");
    }

    #[test]
    fn csv_quotes_fields_containing_delimiters_and_doubles_quotes() {
        let transactions = vec![create_test_transaction(
            "Coffee, the \"good\" kind",
            450.0,
            Category::Food,
            date!(2024 - 02 - 01),
            "",
        )];

        let csv = to_csv(&transactions).unwrap();

        assert!(csv.contains("\"Coffee, the \"\"good\"\" kind\""));
    }

    #[test]
    fn csv_of_empty_collection_is_just_the_header() {
        let csv = to_csv(&[]).unwrap();

        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn json_wraps_records_with_timestamp_and_count() {
        let json = to_json(&create_test_collection()).expect("export should succeed");

        let document: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(document["count"], 2);
        assert!(document["exported_at"].is_string());
        assert_eq!(document["transactions"][0]["type"], "income");
        assert_eq!(document["transactions"][1]["type"], "expense");
        assert_eq!(document["transactions"][1]["amount"], 1200.5);
    }

    #[test]
    fn json_round_trips_the_exported_fields() {
        let transactions = create_test_collection();

        let json = to_json(&transactions).unwrap();
        let document: ExportDocument =
            serde_json::from_str(&json).expect("export should parse back");

        assert_eq!(document.count, transactions.len());
        for (record, transaction) in document.transactions.iter().zip(&transactions) {
            assert_eq!(record.date, transaction.date);
            assert_eq!(record.title, transaction.title);
            assert_eq!(record.category, transaction.category);
            assert_eq!(record.amount, transaction.amount);
        }
    }

    #[test]
    fn json_of_empty_collection_is_well_formed() {
        let json = to_json(&[]).unwrap();

        let document: ExportDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(document.count, 0);
        assert!(document.transactions.is_empty());
    }
}
