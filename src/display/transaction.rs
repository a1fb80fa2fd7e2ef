//! Transaction display formatting
//!
//! Transaction tables and detail views. Amounts above the alert threshold are
//! flagged with `!`.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::report::truncate;
use crate::models::{Amount, Transaction};

/// Marker shown beside transactions above the alert threshold
pub const FLAG_MARKER: &str = "!";

#[derive(Tabled)]
struct TransactionRow {
    #[tabled(rename = "")]
    flag: &'static str,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Type")]
    kind: &'static str,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Format a list of transactions as a table
pub fn format_transaction_list(
    transactions: &[Transaction],
    threshold: Amount,
    date_format: &str,
    currency: &str,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.".to_string();
    }

    let rows = transactions.iter().map(|txn| TransactionRow {
        flag: if txn.exceeds_threshold(threshold) {
            FLAG_MARKER
        } else {
            ""
        },
        id: txn.id.to_string(),
        date: txn.date.format(date_format).to_string(),
        description: truncate(&txn.description, 30),
        category: txn.category.clone(),
        kind: txn.transaction_type.as_str(),
        amount: txn.amount.format_with_symbol(currency),
    });

    let mut output = Table::new(rows).with(Style::psql()).to_string();

    let flagged = transactions
        .iter()
        .filter(|t| t.exceeds_threshold(threshold))
        .count();
    if flagged > 0 {
        output.push_str(&format!(
            "\n\n{} = amount over the alert threshold of {} ({} flagged)",
            FLAG_MARKER,
            threshold.format_with_symbol(currency),
            flagged
        ));
    }

    output
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, threshold: Amount, currency: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Date:        {}\n", txn.date.format("%Y-%m-%d")));
    output.push_str(&format!("Amount:      {}\n", txn.amount.format_with_symbol(currency)));
    output.push_str(&format!("Type:        {}\n", txn.transaction_type));
    output.push_str(&format!("Category:    {}\n", txn.category));

    if !txn.description.is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description));
    }

    output.push_str(&format!(
        "Created:     {}\n",
        txn.created_at.format("%Y-%m-%d %H:%M:%S")
    ));
    if txn.updated_at != txn.created_at {
        output.push_str(&format!(
            "Updated:     {}\n",
            txn.updated_at.format("%Y-%m-%d %H:%M:%S")
        ));
    }

    if txn.exceeds_threshold(threshold) {
        output.push_str(&format!(
            "Flagged:     over the alert threshold of {}\n",
            threshold.format_with_symbol(currency)
        ));
    }

    output
}
