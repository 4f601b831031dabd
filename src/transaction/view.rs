//! HTML rendering for the transaction list.

use maud::{Markup, html};
use time::{format_description::BorrowedFormatItem, macros::format_description};
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_DELETE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_currency,
    },
    transaction::core::{Transaction, TransactionType},
};

/// The max number of graphemes to display in the transaction table rows before
/// truncating and displaying ellipses.
const MAX_DESCRIPTION_GRAPHEMES: usize = 32;

const DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[month repr:short] [day padding:none], [year]");

/// The user's transactions as a table, in the order given.
///
/// Timestamps are shown in whatever offset they carry.
pub fn transactions_view(transactions: &[Transaction]) -> Markup {
    html! {
        section id="transactions" class="w-full"
        {
            h2 class="text-lg font-semibold mb-4" { "Transactions" }

            @if transactions.is_empty() {
                p class="text-gray-600 dark:text-gray-400"
                {
                    "No transactions yet. Add your first transaction above."
                }
            } @else {
                div class="overflow-x-auto rounded shadow"
                {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                            }
                        }

                        tbody
                        {
                            @for transaction in transactions {
                                (transaction_row(transaction))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let (description, full_description) = format_description(&transaction.description);
    let date = transaction
        .timestamp
        .format(DATE_FORMAT)
        .unwrap_or_else(|_| transaction.timestamp.date().to_string());
    let (amount_text, amount_style) = match transaction.type_ {
        TransactionType::Income => (
            format!("+{}", format_currency(transaction.amount)),
            "text-green-700 dark:text-green-300",
        ),
        TransactionType::Expense => (
            format!("-{}", format_currency(transaction.amount)),
            "text-red-700 dark:text-red-300",
        ),
    };
    let delete_url = format_endpoint(endpoints::TRANSACTION, transaction.id);

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-row="true"
        {
            td class=(TABLE_CELL_STYLE) { (date) }
            td class=(TABLE_CELL_STYLE) title=[full_description] { (description) }
            td class={(TABLE_CELL_STYLE) " " (amount_style)} { (amount_text) }
            td class=(TABLE_CELL_STYLE)
            {
                button
                    hx-delete=(delete_url)
                    hx-confirm={
                        "Are you sure you want to delete '" (transaction.description) "'?"
                    }
                    hx-target-error="#alert-container"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    }
}

fn format_description(description: &str) -> (String, Option<&str>) {
    let description_length = description.graphemes(true).count();

    if description_length <= MAX_DESCRIPTION_GRAPHEMES {
        (description.to_owned(), None)
    } else {
        let truncated: String = description
            .graphemes(true)
            .take(MAX_DESCRIPTION_GRAPHEMES - 3)
            .collect();
        (truncated + "...", Some(description))
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::datetime;

    use crate::{
        auth::UserID,
        transaction::core::{Transaction, TransactionType},
    };

    use super::{MAX_DESCRIPTION_GRAPHEMES, format_description, transactions_view};

    fn transaction(id: i64, description: &str, amount: f64, type_: TransactionType) -> Transaction {
        Transaction {
            id,
            description: description.to_owned(),
            amount,
            type_,
            timestamp: datetime!(2025-03-07 12:00 UTC),
            user_id: UserID::new(1),
        }
    }

    #[test]
    fn shows_empty_state() {
        let html = Html::parse_fragment(&transactions_view(&[]).into_string());
        let selector = Selector::parse("#transactions p").unwrap();
        let paragraph = html.select(&selector).next().expect("no empty state");

        assert_eq!(
            paragraph.text().collect::<String>().trim(),
            "No transactions yet. Add your first transaction above."
        );
    }

    #[test]
    fn rows_have_delete_buttons() {
        let transactions = [
            transaction(2, "Rent", 400.0, TransactionType::Expense),
            transaction(1, "Salary", 900.0, TransactionType::Income),
        ];

        let html = Html::parse_fragment(&transactions_view(&transactions).into_string());
        let row_selector = Selector::parse("tr[data-transaction-row]").unwrap();
        let button_selector = Selector::parse("button[hx-delete]").unwrap();
        let rows: Vec<_> = html.select(&row_selector).collect();

        assert_eq!(rows.len(), 2);
        for (row, want) in rows.iter().zip(&transactions) {
            let button = row.select(&button_selector).next().expect("no delete button");
            assert_eq!(
                button.value().attr("hx-delete"),
                Some(format!("/api/transactions/{}", want.id).as_str())
            );
            assert!(button.value().attr("hx-confirm").is_some());
        }

        let text = rows[0].text().collect::<String>();
        assert!(text.contains("Mar 7, 2025"), "got {text}");
        assert!(text.contains("-$400.00"), "got {text}");
        assert!(rows[1].text().collect::<String>().contains("+$900.00"));
    }

    #[test]
    fn truncates_long_descriptions() {
        let long = "a".repeat(MAX_DESCRIPTION_GRAPHEMES + 1);

        let (truncated, full) = format_description(&long);

        assert_eq!(truncated.chars().count(), MAX_DESCRIPTION_GRAPHEMES);
        assert!(truncated.ends_with("..."));
        assert_eq!(full, Some(long.as_str()));
        assert_eq!(format_description("Rent"), ("Rent".to_owned(), None));
    }
}
