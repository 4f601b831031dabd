//! Summary cards for the user's income, expenses and balance.

use maud::{Markup, html};

use crate::{dashboard::aggregation::Totals, html::format_currency};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md flex flex-col gap-1";

pub(super) fn totals_cards_view(totals: &Totals) -> Markup {
    let balance_style = if totals.balance < 0.0 {
        "text-3xl font-bold text-red-600 dark:text-red-400"
    } else {
        "text-3xl font-bold text-blue-600 dark:text-blue-400"
    };

    html! {
        section id="totals" class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 md:grid-cols-3 gap-4"
            {
                (total_card(
                    "Total Income",
                    "income-total",
                    totals.income,
                    "text-3xl font-bold text-green-600 dark:text-green-400",
                ))
                (total_card(
                    "Total Expenses",
                    "expenses-total",
                    totals.expenses,
                    "text-3xl font-bold text-red-600 dark:text-red-400",
                ))
                (total_card("Balance", "balance-total", totals.balance, balance_style))
            }
        }
    }
}

fn total_card(label: &str, id: &str, amount: f64, amount_style: &str) -> Markup {
    html! {
        div class=(CARD_STYLE)
        {
            h3 class="text-sm font-medium text-gray-600 dark:text-gray-400" { (label) }
            span id=(id) class=(amount_style) { (format_currency(amount)) }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::dashboard::aggregation::Totals;

    use super::totals_cards_view;

    fn text_of(document: &Html, selector: &str) -> String {
        let selector = Selector::parse(selector).unwrap();
        document
            .select(&selector)
            .next()
            .unwrap_or_else(|| panic!("could not find {selector:?}"))
            .text()
            .collect::<String>()
    }

    #[test]
    fn shows_formatted_totals() {
        let totals = Totals {
            income: 600.0,
            expenses: 250.0,
            balance: 350.0,
        };

        let document = Html::parse_fragment(&totals_cards_view(&totals).into_string());

        assert_eq!(text_of(&document, "#income-total"), "$600.00");
        assert_eq!(text_of(&document, "#expenses-total"), "$250.00");
        assert_eq!(text_of(&document, "#balance-total"), "$350.00");
    }

    #[test]
    fn negative_balance_is_red() {
        let totals = Totals {
            income: 0.0,
            expenses: 34.5,
            balance: -34.5,
        };

        let document = Html::parse_fragment(&totals_cards_view(&totals).into_string());
        let selector = Selector::parse("#balance-total").unwrap();
        let balance = document.select(&selector).next().unwrap();

        assert_eq!(balance.text().collect::<String>(), "-$34.50");
        assert!(balance.value().attr("class").unwrap().contains("text-red-600"));
    }
}
