use maud::{Markup, html};

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, form_message,
    },
    transaction::core::TransactionType,
};

/// The values to refill the form with, e.g. after a validation error.
#[derive(Debug, Default)]
pub struct TransactionFormDefaults<'a> {
    pub description: &'a str,
    pub amount: &'a str,
    pub transaction_type: TransactionType,
}

/// The add-transaction form.
///
/// Validation errors come back as a new copy of this form, so the form
/// replaces itself on success responses and failures go to the alert
/// container.
pub fn transaction_form(defaults: &TransactionFormDefaults<'_>, error_message: Option<&str>) -> Markup {
    let is_expense = matches!(defaults.transaction_type, TransactionType::Expense);

    html! {
        form
            id="transaction-form"
            hx-post=(endpoints::TRANSACTIONS_API)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="w-full space-y-4"
        {
            h2 class="text-lg font-semibold" { "Add Transaction" }

            (form_message(error_message, None))

            div
            {
                label
                    for="description"
                    class=(FORM_LABEL_STYLE)
                {
                    "Description"
                }

                input
                    name="description"
                    id="description"
                    type="text"
                    placeholder="e.g. Groceries"
                    value=(defaults.description)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label
                    for="amount"
                    class=(FORM_LABEL_STYLE)
                {
                    "Amount"
                }

                input
                    name="amount"
                    id="amount"
                    type="number"
                    step="0.01"
                    min="0"
                    placeholder="0.00"
                    value=(defaults.amount)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            fieldset class="space-y-2"
            {
                legend class=(FORM_LABEL_STYLE) { "Type" }

                div class="flex gap-4"
                {
                    (type_radio(TransactionType::Expense, "Expense", is_expense))
                    (type_radio(TransactionType::Income, "Income", !is_expense))
                }
            }

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Transaction" }
        }
    }
}

fn type_radio(transaction_type: TransactionType, label: &str, checked: bool) -> Markup {
    let id = format!("transaction-type-{transaction_type}");

    html! {
        div class="flex flex-1 items-center gap-3"
        {
            input
                name="type"
                id=(id)
                type="radio"
                value=(transaction_type)
                checked[checked]
                required
                class=(FORM_RADIO_INPUT_STYLE);

            label for=(id) class=(FORM_RADIO_LABEL_STYLE) { (label) }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::{TransactionFormDefaults, transaction_form};
    use crate::{endpoints, transaction::core::TransactionType};

    #[test]
    fn form_posts_to_transactions_api() {
        let html = render(&TransactionFormDefaults::default(), None);
        let form_selector = Selector::parse("form").unwrap();
        let form = html.select(&form_selector).next().expect("no form found");

        assert_eq!(form.value().attr("hx-post"), Some(endpoints::TRANSACTIONS_API));
        assert_eq!(form.value().attr("hx-target-error"), Some("#alert-container"));

        for name in ["description", "amount", "type"] {
            let selector = Selector::parse(&format!("input[name='{name}']")).unwrap();
            assert!(
                html.select(&selector).next().is_some(),
                "missing input named {name}"
            );
        }
    }

    #[test]
    fn checks_selected_type() {
        let cases = [
            (TransactionType::Expense, "expense"),
            (TransactionType::Income, "income"),
        ];

        for (transaction_type, want) in cases {
            let html = render(
                &TransactionFormDefaults {
                    transaction_type,
                    ..Default::default()
                },
                None,
            );
            let selector = Selector::parse("input[type='radio'][checked]").unwrap();
            let checked: Vec<_> = html.select(&selector).collect();

            assert_eq!(checked.len(), 1);
            assert_eq!(checked[0].value().attr("value"), Some(want));
        }
    }

    #[test]
    fn keeps_values_and_shows_error() {
        let html = render(
            &TransactionFormDefaults {
                description: "Rent",
                amount: "-5",
                transaction_type: TransactionType::Expense,
            },
            Some("Amount cannot be negative"),
        );

        let alert_selector = Selector::parse("p[role='alert']").unwrap();
        let alert = html.select(&alert_selector).next().expect("no error message");
        assert_eq!(alert.text().collect::<String>(), "Amount cannot be negative");

        let description_selector = Selector::parse("input[name='description']").unwrap();
        let description = html.select(&description_selector).next().unwrap();
        assert_eq!(description.value().attr("value"), Some("Rent"));
    }

    fn render(defaults: &TransactionFormDefaults<'_>, error_message: Option<&str>) -> Html {
        Html::parse_fragment(&transaction_form(defaults, error_message).into_string())
    }
}
