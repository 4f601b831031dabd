//! ECharts configuration for the dashboard.
//!
//! - **Income/Expense breakdown**: pie charts of each category's share
//! - **Trends**: income, expenses and balance for the last few months
//!
//! Each chart is serialized as an ECharts option object and initialized by a
//! small script in the page head.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, Color, JsFunction, Tooltip, Trigger,
    },
    series::{Line, Pie},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    dashboard::aggregation::{CategoryShare, MonthlySummary},
    html::HeadElement,
    theme::Theme,
};

pub(super) const ECHARTS_SCRIPT: &str =
    "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

const INCOME_COLORS: [&str; 6] = [
    "#15803d", "#16a34a", "#22c55e", "#4ade80", "#86efac", "#bbf7d0",
];
const EXPENSE_COLORS: [&str; 6] = [
    "#b91c1c", "#dc2626", "#ef4444", "#f87171", "#fca5a5", "#fecaca",
];
const TREND_COLORS: [&str; 3] = ["#16a34a", "#dc2626", "#2563eb"];

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts option object as JSON
    pub options: String,
}

pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section id="charts" class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 lg:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[340px] rounded bg-white dark:bg-gray-800 shadow"
                    {}
                }
            }
        }
    )
}

/// Initialize the charts once the page has loaded, using ECharts' dark theme
/// when the page is dark.
pub(super) fn charts_script(charts: &[DashboardChart], theme: Theme) -> HeadElement {
    let echarts_theme = match theme {
        Theme::Dark => "'dark'",
        Theme::Light => "null",
    };

    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom, {echarts_theme});
                    chart.setOption({});
                    window.addEventListener('resize', chart.resize);
                }})();"#,
                chart.id,
                escape_script_text(&chart.options)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    HeadElement::ScriptSource(PreEscaped(format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    )))
}

/// Keep user text in chart options from closing the surrounding script tag.
///
/// `</` and `<!--` only occur inside string literals, where `\/` and `\!`
/// decode to the same characters.
fn escape_script_text(options: &str) -> String {
    options.replace("</", "<\\/").replace("<!--", "<\\!--")
}

/// A pie chart of category shares. `shares` are percentages.
pub(super) fn distribution_chart(title: &str, shares: &[CategoryShare], colors: &[&str]) -> Chart {
    let data: Vec<(f64, String)> = shares
        .iter()
        .map(|share| (share.percentage, share.category.clone()))
        .collect();

    Chart::new()
        .title(Title::new().text(title).left("center"))
        .color(colors.iter().map(|color| Color::from(*color)).collect())
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .formatter("{b}: {c}%"),
        )
        .legend(Legend::new().bottom(0))
        .series(
            Pie::new()
                .name(title)
                .radius(vec!["35%", "65%"])
                .data(data),
        )
}

pub(super) fn income_distribution_chart(shares: &[CategoryShare]) -> Chart {
    distribution_chart("Income Distribution", shares, &INCOME_COLORS)
}

pub(super) fn expense_distribution_chart(shares: &[CategoryShare]) -> Chart {
    distribution_chart("Expense Distribution", shares, &EXPENSE_COLORS)
}

/// Line chart of income, expenses and balance for each month in `series`.
pub(super) fn trends_chart(series: &[MonthlySummary]) -> Chart {
    let labels: Vec<String> = series.iter().map(|month| month.month.to_owned()).collect();
    let income: Vec<f64> = series.iter().map(|month| month.income).collect();
    let expenses: Vec<f64> = series.iter().map(|month| month.expenses).collect();
    let balance: Vec<f64> = series.iter().map(|month| month.balance).collect();

    Chart::new()
        .title(Title::new().text("Monthly Trends").left("center"))
        .color(TREND_COLORS.iter().map(|color| Color::from(*color)).collect())
        .tooltip(currency_tooltip())
        .legend(Legend::new().bottom(0))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom(40)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Line::new().name("Income").data(income))
        .series(Line::new().name("Expenses").data(expenses))
        .series(Line::new().name("Balance").data(balance))
}

fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return currencyFormatter.format(number);",
    )
}

fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Line))
}

#[cfg(test)]
mod tests {
    use maud::html;

    use crate::{
        dashboard::aggregation::{CategoryShare, MonthlySummary},
        html::HeadElement,
        theme::Theme,
    };

    use super::{
        DashboardChart, charts_script, charts_view, escape_script_text, expense_distribution_chart,
        trends_chart,
    };

    #[test]
    fn distribution_chart_contains_categories() {
        let shares = vec![
            CategoryShare {
                category: "Rent".to_owned(),
                percentage: 80.0,
            },
            CategoryShare {
                category: "Food".to_owned(),
                percentage: 20.0,
            },
        ];

        let options = expense_distribution_chart(&shares).to_string();

        assert!(options.contains("Expense Distribution"));
        assert!(options.contains("\"Rent\""));
        assert!(options.contains("\"Food\""));
        assert!(options.contains("\"pie\""));
    }

    #[test]
    fn trends_chart_has_three_series_and_month_labels() {
        let series = vec![
            MonthlySummary {
                month: "Mar",
                income: 1000.0,
                expenses: 400.0,
                balance: 600.0,
            },
            MonthlySummary {
                month: "Feb",
                income: 0.0,
                expenses: 400.0,
                balance: -400.0,
            },
        ];

        let chart = trends_chart(&series);
        let rendered = chart.to_string();
        assert!(rendered.contains("\"Mar\""));
        assert!(rendered.contains("\"Feb\""));

        // Tooltips mention "line" too, so count the series themselves.
        let options = serde_json::to_value(&chart).unwrap();
        let chart_series = options["series"].as_array().unwrap();
        assert_eq!(chart_series.len(), 3);
        for line in chart_series {
            assert_eq!(line["type"], "line");
        }
    }

    #[test]
    fn view_has_container_for_each_chart() {
        let charts = [
            DashboardChart {
                id: "first-chart",
                options: "{}".to_owned(),
            },
            DashboardChart {
                id: "second-chart",
                options: "{}".to_owned(),
            },
        ];

        let markup = html! { (charts_view(&charts)) }.into_string();

        assert!(markup.contains("id=\"first-chart\""));
        assert!(markup.contains("id=\"second-chart\""));
    }

    #[test]
    fn script_uses_dark_theme_when_requested() {
        let charts = [DashboardChart {
            id: "chart",
            options: "{}".to_owned(),
        }];

        let HeadElement::ScriptSource(dark) = charts_script(&charts, Theme::Dark) else {
            panic!("expected inline script");
        };
        let HeadElement::ScriptSource(light) = charts_script(&charts, Theme::Light) else {
            panic!("expected inline script");
        };

        assert!(dark.0.contains("echarts.init(chartDom, 'dark')"));
        assert!(light.0.contains("echarts.init(chartDom, null)"));
    }

    #[test]
    fn script_text_cannot_close_its_tag() {
        let escaped = escape_script_text(r#"{"name":"</script><script>alert(1)</script><!--"}"#);

        assert!(!escaped.contains("</"));
        assert!(!escaped.contains("<!--"));
        assert_eq!(
            escaped,
            r#"{"name":"<\/script><script>alert(1)<\/script><\!--"}"#
        );
    }
}
