//! Dashboard module
//!
//! Provides an overview page showing the user's totals, where their money
//! comes from and goes, and how the last few months compare.

mod aggregation;
mod cards;
mod charts;
mod handlers;

pub use aggregation::{
    CategoryShare, MONTHLY_WINDOW, MonthlySummary, Totals, compute_category_breakdown,
    compute_monthly_series, compute_totals,
};
pub use handlers::get_dashboard_page;
