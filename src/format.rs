//! Presentation formatting
//!
//! Text helpers shared by every view: euro amounts, dates, percentage deltas,
//! budget status lines and chart tooltips.

use chrono::NaiveDate;

use crate::api::{BudgetStatus, CategoryType};

/// How a value should be colored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

/// Formatted text plus its tone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Styled {
    pub text: String,
    pub tone: Tone,
}

/// `€` amount with `,` thousands separators and two decimals when fractional.
///
/// ```
/// use fintrack::format::format_currency;
///
/// assert_eq!(format_currency(4200.0), "€4,200");
/// assert_eq!(format_currency(85.5), "€85.50");
/// assert_eq!(format_currency(-1200.0), "-€1,200");
/// ```
pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 && amount.abs() >= 0.005 { "-" } else { "" };
    format!("{}€{}", sign, group_amount(amount.abs()))
}

fn group_amount(amount: f64) -> String {
    let cents = (amount * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if fraction == 0 {
        grouped
    } else {
        format!("{}.{:02}", grouped, fraction)
    }
}

/// Amount signed by its category type, whatever sign the server stored
pub fn signed_amount(amount: f64, kind: CategoryType) -> Styled {
    let magnitude = group_amount(amount.abs());
    match kind {
        CategoryType::Income => Styled {
            text: format!("+€{}", magnitude),
            tone: Tone::Positive,
        },
        CategoryType::Expense => Styled {
            text: format!("-€{}", magnitude),
            tone: Tone::Negative,
        },
    }
}

/// `DD/MM/YYYY`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Percentage delta such as `+4.8%` or `-1.2%`
pub fn format_change(percent: f64) -> Styled {
    let rounded = (percent * 10.0).round() / 10.0;
    let tone = if rounded > 0.0 {
        Tone::Positive
    } else if rounded < 0.0 {
        Tone::Negative
    } else {
        Tone::Neutral
    };
    // Avoid rendering "-0.0%"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };

    Styled {
        text: format!("{:+.1}%", rounded),
        tone,
    }
}

/// Status line of a budget: over budget above 100%, warning above 80%
pub fn budget_message(spent: f64, allocated: f64) -> Styled {
    let remaining = allocated - spent;
    match BudgetStatus::from_usage(spent, allocated) {
        BudgetStatus::Exceeded => Styled {
            text: format!("Over budget by {}", format_currency(remaining.abs())),
            tone: Tone::Negative,
        },
        BudgetStatus::Warning => Styled {
            text: format!("Warning: {} left", format_currency(remaining)),
            tone: Tone::Neutral,
        },
        BudgetStatus::OnTrack => Styled {
            text: format!("{} left", format_currency(remaining)),
            tone: Tone::Positive,
        },
    }
}

/// Chart tooltip line, e.g. `Alimentation: €300`
pub fn tooltip(label: &str, value: f64) -> String {
    format!("{}: {}", label, format_currency(value))
}
