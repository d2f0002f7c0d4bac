//! Human-readable period labels, in Brazilian Portuguese.

use chrono::Datelike;

use super::{Granularity, Period};

/// Label shown when no date filter is active.
pub const ALL_TIME_LABEL: &str = "Todo o Período";

const MONTHS: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

// Indexed from Sunday.
const WEEKDAYS: [&str; 7] = [
    "domingo",
    "segunda-feira",
    "terça-feira",
    "quarta-feira",
    "quinta-feira",
    "sexta-feira",
    "sábado",
];

fn month_name(month: u32) -> Option<&'static str> {
    MONTHS.get(usize::try_from(month.checked_sub(1)?).ok()?).copied()
}

impl Period {
    /// Display label for this period.
    ///
    /// Weeks keep their own number rather than being recomputed from a date.
    #[must_use]
    pub fn label(&self) -> String {
        match *self {
            Self::All => ALL_TIME_LABEL.to_string(),
            Self::Year(year) => format!("Ano de {year}"),
            Self::Month { year, month } => month_name(month)
                .map(|name| format!("{name} de {year}"))
                .unwrap_or_default(),
            Self::Week { year, week } => format!("Semana {week:02} de {year}"),
            Self::Day(date) => {
                let weekday = WEEKDAYS[date.weekday().num_days_from_sunday() as usize];
                let month = month_name(date.month()).unwrap_or_default();
                format!("{weekday}, {} de {month} de {}", date.day(), date.year())
            }
        }
    }
}

/// Label for a raw `(granularity, value)` pair.
///
/// Returns an empty string when a non-`all` granularity comes with an empty
/// or malformed value.
#[must_use]
pub fn period_label(granularity: Granularity, value: &str) -> String {
    if granularity == Granularity::All {
        return ALL_TIME_LABEL.to_string();
    }
    if value.is_empty() {
        return String::new();
    }
    Period::parse(granularity, value)
        .map(|period| period.label())
        .unwrap_or_default()
}
