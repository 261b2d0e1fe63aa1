//! Salary grade fallback table.
//!
//! Monthly peso ranges (step 1 to step 8) of the SSL VI 2025 salary schedule, used
//! when a role row carries a salary grade but no explicit pay range.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

/// Inclusive monthly pay range in whole pesos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PayRange {
    pub min: i64,
    pub max: i64,
}

const SALARY_SCHEDULE: [(&str, i64, i64); 33] = [
    ("SG01", 14061, 15664),
    ("SG02", 14925, 16626),
    ("SG03", 15852, 17659),
    ("SG04", 16833, 18752),
    ("SG05", 17866, 19903),
    ("SG06", 18957, 21118),
    ("SG07", 20110, 22403),
    ("SG08", 21448, 23893),
    ("SG09", 23226, 25874),
    ("SG10", 25586, 28504),
    ("SG11", 30024, 33447),
    ("SG12", 32245, 35921),
    ("SG13", 34421, 38345),
    ("SG14", 37024, 41245),
    ("SG15", 40208, 44792),
    ("SG16", 43560, 48526),
    ("SG17", 47247, 52633),
    ("SG18", 51304, 57153),
    ("SG19", 56390, 62818),
    ("SG20", 62967, 70145),
    ("SG21", 70013, 77994),
    ("SG22", 78162, 87072),
    ("SG23", 87315, 97269),
    ("SG24", 98185, 109378),
    ("SG25", 111727, 124464),
    ("SG26", 126252, 140645),
    ("SG27", 142663, 158927),
    ("SG28", 160469, 178762),
    ("SG29", 180492, 201068),
    ("SG30", 203200, 226365),
    ("SG31", 293191, 326615),
    ("SG32", 347888, 387547),
    ("SG33", 438844, 488872),
];

static SCHEDULE: Lazy<HashMap<&'static str, PayRange>> = Lazy::new(|| {
    SALARY_SCHEDULE
        .iter()
        .map(|&(code, min, max)| (code, PayRange { min, max }))
        .collect()
});

/// Canonical `SGnn` form of a grade code, if it looks like one.
///
/// Accepts `SG10`, `sg10`, `SG-10`, `SG 10`, `SG1` and a bare `10`.
pub fn normalize_code(code: &str) -> Option<String> {
    let trimmed = code.trim();
    let digits = match trimmed.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case("SG") => &trimmed[2..],
        _ => trimmed,
    };
    let digits = digits.trim_start_matches(|c: char| c == '-' || c == ' ');
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let grade: u32 = digits.parse().ok()?;
    Some(format!("SG{grade:02}"))
}

/// Look up the fallback range for a salary grade code.
pub fn range(code: &str) -> Option<PayRange> {
    let key = normalize_code(code)?;
    SCHEDULE.get(key.as_str()).copied()
}

/// Explicit bounds win; otherwise fall back to the schedule for `grade`.
pub fn resolve(grade: Option<&str>, min: Option<i64>, max: Option<i64>) -> Option<PayRange> {
    match (min, max) {
        (Some(min), Some(max)) => Some(PayRange { min, max }),
        _ => grade.and_then(range),
    }
}

/// Format a peso amount with thousands separators, or `-` when absent.
pub fn format_peso(amount: Option<i64>) -> String {
    let Some(amount) = amount else {
        return "-".to_string();
    };
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-₱{grouped}")
    } else {
        format!("₱{grouped}")
    }
}

/// Render a range as `₱min - ₱max`, or `-` when there is none.
pub fn format_range(range: Option<PayRange>) -> String {
    match range {
        Some(r) => format!("{} - {}", format_peso(Some(r.min)), format_peso(Some(r.max))),
        None => "-".to_string(),
    }
}
