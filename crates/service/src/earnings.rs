//! Synthetic driver-earnings feed. This is an explicit placeholder for a
//! real payout query: the data is random, only the input/output contract is
//! stable. The generator takes the RNG and "today" as inputs so callers and
//! tests control determinism.

use chrono::{Duration, NaiveDate};
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

/// Earnings never reach further back than this many days from "today".
pub const WINDOW_DAYS: i64 = 90;

const SHOPS: &[&str] = &[
    "Precision Auto Works",
    "Downtown Garage",
    "Sunrise Motors",
    "Axle & Gear Co",
    "Redline Service Center",
];
const CUSTOMERS: &[&str] = &[
    "Alice Nguyen",
    "Marcus Webb",
    "Priya Sharma",
    "Jordan Lee",
    "Sam Ortega",
    "Dana Brooks",
];
const JOB_TYPES: &[&str] = &["vehicle pickup", "vehicle dropoff", "parts run", "customer shuttle"];

#[derive(Debug, Clone, Default)]
pub struct EarningsFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EarningRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub shop_name: String,
    pub customer_name: String,
    pub job_type: String,
    pub amount: f64,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EarningsSummary {
    pub total: f64,
    pub count: u64,
    /// Mean per record, rounded to the nearest integer; 0 when empty.
    pub average: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EarningsReport {
    pub earnings: Vec<EarningRecord>,
    pub summary: EarningsSummary,
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn pick(rng: &mut impl Rng, pool: &[&str]) -> String {
    pool[rng.gen_range(0..pool.len())].to_string()
}

/// Generate the earnings feed for the window ending at `today`, apply the
/// optional date-range and substring filters, sort descending by date and
/// summarize.
pub fn generate_report(
    rng: &mut impl Rng,
    today: NaiveDate,
    filter: &EarningsFilter,
) -> EarningsReport {
    let window_start = today - Duration::days(WINDOW_DAYS);

    let mut earnings = Vec::new();
    let mut day = window_start;
    while day <= today {
        for _ in 0..rng.gen_range(0..=2) {
            earnings.push(EarningRecord {
                id: Uuid::new_v4(),
                date: day,
                shop_name: pick(rng, SHOPS),
                customer_name: pick(rng, CUSTOMERS),
                job_type: pick(rng, JOB_TYPES),
                amount: round2(rng.gen_range(18.0..145.0)),
                status: "paid".into(),
            });
        }
        day = day + Duration::days(1);
    }

    let needle = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);
    earnings.retain(|e| {
        if let Some(start) = filter.start_date {
            if e.date < start {
                return false;
            }
        }
        if let Some(end) = filter.end_date {
            if e.date > end {
                return false;
            }
        }
        match &needle {
            Some(n) => {
                e.shop_name.to_lowercase().contains(n)
                    || e.customer_name.to_lowercase().contains(n)
                    || e.job_type.to_lowercase().contains(n)
            }
            None => true,
        }
    });

    earnings.sort_by(|a, b| b.date.cmp(&a.date));

    let count = earnings.len() as u64;
    let total = round2(earnings.iter().map(|e| e.amount).sum());
    let average = if count == 0 { 0 } else { (total / count as f64).round() as i64 };

    EarningsReport { earnings, summary: EarningsSummary { total, count, average } }
}
