//! Seeded mock spend data.
//!
//! Generates a handful of members, each with monthly per-store records over
//! a trailing window, spread across a fixed geography and the configured
//! sectors and categories. The same seed always produces the same data.

use chrono::{Datelike, Months, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::config::{CATEGORIES, DEFAULT_LOOKBACK_MONTHS, SECTORS};
use crate::models::{Record, SpendMetric, User};
use crate::source::RecordSource;

pub const DEFAULT_SEED: u64 = 42;

const USERS: [(&str, &str); 3] = [("u1", "Alice"), ("u2", "Bob"), ("u3", "Charlie")];

/// (country, state, city)
const LOCATIONS: [(&str, &str, &str); 6] = [
    ("India", "Maharashtra", "Mumbai"),
    ("India", "Karnataka", "Bengaluru"),
    ("India", "Delhi", "New Delhi"),
    ("USA", "California", "San Francisco"),
    ("USA", "New York", "New York City"),
    ("UK", "England", "London"),
];

/// Generates mock users and spend records.
pub struct MockGenerator {
    rng: StdRng,
    months: u32,
    records_per_month: usize,
}

impl MockGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            months: DEFAULT_LOOKBACK_MONTHS,
            records_per_month: 4,
        }
    }

    /// Number of calendar months to cover, ending with the month of `today`.
    pub fn months(mut self, months: u32) -> Self {
        self.months = months;
        self
    }

    pub fn records_per_month(mut self, count: usize) -> Self {
        self.records_per_month = count;
        self
    }

    pub fn users(&self) -> Vec<User> {
        USERS.iter().map(|(id, name)| User::new(*id, *name)).collect()
    }

    /// Generate one member's records, oldest month first.
    ///
    /// Each record spans one calendar month.
    pub fn records(&mut self, today: NaiveDate) -> Vec<Record> {
        let Some(this_month) = today.with_day(1) else {
            return Vec::new();
        };
        let mut records = Vec::with_capacity(self.months as usize * self.records_per_month);

        for back in (0..self.months).rev() {
            let Some(start) = this_month.checked_sub_months(Months::new(back)) else {
                continue;
            };
            let Some(end) = start
                .checked_add_months(Months::new(1))
                .and_then(|next| next.pred_opt())
            else {
                continue;
            };
            for _ in 0..self.records_per_month {
                records.push(self.record(start, end));
            }
        }
        records
    }

    /// Generate a full source: every mock user with their own records.
    pub fn source(mut self, today: NaiveDate) -> RecordSource {
        let mut source = RecordSource::new();
        for user in self.users() {
            let records = self.records(today);
            source.insert_user(user, records);
        }
        source
    }

    fn record(&mut self, start: NaiveDate, end: NaiveDate) -> Record {
        let (country, state, city) = LOCATIONS[self.rng.gen_range(0..LOCATIONS.len())];
        let sector = SECTORS[self.rng.gen_range(0..SECTORS.len())];
        let category = CATEGORIES[self.rng.gen_range(0..CATEGORIES.len())];

        let my_spend = self.metric(20_000.0..150_000.0, -20.0..40.0);
        let same_store_spend = self.metric(15_000.0..120_000.0, -15.0..25.0);
        let new_store_spend = self.metric(2_000.0..30_000.0, 0.0..80.0);
        let lost_store_spend = self.metric(2_000.0..30_000.0, -60.0..-5.0);

        Record {
            country: country.to_string(),
            state: state.to_string(),
            city: city.to_string(),
            sector: sector.to_string(),
            category: category.to_string(),
            start_date: Some(start),
            end_date: Some(end),
            my_spend: Some(my_spend),
            same_store_spend: Some(same_store_spend),
            new_store_spend: Some(new_store_spend),
            lost_store_spend: Some(lost_store_spend),
        }
    }

    /// A metric whose fields agree: `absolute = current - reference` and
    /// `percent = absolute / reference * 100`, rounded to two decimals.
    fn metric(&mut self, reference: std::ops::Range<f64>, change_pct: std::ops::Range<f64>) -> SpendMetric {
        let reference = self.rng.gen_range(reference).round();
        let pct = self.rng.gen_range(change_pct);
        let current = (reference * (1.0 + pct / 100.0)).round();
        let absolute_change = current - reference;
        let percent_change = (absolute_change / reference * 10_000.0).round() / 100.0;
        SpendMetric::new(current, reference, absolute_change, percent_change)
    }
}
