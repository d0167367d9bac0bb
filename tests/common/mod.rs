//! Shared test fixtures for the spend analytics integration tests.
//!
//! Provides a small hand-written record set with known totals, one fully
//! populated record parsed from JSON, and a dashboard pinned to a fixed
//! "today".

use chrono::NaiveDate;
use spend_analytics::{Dashboard, Record, RecordSource, SpendMetric, User};

/// The pinned "today" for dashboard fixtures.
pub fn today() -> NaiveDate {
    date("2024-12-31")
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

/// Build a record with only `mySpend` and `lostStoreSpend` populated.
pub fn record(
    location: (&str, &str, &str),
    sector: &str,
    category: &str,
    period: (&str, &str),
    my_spend: [f64; 4],
) -> Record {
    let (country, state, city) = location;
    Record {
        country: country.to_string(),
        state: state.to_string(),
        city: city.to_string(),
        sector: sector.to_string(),
        category: category.to_string(),
        start_date: Some(date(period.0)),
        end_date: Some(date(period.1)),
        my_spend: Some(SpendMetric::new(my_spend[0], my_spend[1], my_spend[2], my_spend[3])),
        same_store_spend: None,
        new_store_spend: None,
        lost_store_spend: Some(SpendMetric::new(15_000.0, 20_000.0, -5_000.0, -25.0)),
    }
}

const MUMBAI: (&str, &str, &str) = ("India", "Maharashtra", "Mumbai");
const BENGALURU: (&str, &str, &str) = ("India", "Karnataka", "Bengaluru");
const SAN_FRANCISCO: (&str, &str, &str) = ("USA", "California", "San Francisco");
const NEW_YORK: (&str, &str, &str) = ("USA", "New York", "New York City");

/// Six records with known totals.
///
/// | # | location  | sector      | category  | period         | mySpend.current |
/// |---|-----------|-------------|-----------|----------------|-----------------|
/// | 0 | Mumbai    | Retail      | Juice     | 2024-04        | 100             |
/// | 1 | Mumbai    | Retail      | Snacks    | 2024-05        | 50              |
/// | 2 | Bengaluru | Hospitality | Juice     | 2024-06        | 200             |
/// | 3 | SF        | Retail      | Juice     | 2023-01        | 400             |
/// | 4 | NYC       | Hospitality | Beverages | 2024-11        | 0               |
/// | 5 | mumbai    | RETAIL      | Juice     | 04-15 to 05-15 | 25              |
pub fn sample_records() -> Vec<Record> {
    let mut lower_mumbai = record(
        MUMBAI,
        "RETAIL",
        "Juice",
        ("2024-04-15", "2024-05-15"),
        [25.0, 20.0, 5.0, 25.0],
    );
    lower_mumbai.country = "india".to_string();
    lower_mumbai.state = "maharashtra".to_string();
    lower_mumbai.city = "mumbai".to_string();

    vec![
        record(MUMBAI, "Retail", "Juice", ("2024-04-01", "2024-04-30"), [100.0, 80.0, 20.0, 25.0]),
        record(MUMBAI, "Retail", "Snacks", ("2024-05-01", "2024-05-31"), [50.0, 40.0, 10.0, 25.0]),
        record(
            BENGALURU,
            "Hospitality",
            "Juice",
            ("2024-06-01", "2024-06-30"),
            [200.0, 250.0, -50.0, -20.0],
        ),
        record(
            SAN_FRANCISCO,
            "Retail",
            "Juice",
            ("2023-01-01", "2023-01-31"),
            [400.0, 400.0, 0.0, 0.0],
        ),
        record(
            NEW_YORK,
            "Hospitality",
            "Beverages",
            ("2024-11-01", "2024-11-30"),
            [0.0, 0.0, 0.0, 0.0],
        ),
        lower_mumbai,
    ]
}

/// A fully populated Mumbai retail juice record, as the JSON source carries it.
pub fn scenario_record_json() -> serde_json::Value {
    serde_json::json!({
        "country": "India",
        "state": "Maharashtra",
        "city": "Mumbai",
        "sector": "Retail",
        "category": "Juice",
        "startDate": "2024-04-01",
        "endDate": "2024-04-30",
        "mySpend": {
            "current": 120000,
            "reference": 100000,
            "absoluteChange": 20000,
            "percentChange": 20
        },
        "sameStoreSpend": {
            "current": 95000,
            "reference": 90000,
            "absoluteChange": 5000,
            "percentChange": 5.56
        },
        "newStoreSpend": {
            "current": 15000,
            "reference": 10000,
            "absoluteChange": 5000,
            "percentChange": 50
        },
        "lostStoreSpend": {
            "current": 13000,
            "reference": 15000,
            "absoluteChange": -5000,
            "percentChange": -33.33
        }
    })
}

pub fn scenario_record() -> Record {
    serde_json::from_value(scenario_record_json()).unwrap()
}

/// Two members: Alice owns [`sample_records`], Bob owns the scenario record.
pub fn sample_source() -> RecordSource {
    let mut source = RecordSource::new();
    source.insert_user(User::new("u1", "Alice"), sample_records());
    source.insert_user(User::new("u2", "Bob"), vec![scenario_record()]);
    source
}

/// A dashboard over [`sample_source`] with "today" pinned to 2024-12-31.
pub fn sample_dashboard() -> Dashboard {
    Dashboard::builder()
        .source(sample_source())
        .today(today())
        .build()
        .unwrap()
}
