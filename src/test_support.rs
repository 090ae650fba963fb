//! Fixtures shared by the unit tests.

use crate::pipeline::Pipeline;
use crate::process::RawTable;
use crate::table::CanonicalTable;

/// (Order Date, Region, State, City, Category, Sub-Category, Sales, Profit, Quantity, Segment)
pub type Row<'a> = (
    &'a str,
    &'a str,
    &'a str,
    &'a str,
    &'a str,
    &'a str,
    &'a str,
    &'a str,
    &'a str,
    &'a str,
);

pub const HEADERS: [&str; 10] = [
    "order_date",
    "region",
    "state",
    "city",
    "category",
    "sub_category",
    "sales",
    "profit",
    "quantity",
    "segment",
];

pub fn init_test_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,sales_dashboard=debug"));
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_test_writer()
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

pub fn raw_table(rows: &[Row<'_>]) -> RawTable {
    RawTable::new(
        HEADERS.iter().map(|h| h.to_string()).collect(),
        rows.iter()
            .map(|r| {
                vec![r.0, r.1, r.2, r.3, r.4, r.5, r.6, r.7, r.8, r.9]
                    .into_iter()
                    .map(String::from)
                    .collect()
            })
            .collect(),
    )
}

pub fn canonical_table(rows: &[Row<'_>]) -> CanonicalTable {
    Pipeline::default()
        .ingest(&raw_table(rows))
        .expect("fixture rows must form a valid table")
        .table()
        .clone()
}

/// Twelve orders over two regions, four states and six cities.
#[rustfmt::skip]
pub fn superstore() -> CanonicalTable {
    canonical_table(&[
        ("2016-01-05", "East", "New York", "New York City", "Technology", "Phones", "100", "20", "2", "Consumer"),
        ("2016-01-20", "East", "New York", "Buffalo", "Furniture", "Chairs", "50", "-5", "1", "Corporate"),
        ("2016-02-03", "East", "Pennsylvania", "Philadelphia", "Office Supplies", "Paper", "30", "6", "3", "Consumer"),
        ("2016-02-14", "East", "Pennsylvania", "Philadelphia", "Technology", "Phones", "200", "40", "4", "Home Office"),
        ("2016-03-01", "West", "California", "Los Angeles", "Furniture", "Tables", "400", "-40", "2", "Consumer"),
        ("2016-03-09", "West", "California", "San Francisco", "Technology", "Accessories", "80", "16", "5", "Corporate"),
        ("2016-03-15", "West", "Washington", "Seattle", "Office Supplies", "Binders", "20", "10", "6", "Consumer"),
        ("2016-04-02", "West", "Washington", "Seattle", "Furniture", "Chairs", "150", "15", "1", "Home Office"),
        ("2017-01-11", "East", "New York", "New York City", "Office Supplies", "Binders", "25", "5", "5", "Corporate"),
        ("2017-01-30", "West", "California", "Los Angeles", "Technology", "Phones", "300", "60", "3", "Consumer"),
        ("2017-02-18", "West", "California", "San Francisco", "Office Supplies", "Paper", "15", "7", "2", "Consumer"),
        ("2017-02-25", "East", "Pennsylvania", "Philadelphia", "Furniture", "Tables", "500", "-100", "2", "Corporate"),
    ])
}
