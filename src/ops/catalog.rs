//! The built-in operation catalog and default parameter pool.
//!
//! Paths, weights, and accept sets mirror the stock trading API surface:
//! read-heavy browsing endpoints, occasional write endpoints, and the
//! accepted-async CSV import with its job-status follow-up.

use rand::seq::SliceRandom;
use rand::Rng;

use super::{Method, Operation, Payload, QuerySlot, StockRecord};
use crate::classify::{AcceptPolicy, FollowUp};
use crate::params::{ParamPool, ValueDomain};

pub const STOCK_SYMBOLS: &[&str] = &[
    "AAPL", "GOOGL", "MSFT", "AMZN", "TSLA", "NVDA", "META", "NFLX", "AMD", "INTC", "SPY", "QQQ",
    "IWM", "VTI", "BRK.B",
];

pub const SECTORS: &[&str] = &["Technology", "Healthcare", "Finance", "Energy", "Consumer"];

pub const INDUSTRIES: &[&str] = &["Software", "Hardware", "Biotech", "Banking", "Oil & Gas"];

const SUGGESTION_PREFIXES: &[&str] = &["AP", "GOO", "MS", "AM", "TS", "NV", "ME", "NF"];

const SEARCH_TERMS: &[&str] = &["Apple", "Microsoft", "Google", "Tesla"];

pub const SAMPLE_STOCKS_CSV: &str = "\
Symbol,Name,Last Sale,Net Change,% Change,Market Cap,Country,IPO Year,Volume,Sector,Industry
LOADTEST1,Load Test Company 1,$100.50,$2.50,2.55%,$1000000000,USA,2020,1000000,Technology,Software
LOADTEST2,Load Test Company 2,$50.25,-$1.25,-2.43%,$500000000,USA,2019,500000,Healthcare,Biotech";

/// Parameter pool matching the slots the catalog operations reference.
pub fn default_pool() -> ParamPool {
    ParamPool::new()
        .with_slot("symbol", ValueDomain::OneOf(STOCK_SYMBOLS))
        .with_slot("days", ValueDomain::OneOf(&["7", "14", "30", "60", "90"]))
        .with_slot("suggestion_query", ValueDomain::OneOf(SUGGESTION_PREFIXES))
        .with_slot("list_skip", ValueDomain::IntRange(0, 1000))
        .with_slot("list_take", ValueDomain::OneOf(&["50", "100", "200", "500"]))
        .with_slot("search_term", ValueDomain::OneOf(SEARCH_TERMS))
        .with_slot("sector", ValueDomain::OneOf(SECTORS))
        .with_slot("industry", ValueDomain::OneOf(INDUSTRIES))
        .with_slot("search_skip", ValueDomain::IntRange(0, 500))
        .with_slot("search_take", ValueDomain::OneOf(&["50", "100", "200"]))
        .with_slot("price_take", ValueDomain::OneOf(&["10", "50", "100"]))
        .with_slot("facet", ValueDomain::OneOf(&["sectors", "industries"]))
        .with_slot(
            "count_entity",
            ValueDomain::OneOf(&["listed-stocks", "historical-prices"]),
        )
}

pub static IMPORT_JOB_STATUS: FollowUp = FollowUp {
    name: "job-status",
    path: "/api/listed-stocks/import-jobs/{jobId}",
    accept: &[200, 404],
};

pub static QUOTE: Operation = Operation {
    name: "quote",
    weight: 20,
    method: Method::Get,
    path: "/api/stocks/quote",
    query: &[QuerySlot { key: "symbol", slot: "symbol", probability: 1.0 }],
    payload: Payload::None,
    // 404 is acceptable for unknown symbols
    accept: AcceptPolicy::AnyOf(&[200, 404]),
};

pub static HISTORICAL: Operation = Operation {
    name: "historical",
    weight: 15,
    method: Method::Get,
    path: "/api/stocks/historical",
    query: &[
        QuerySlot { key: "symbol", slot: "symbol", probability: 1.0 },
        QuerySlot { key: "days", slot: "days", probability: 1.0 },
    ],
    payload: Payload::None,
    accept: AcceptPolicy::Strict(200),
};

pub static SUGGESTIONS: Operation = Operation {
    name: "suggestions",
    weight: 10,
    method: Method::Get,
    path: "/api/stocks/suggestions",
    query: &[QuerySlot { key: "query", slot: "suggestion_query", probability: 1.0 }],
    payload: Payload::None,
    accept: AcceptPolicy::Strict(200),
};

pub static LIST: Operation = Operation {
    name: "list",
    weight: 12,
    method: Method::Get,
    path: "/api/listed-stocks",
    query: &[
        QuerySlot { key: "skip", slot: "list_skip", probability: 1.0 },
        QuerySlot { key: "take", slot: "list_take", probability: 1.0 },
    ],
    payload: Payload::None,
    accept: AcceptPolicy::Strict(200),
};

pub static SEARCH: Operation = Operation {
    name: "search",
    weight: 8,
    method: Method::Get,
    path: "/api/listed-stocks/search",
    query: &[
        QuerySlot { key: "q", slot: "search_term", probability: 0.4 },
        QuerySlot { key: "sector", slot: "sector", probability: 0.3 },
        QuerySlot { key: "industry", slot: "industry", probability: 0.3 },
        QuerySlot { key: "skip", slot: "search_skip", probability: 1.0 },
        QuerySlot { key: "take", slot: "search_take", probability: 1.0 },
    ],
    payload: Payload::None,
    accept: AcceptPolicy::Strict(200),
};

pub static HISTORICAL_BY_SYMBOL: Operation = Operation {
    name: "historical-by-symbol",
    weight: 5,
    method: Method::Get,
    path: "/api/historical-prices/{symbol}",
    query: &[QuerySlot { key: "take", slot: "price_take", probability: 1.0 }],
    payload: Payload::None,
    // No stored data is acceptable
    accept: AcceptPolicy::AnyOf(&[200, 404]),
};

pub static STOCK_DETAILS: Operation = Operation {
    name: "stock-details",
    weight: 5,
    method: Method::Get,
    path: "/api/listed-stocks/{symbol}",
    query: &[],
    payload: Payload::None,
    accept: AcceptPolicy::AnyOf(&[200, 404]),
};

pub static FACETS: Operation = Operation {
    name: "facets",
    weight: 3,
    method: Method::Get,
    path: "/api/listed-stocks/facets/{facet}",
    query: &[],
    payload: Payload::None,
    accept: AcceptPolicy::Strict(200),
};

pub static COUNTS: Operation = Operation {
    name: "counts",
    weight: 3,
    method: Method::Get,
    path: "/api/{count_entity}/count",
    query: &[],
    payload: Payload::None,
    accept: AcceptPolicy::Strict(200),
};

pub static COUNT_BY_SYMBOL: Operation = Operation {
    name: "count-by-symbol",
    weight: 2,
    method: Method::Get,
    path: "/api/historical-prices/{symbol}/count",
    query: &[],
    payload: Payload::None,
    // 400 for an invalid symbol is tolerated
    accept: AcceptPolicy::AnyOf(&[200, 400]),
};

pub static HEALTH: Operation = Operation {
    name: "health",
    weight: 1,
    method: Method::Get,
    path: "/health",
    query: &[],
    payload: Payload::None,
    accept: AcceptPolicy::Strict(200),
};

pub static CREATE_STOCK: Operation = Operation {
    name: "create-stock",
    weight: 3,
    method: Method::Post,
    path: "/api/listed-stocks",
    query: &[],
    payload: Payload::Stock,
    accept: AcceptPolicy::Strict(200),
};

pub static BULK_CREATE: Operation = Operation {
    name: "bulk-create",
    weight: 1,
    method: Method::Post,
    path: "/api/listed-stocks/bulk",
    query: &[],
    payload: Payload::StockBulk(5),
    accept: AcceptPolicy::Strict(200),
};

pub static IMPORT_CSV: Operation = Operation {
    name: "import-csv",
    weight: 1,
    method: Method::Post,
    path: "/api/listed-stocks/import-csv",
    query: &[],
    payload: Payload::Csv,
    accept: AcceptPolicy::AcceptedAsync {
        code: 202,
        follow_up: &IMPORT_JOB_STATUS,
    },
};

struct SampleStock {
    last_sale: f64,
    net_change: f64,
    percent_change: f64,
    market_cap: i64,
    ipo_year: u32,
    volume: u64,
    sector: &'static str,
    industry: &'static str,
}

const SAMPLE_STOCKS: &[SampleStock] = &[
    SampleStock {
        last_sale: 150.50,
        net_change: 2.50,
        percent_change: 1.69,
        market_cap: 1_000_000_000,
        ipo_year: 2020,
        volume: 1_000_000,
        sector: "Technology",
        industry: "Software",
    },
    SampleStock {
        last_sale: 75.25,
        net_change: -1.25,
        percent_change: -1.63,
        market_cap: 500_000_000,
        ipo_year: 2019,
        volume: 500_000,
        sector: "Healthcare",
        industry: "Biotech",
    },
];

fn record_from(base: &SampleStock, symbol: String, name: String) -> StockRecord {
    StockRecord {
        symbol,
        name,
        last_sale: base.last_sale,
        net_change: base.net_change,
        percent_change: base.percent_change,
        market_cap: base.market_cap,
        country: "USA",
        ipo_year: base.ipo_year,
        volume: base.volume,
        sector: base.sector,
        industry: base.industry,
    }
}

/// Randomized single stock record for the create endpoint.
pub fn sample_stock(rng: &mut impl Rng) -> StockRecord {
    let base = SAMPLE_STOCKS.choose(rng).expect("sample stocks are non-empty");
    record_from(
        base,
        format!("LOAD{}", rng.gen_range(1000..10000)),
        format!("Load Test Stock {}", rng.gen_range(1..=1000)),
    )
}

/// Randomized stock record number `index` within a bulk batch.
pub fn bulk_stock(index: usize, rng: &mut impl Rng) -> StockRecord {
    let base = SAMPLE_STOCKS.choose(rng).expect("sample stocks are non-empty");
    record_from(
        base,
        format!("BULK{}", rng.gen_range(1000..10000)),
        format!("Bulk Test Stock {}", index),
    )
}
