//! Operation descriptors and request building.
//!
//! An operation is a static description of one API call: method, path
//! template, query slots, payload kind, relative weight, and accept policy.
//! `build_request` instantiates it into a concrete request by drawing every
//! parameter from the typed pool.

pub mod catalog;

use rand::Rng;
use serde::Serialize;

use crate::classify::AcceptPolicy;
use crate::error::ConfigError;
use crate::params::ParamPool;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A query-string slot. `probability` below 1.0 makes the field optional,
/// included on a biased coin flip (the search operation sends `q`, `sector`
/// and `industry` only some of the time).
#[derive(Debug)]
pub struct QuerySlot {
    pub key: &'static str,
    pub slot: &'static str,
    pub probability: f64,
}

/// Request body kind, materialized per invocation.
#[derive(Debug, Clone, Copy)]
pub enum Payload {
    None,
    /// Single randomized stock record as JSON
    Stock,
    /// JSON array of N randomized stock records
    StockBulk(usize),
    /// Sample CSV text with a randomized X-File-Name header
    Csv,
}

/// Static description of one API operation.
#[derive(Debug)]
pub struct Operation {
    pub name: &'static str,
    pub weight: u32,
    pub method: Method,
    /// Path template; `{placeholders}` are filled from pool slots
    pub path: &'static str,
    pub query: &'static [QuerySlot],
    pub payload: Payload,
    pub accept: AcceptPolicy,
}

/// A fully formed request, ready to hand to the HTTP client.
#[derive(Debug)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub headers: Vec<(&'static str, String)>,
    pub body: BodyData,
}

#[derive(Debug)]
pub enum BodyData {
    Empty,
    Json(serde_json::Value),
    Csv(&'static str),
}

/// Stock record shape accepted by the create and bulk-create endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRecord {
    pub symbol: String,
    pub name: String,
    pub last_sale: f64,
    pub net_change: f64,
    pub percent_change: f64,
    pub market_cap: i64,
    pub country: &'static str,
    pub ipo_year: u32,
    pub volume: u64,
    pub sector: &'static str,
    pub industry: &'static str,
}

/// Build a concrete request for an operation from the parameter pool.
///
/// Fails fast with a `ConfigError` when the path template is malformed or
/// references a slot the pool does not provide; the roster compile step runs
/// this once per operation so such errors surface before any traffic.
pub fn build_request(
    op: &Operation,
    pool: &ParamPool,
    rng: &mut impl Rng,
) -> Result<RequestSpec, ConfigError> {
    let path = fill_template(op.name, op.path, pool, rng)?;

    let mut query = Vec::with_capacity(op.query.len());
    for slot in op.query {
        if slot.probability < 1.0 && !rng.gen_bool(slot.probability) {
            continue;
        }
        let value = pool
            .draw(slot.slot, rng)
            .ok_or_else(|| ConfigError::UnknownSlot {
                operation: op.name,
                slot: slot.slot.to_string(),
            })?;
        query.push((slot.key, value));
    }

    let mut headers = Vec::new();
    let body = match op.payload {
        Payload::None => BodyData::Empty,
        Payload::Stock => BodyData::Json(serde_json::to_value(catalog::sample_stock(rng)).unwrap_or_default()),
        Payload::StockBulk(count) => {
            let stocks: Vec<StockRecord> = (0..count).map(|i| catalog::bulk_stock(i, rng)).collect();
            BodyData::Json(serde_json::to_value(stocks).unwrap_or_default())
        }
        Payload::Csv => {
            headers.push((
                "X-File-Name",
                format!("load-test-{}.csv", rng.gen_range(1000..10000)),
            ));
            BodyData::Csv(catalog::SAMPLE_STOCKS_CSV)
        }
    };

    Ok(RequestSpec {
        method: op.method,
        path,
        query,
        headers,
        body,
    })
}

/// Replace every `{slot}` in a path template with a drawn pool value.
fn fill_template(
    op_name: &'static str,
    template: &'static str,
    pool: &ParamPool,
    rng: &mut impl Rng,
) -> Result<String, ConfigError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after.find('}').ok_or(ConfigError::MalformedTemplate {
            operation: op_name,
            template,
        })?;
        let slot = &after[..end];
        let value = pool.draw(slot, rng).ok_or_else(|| ConfigError::UnknownSlot {
            operation: op_name,
            slot: slot.to_string(),
        })?;
        out.push_str(&value);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ValueDomain;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_pool() -> ParamPool {
        ParamPool::new()
            .with_slot("symbol", ValueDomain::OneOf(&["AAPL"]))
            .with_slot("take", ValueDomain::OneOf(&["50"]))
    }

    #[test]
    fn quote_request_targets_declared_path_and_method() {
        let pool = catalog::default_pool();
        let mut rng = StdRng::seed_from_u64(1);
        let req = build_request(&catalog::QUOTE, &pool, &mut rng).unwrap();
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.path, "/api/stocks/quote");
        assert_eq!(req.query.len(), 1);
        assert_eq!(req.query[0].0, "symbol");
        assert!(matches!(req.body, BodyData::Empty));
    }

    #[test]
    fn path_placeholders_are_filled_from_the_pool() {
        static OP: Operation = Operation {
            name: "details",
            weight: 1,
            method: Method::Get,
            path: "/api/listed-stocks/{symbol}",
            query: &[],
            payload: Payload::None,
            accept: AcceptPolicy::Strict(200),
        };
        let mut rng = StdRng::seed_from_u64(1);
        let req = build_request(&OP, &test_pool(), &mut rng).unwrap();
        assert_eq!(req.path, "/api/listed-stocks/AAPL");
    }

    #[test]
    fn unknown_placeholder_is_a_config_error() {
        static OP: Operation = Operation {
            name: "broken",
            weight: 1,
            method: Method::Get,
            path: "/api/{nope}",
            query: &[],
            payload: Payload::None,
            accept: AcceptPolicy::Strict(200),
        };
        let mut rng = StdRng::seed_from_u64(1);
        let err = build_request(&OP, &test_pool(), &mut rng).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSlot { operation: "broken", .. }));
    }

    #[test]
    fn unterminated_placeholder_is_a_config_error() {
        static OP: Operation = Operation {
            name: "broken",
            weight: 1,
            method: Method::Get,
            path: "/api/{symbol",
            query: &[],
            payload: Payload::None,
            accept: AcceptPolicy::Strict(200),
        };
        let mut rng = StdRng::seed_from_u64(1);
        let err = build_request(&OP, &test_pool(), &mut rng).unwrap_err();
        assert!(matches!(err, ConfigError::MalformedTemplate { .. }));
    }

    #[test]
    fn csv_import_carries_file_name_header_and_csv_body() {
        let pool = catalog::default_pool();
        let mut rng = StdRng::seed_from_u64(1);
        let req = build_request(&catalog::IMPORT_CSV, &pool, &mut rng).unwrap();
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.path, "/api/listed-stocks/import-csv");
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.headers[0].0, "X-File-Name");
        assert!(req.headers[0].1.ends_with(".csv"));
        assert!(matches!(req.body, BodyData::Csv(_)));
    }

    #[test]
    fn bulk_create_sends_five_records() {
        let pool = catalog::default_pool();
        let mut rng = StdRng::seed_from_u64(1);
        let req = build_request(&catalog::BULK_CREATE, &pool, &mut rng).unwrap();
        match req.body {
            BodyData::Json(value) => {
                let records = value.as_array().expect("bulk body must be an array");
                assert_eq!(records.len(), 5);
                for record in records {
                    let symbol = record["symbol"].as_str().unwrap();
                    assert!(symbol.starts_with("BULK"));
                    assert!(record["lastSale"].is_number());
                }
            }
            other => panic!("expected JSON body, got {:?}", other),
        }
    }

    #[test]
    fn building_does_not_mutate_the_pool() {
        let pool = catalog::default_pool();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..50 {
            build_request(&catalog::SEARCH, &pool, &mut rng).unwrap();
        }
        // Pool slots remain resolvable after repeated builds
        assert!(pool.contains("symbol"));
        assert!(pool.contains("search_skip"));
    }
}
