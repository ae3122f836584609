//! User types and weighted operation selection.
//!
//! A user type is a static bundle of operations with relative weights, a
//! think-time range, and a population weight governing how many of the
//! simulated users run it. User types are compiled once at startup; the
//! compile step validates weights and dry-runs every request template so
//! configuration errors abort before any traffic is generated.

use std::ops::RangeInclusive;
use std::sync::Arc;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::error::ConfigError;
use crate::ops::{self, catalog, Operation};
use crate::params::ParamPool;

/// Static declaration of one simulated user profile.
#[derive(Debug)]
pub struct UserType {
    pub name: &'static str,
    /// Relative share of the simulated population
    pub population_weight: u32,
    /// Think-time range between operations, in seconds
    pub think_time: RangeInclusive<u64>,
    /// Operation executed once when a stream starts
    pub on_start: Option<&'static Operation>,
    pub operations: Vec<&'static Operation>,
}

/// A user type with its weighted-selection table prevalidated.
#[derive(Debug)]
pub struct CompiledUser {
    pub spec: UserType,
    index: WeightedIndex<u32>,
}

impl CompiledUser {
    /// Weighted random draw over the user type's operations.
    pub fn select_operation(&self, rng: &mut impl Rng) -> &'static Operation {
        self.spec.operations[self.index.sample(rng)]
    }
}

/// Compile a user type, validating its operation set and weights.
pub fn compile(user_type: UserType, pool: &ParamPool) -> Result<CompiledUser, ConfigError> {
    if user_type.operations.is_empty() {
        return Err(ConfigError::EmptyOperationSet {
            user_type: user_type.name,
        });
    }
    let weights: Vec<u32> = user_type.operations.iter().map(|op| op.weight).collect();
    let index = WeightedIndex::new(weights).map_err(|_| ConfigError::ZeroTotalWeight {
        user_type: user_type.name,
    })?;

    // Dry-run every template so unknown slots surface pre-run
    let mut rng = rand::thread_rng();
    for op in &user_type.operations {
        ops::build_request(op, pool, &mut rng)?;
    }
    if let Some(op) = user_type.on_start {
        ops::build_request(op, pool, &mut rng)?;
    }

    Ok(CompiledUser {
        spec: user_type,
        index,
    })
}

/// The full compiled roster plus the population-weight selection table.
#[derive(Debug)]
pub struct Roster {
    pub users: Vec<Arc<CompiledUser>>,
    population: WeightedIndex<u32>,
}

impl Roster {
    pub fn compile(user_types: Vec<UserType>, pool: &ParamPool) -> Result<Self, ConfigError> {
        if user_types.is_empty() {
            return Err(ConfigError::EmptyRoster);
        }
        let weights: Vec<u32> = user_types.iter().map(|u| u.population_weight).collect();
        let population =
            WeightedIndex::new(weights).map_err(|_| ConfigError::ZeroPopulationWeight)?;
        let users = user_types
            .into_iter()
            .map(|u| compile(u, pool).map(Arc::new))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { users, population })
    }

    /// Assign a user type to a new simulated user by population weight.
    pub fn pick_user_type(&self, rng: &mut impl Rng) -> Arc<CompiledUser> {
        Arc::clone(&self.users[self.population.sample(rng)])
    }
}

/// The built-in roster: browsing-heavy traffic, occasional bulk writers,
/// and rare CSV importers (population ratio 10:10:1).
pub fn default_roster() -> Vec<UserType> {
    vec![
        UserType {
            name: "browsing",
            population_weight: 10,
            think_time: 1..=3,
            on_start: Some(&catalog::HEALTH),
            operations: vec![
                &catalog::QUOTE,
                &catalog::HISTORICAL,
                &catalog::SUGGESTIONS,
                &catalog::LIST,
                &catalog::SEARCH,
                &catalog::HISTORICAL_BY_SYMBOL,
                &catalog::STOCK_DETAILS,
                &catalog::FACETS,
                &catalog::COUNTS,
                &catalog::COUNT_BY_SYMBOL,
                &catalog::HEALTH,
            ],
        },
        UserType {
            name: "bulk",
            population_weight: 10,
            think_time: 5..=15,
            on_start: None,
            operations: vec![&catalog::CREATE_STOCK, &catalog::BULK_CREATE],
        },
        UserType {
            name: "import",
            population_weight: 1,
            think_time: 30..=60,
            on_start: None,
            operations: vec![&catalog::IMPORT_CSV],
        },
    ]
}
