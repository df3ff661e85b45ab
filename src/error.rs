// src/error.rs

use thiserror::Error;

/// Rejected scenario parameters. Raised at construction, never clamped.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("horizon must be positive and finite, got {0}")]
    NonPositiveHorizon(f64),

    #[error("reorder interval must be positive and finite, got {0}")]
    NonPositiveReorderInterval(f64),

    #[error("arrival rate must be positive and finite, got {0}")]
    NonPositiveArrivalRate(f64),

    #[error("lead time mean must be finite, got {0}")]
    InvalidLeadTimeMean(f64),

    #[error("lead time standard deviation must be non-negative and finite, got {0}")]
    InvalidLeadTimeStdDev(f64),

    #[error("holding cost rate must be non-negative, got {0}")]
    NegativeHoldingCost(f64),

    #[error("base order cost must be non-negative, got {0}")]
    NegativeBaseOrderCost(f64),

    #[error("penalty percentage must lie in [0, 1], got {0}")]
    PenaltyOutOfRange(f64),

    #[error("penalty threshold must be non-negative, got {0}")]
    NegativePenaltyThreshold(f64),

    #[error("decimation stride must be at least 1")]
    ZeroDecimationStride,

    #[error("scenario defines no products")]
    NoProducts,

    #[error("product '{0}' is defined more than once")]
    DuplicateProduct(String),

    #[error("product '{0}' has no demand sizes")]
    EmptyDemandSizes(String),

    #[error("product '{product}' has {sizes} demand sizes but {probabilities} probabilities")]
    DemandLengthMismatch {
        product: String,
        sizes: usize,
        probabilities: usize,
    },

    #[error("product '{product}' has invalid demand probability {value}")]
    InvalidProbability { product: String, value: f64 },

    #[error("demand probabilities of product '{product}' sum to {sum}, expected 1")]
    ProbabilitiesDoNotSumToOne { product: String, sum: f64 },

    #[error("product '{product}' has max level {max_level} below initial level {initial_level}")]
    MaxBelowInitial {
        product: String,
        initial_level: u32,
        max_level: u32,
    },

    #[error("product '{product}' unit price must be positive, got {price}")]
    NonPositiveUnitPrice { product: String, price: f64 },

    #[error("product '{product}' order tier prices must be non-negative")]
    NegativeTierPrice { product: String },

    #[error("replication count must be at least 1")]
    ZeroReplications,

    #[error("failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failures of a simulation run. Shortages and penalties are not errors.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("first customer arrival at {first_arrival} falls at or after horizon {horizon}")]
    EmptyHorizon { first_arrival: f64, horizon: f64 },

    #[error("simulation has already been run")]
    AlreadyStarted,

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StatisticsError {
    #[error("satisfied ratio is undefined: no customer demand was recorded")]
    NoCustomers,
}
