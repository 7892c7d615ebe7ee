//! Approximate API pricing for cost estimates.
//!
//! Rates are USD per million tokens. Unknown models are priced as Sonnet.

/// Per-million-token rates for one model family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelRates {
    pub input: f64,
    pub output: f64,
    pub cache_read: f64,
}

const OPUS: ModelRates = ModelRates {
    input: 15.0,
    output: 75.0,
    cache_read: 1.5,
};

const SONNET: ModelRates = ModelRates {
    input: 3.0,
    output: 15.0,
    cache_read: 0.3,
};

const HAIKU: ModelRates = ModelRates {
    input: 0.8,
    output: 4.0,
    cache_read: 0.08,
};

/// Rates for a model name such as `claude-opus-4-1-20250805`.
pub fn rates_for(model: &str) -> ModelRates {
    let m = model.to_lowercase();
    if m.contains("opus") {
        OPUS
    } else if m.contains("haiku") {
        HAIKU
    } else {
        SONNET
    }
}

/// Estimated cost in USD.
///
/// Cache reads are billed at the cache rate and excluded from the regular
/// input charge.
pub fn estimate_cost(model: &str, input: u64, output: u64, cache_read: u64) -> f64 {
    let rates = rates_for(model);
    let fresh_input = input.saturating_sub(cache_read);
    (fresh_input as f64 * rates.input
        + output as f64 * rates.output
        + cache_read as f64 * rates.cache_read)
        / 1_000_000.0
}
