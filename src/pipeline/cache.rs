//! Process-wide cache of exact integrals keyed by model, parameters and bounds

use crate::catalog::{ModelKind, ParameterSet};
use dashmap::DashMap;
use lazy_static::lazy_static;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const CACHE_SIZE: usize = 10000;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    kind: ModelKind,
    parameters: ParameterHash,
    lower: u64,
    upper: u64,
}

impl CacheKey {
    fn new(kind: ModelKind, parameters: &ParameterSet, lower: f64, upper: f64) -> Self {
        CacheKey {
            kind,
            parameters: ParameterHash::new(parameters),
            lower: lower.to_bits(),
            upper: upper.to_bits(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ParameterHash(u64);

impl ParameterHash {
    fn new(parameters: &ParameterSet) -> Self {
        let mut hasher = DefaultHasher::new();
        // iteration order is sorted by name
        for (name, value) in parameters.iter() {
            name.hash(&mut hasher);
            value.to_bits().hash(&mut hasher);
        }
        ParameterHash(hasher.finish())
    }
}

lazy_static! {
    static ref CACHE: DashMap<CacheKey, f64> = DashMap::with_capacity(CACHE_SIZE);
}

pub(crate) fn get_entry(kind: ModelKind, parameters: &ParameterSet, lower: f64, upper: f64) -> Option<f64> {
    let cache_key = CacheKey::new(kind, parameters, lower, upper);
    CACHE.get(&cache_key).map(|entry| *entry)
}

pub(crate) fn insert_entry(kind: ModelKind, parameters: &ParameterSet, lower: f64, upper: f64, value: f64) {
    if CACHE.len() >= CACHE_SIZE {
        tracing::warn!(entries = CACHE.len(), "exact-value cache full, clearing");
        CACHE.clear();
    }
    CACHE.insert(CacheKey::new(kind, parameters, lower, upper), value);
}

/// Drop every cached exact value
pub fn clear_cache() {
    CACHE.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let params = ParameterSet::new().with("curvature", 0.123456);
        assert_eq!(get_entry(ModelKind::RouteCurve, &params, 0.0, 1.5), None);
        insert_entry(ModelKind::RouteCurve, &params, 0.0, 1.5, 42.0);
        assert_eq!(get_entry(ModelKind::RouteCurve, &params, 0.0, 1.5), Some(42.0));
        assert_eq!(get_entry(ModelKind::RouteCurve, &params, 0.0, 1.6), None);
        let other = ParameterSet::new().with("curvature", 0.123457);
        assert_eq!(get_entry(ModelKind::RouteCurve, &other, 0.0, 1.5), None);
    }
}
