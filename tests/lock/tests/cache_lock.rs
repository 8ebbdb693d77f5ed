//! Cache locks: idempotence of repeated validation and the capacity bound.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use cascade_kernel::level::LevelDefinition;
use cascade_validator::{
    default_analyzers, AnalyzerError, AnalyzerReport, CachePolicy, LevelAnalyzer, LevelValidator,
    ValidatorConfig,
};
use lock_tests::fixtures::{batch_levels, distinct_levels, test_config};

/// Counts how often it is consulted; otherwise reports a fully solvable level.
struct Counting(Arc<AtomicUsize>);

impl LevelAnalyzer for Counting {
    fn name(&self) -> &str {
        "counting"
    }

    fn analyze(&self, _level: &LevelDefinition) -> Result<AnalyzerReport, AnalyzerError> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(AnalyzerReport {
            solvability: Some(1.0),
            difficulty: Some(0.5),
            ..AnalyzerReport::default()
        })
    }
}

#[test]
fn repeated_validation_returns_identical_result() {
    let validator = LevelValidator::new(test_config()).unwrap();
    let level = &batch_levels()[0];
    let first = validator.validate_level(level).unwrap();
    let second = validator.validate_level(level).unwrap();
    assert_eq!(first, second);
    assert_eq!(validator.stats().cache_hits, 1);
}

#[test]
fn repeated_validation_does_not_rerun_analyzers() {
    let calls = Arc::new(AtomicUsize::new(0));
    let validator = LevelValidator::with_analyzers(
        test_config(),
        vec![Box::new(Counting(Arc::clone(&calls)))],
    )
    .unwrap();
    let level = &batch_levels()[3];
    let first = validator.validate_level(level).unwrap();
    for _ in 0..5 {
        assert_eq!(validator.validate_level(level).unwrap(), first);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn disabled_cache_reruns_but_agrees() {
    let calls = Arc::new(AtomicUsize::new(0));
    let config = ValidatorConfig {
        enable_cache: false,
        ..test_config()
    };
    let mut analyzers = default_analyzers(&config);
    analyzers.push(Box::new(Counting(Arc::clone(&calls))));
    let validator = LevelValidator::with_analyzers(config, analyzers).unwrap();
    let level = &batch_levels()[1];
    let first = validator.validate_level(level).unwrap();
    let second = validator.validate_level(level).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(first.is_valid, second.is_valid);
    assert_eq!(first.solution_paths, second.solution_paths);
    assert_eq!(first.issues, second.issues);
    assert_eq!(validator.cache_len(), 0);
}

#[test]
fn cache_never_exceeds_capacity() {
    for policy in [CachePolicy::Lru, CachePolicy::Fifo] {
        let config = ValidatorConfig {
            max_cache_size: 4,
            cache_policy: policy,
            ..test_config()
        };
        let validator = LevelValidator::new(config).unwrap();
        for level in distinct_levels(12) {
            validator.validate_level(&level).unwrap();
            assert!(validator.cache_len() <= 4, "{policy:?} overflowed");
        }
        assert_eq!(validator.cache_len(), 4);
        assert_eq!(validator.stats().cache_size, 4);
    }
}

#[test]
fn evicted_level_is_recomputed_identically() {
    let calls = Arc::new(AtomicUsize::new(0));
    let config = ValidatorConfig {
        max_cache_size: 2,
        ..test_config()
    };
    let validator =
        LevelValidator::with_analyzers(config, vec![Box::new(Counting(Arc::clone(&calls)))])
            .unwrap();
    let levels = distinct_levels(3);
    let first = validator.validate_level(&levels[0]).unwrap();
    validator.validate_level(&levels[1]).unwrap();
    validator.validate_level(&levels[2]).unwrap();
    let again = validator.validate_level(&levels[0]).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 4, "level 0 was evicted");
    assert_eq!(first.is_valid, again.is_valid);
    assert_eq!(first.issues, again.issues);
    assert_eq!(first.content_hash, again.content_hash);
}

#[test]
fn clearing_cache_keeps_statistics() {
    let validator = LevelValidator::new(test_config()).unwrap();
    for level in distinct_levels(3) {
        validator.validate_level(&level).unwrap();
    }
    validator.clear_cache();
    let stats = validator.stats();
    assert_eq!(stats.cache_size, 0);
    assert_eq!(stats.levels_validated, 3);
}
