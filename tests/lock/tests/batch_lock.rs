//! Batch locks: one result per input, in input order, attributed by id.

use cascade_validator::LevelValidator;
use lock_tests::fixtures::{batch_levels, distinct_levels, fingerprint, test_config};

#[test]
fn batch_returns_one_result_per_level_in_order() {
    let validator = LevelValidator::new(test_config()).unwrap();
    let levels = batch_levels();
    let results = validator.validate_level_batch(&levels);
    assert_eq!(results.len(), levels.len());
    for (level, result) in levels.iter().zip(&results) {
        assert_eq!(result.level_id, level.id);
        assert_eq!(result.content_hash, level.content_hash().as_str());
    }
}

#[test]
fn empty_batch_yields_empty_results() {
    let validator = LevelValidator::new(test_config()).unwrap();
    assert!(validator.validate_level_batch(&[]).is_empty());
    assert_eq!(validator.stats().levels_validated, 0);
}

#[test]
fn batch_is_independent_of_worker_count() {
    let levels = batch_levels();
    let mut baseline = None;
    for workers in [1, 2, 8] {
        let config = cascade_validator::ValidatorConfig {
            max_concurrent_validations: workers,
            ..test_config()
        };
        let validator = LevelValidator::new(config).unwrap();
        let prints: Vec<String> = validator
            .validate_level_batch(&levels)
            .iter()
            .map(fingerprint)
            .collect();
        match &baseline {
            None => baseline = Some(prints),
            Some(expected) => assert_eq!(&prints, expected, "{workers} workers diverged"),
        }
    }
}

#[test]
fn batch_with_rejected_level_still_covers_every_input() {
    let validator = LevelValidator::new(test_config()).unwrap();
    let mut levels = distinct_levels(4);
    levels[2].move_limit = 0;
    let results = validator.validate_level_batch(&levels);
    assert_eq!(results.len(), 4);
    assert!(!results[2].is_valid);
    assert!(results[2]
        .issues
        .iter()
        .any(|i| i.starts_with(cascade_validator::batch::ISSUE_PREFIX_REJECTED)));
    for i in [0, 1, 3] {
        assert!(results[i].is_valid, "issues: {:?}", results[i].issues);
    }
    let stats = validator.stats();
    assert_eq!(stats.levels_validated, 4);
    assert_eq!(stats.levels_failed, 1);
}

#[test]
fn batch_feeds_the_report() {
    let config = test_config();
    let validator = LevelValidator::new(config).unwrap();
    let results = validator.validate_level_batch(&batch_levels());
    let report = validator.generate_validation_report(&results);
    assert_eq!(report.total_levels, 10);
    assert_eq!(report.passed_levels + report.failed_levels, 10);
    let json = report.to_json_pretty().unwrap();
    assert!(json.contains("\"total_levels\": 10"));
}

#[test]
fn report_export_parses_back() {
    let validator = LevelValidator::new(test_config()).unwrap();
    let results = validator.validate_level_batch(&batch_levels()[..4]);
    let report = validator.generate_validation_report(&results);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.json");
    report.write_json(&path).unwrap();
    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed["total_levels"], 4);
    assert_eq!(
        parsed["passed_levels"].as_u64().unwrap() as usize,
        results.iter().filter(|r| r.is_valid).count()
    );
}
