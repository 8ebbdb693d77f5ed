//! Acceptance scenarios A–D: trivial, impossible, zero-budget, and a batch
//! with one pathological level.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cascade_kernel::level::{LevelDefinition, LevelError};
use cascade_validator::result::ISSUE_LOW_SOLVABILITY;
use cascade_validator::{
    default_analyzers, AnalyzerError, AnalyzerReport, LevelAnalyzer, LevelValidator,
    ValidationError,
};
use lock_tests::fixtures::{
    batch_levels, fingerprint, impossible_level, test_config, trivial_level, zero_move_level,
};

// ---------------------------------------------------------------------------
// Scenario A: trivial level
// ---------------------------------------------------------------------------

#[test]
fn scenario_a_trivial_level_is_valid() {
    let validator = LevelValidator::new(test_config()).unwrap();
    let result = validator.validate_level(&trivial_level()).unwrap();
    assert!(result.is_valid, "issues: {:?}", result.issues);
    assert!((result.solvability_score - 1.0).abs() < 1e-12);
    assert_eq!(result.solution_paths.len(), 1);
    assert!(result.solution_paths[0].is_empty());
}

#[test]
fn scenario_a_holds_under_default_path_minimum() {
    // The default asks for three paths; a level complete at zero moves has
    // only one solution, the empty path.
    let config = cascade_validator::ValidatorConfig {
        min_solution_paths: 3,
        ..test_config()
    };
    let validator = LevelValidator::new(config).unwrap();
    let result = validator.validate_level(&trivial_level()).unwrap();
    assert!(result.is_valid, "issues: {:?}", result.issues);
}

// ---------------------------------------------------------------------------
// Scenario B: impossible level
// ---------------------------------------------------------------------------

#[test]
fn scenario_b_impossible_level_is_invalid() {
    let validator = LevelValidator::new(test_config()).unwrap();
    let result = validator.validate_level(&impossible_level()).unwrap();
    assert!(!result.is_valid);
    assert!(
        result.solvability_score < 0.05,
        "solvability {}",
        result.solvability_score
    );
    assert!(result.has_issue(ISSUE_LOW_SOLVABILITY), "issues: {:?}", result.issues);
    assert!(result.solution_paths.is_empty());
}

// ---------------------------------------------------------------------------
// Scenario C: zero move budget
// ---------------------------------------------------------------------------

/// Fails the test if it is ever asked to analyze anything.
struct MustNotRun(Arc<AtomicBool>);

impl LevelAnalyzer for MustNotRun {
    fn name(&self) -> &str {
        "must_not_run"
    }

    fn analyze(&self, _level: &LevelDefinition) -> Result<AnalyzerReport, AnalyzerError> {
        self.0.store(true, Ordering::SeqCst);
        Ok(AnalyzerReport::default())
    }
}

#[test]
fn scenario_c_zero_move_limit_is_rejected_before_search() {
    let touched = Arc::new(AtomicBool::new(false));
    let validator = LevelValidator::with_analyzers(
        test_config(),
        vec![Box::new(MustNotRun(Arc::clone(&touched)))],
    )
    .unwrap();
    let err = validator.validate_level(&zero_move_level()).unwrap_err();
    assert_eq!(
        err,
        ValidationError::InvalidLevel {
            id: "scenario-c".into(),
            source: LevelError::ZeroMoveLimit,
        }
    );
    assert!(!touched.load(Ordering::SeqCst), "no analyzer may run");
    assert_eq!(validator.stats().levels_validated, 0);
}

#[test]
fn scenario_c_level_json_with_zero_moves_is_rejected() {
    let json = zero_move_level().to_json().unwrap();
    assert!(matches!(
        LevelDefinition::from_json(&json),
        Err(LevelError::ZeroMoveLimit)
    ));
}

// ---------------------------------------------------------------------------
// Scenario D: one pathological level in a batch of ten
// ---------------------------------------------------------------------------

const PATHOLOGICAL_ID: &str = "batch-04";

/// Panics on one level id, errors on nothing, reports nothing otherwise.
struct Pathological;

impl LevelAnalyzer for Pathological {
    fn name(&self) -> &str {
        "pathological"
    }

    fn analyze(&self, level: &LevelDefinition) -> Result<AnalyzerReport, AnalyzerError> {
        assert!(level.id != PATHOLOGICAL_ID, "stub analyzer blew up on {}", level.id);
        Ok(AnalyzerReport::default())
    }
}

#[test]
fn scenario_d_pathological_level_is_isolated() {
    let config = test_config();
    let mut analyzers = default_analyzers(&config);
    analyzers.push(Box::new(Pathological));
    let batch_validator = LevelValidator::with_analyzers(config.clone(), analyzers).unwrap();

    let levels = batch_levels();
    let results = batch_validator.validate_level_batch(&levels);
    assert_eq!(results.len(), 10);

    let single = LevelValidator::new(config).unwrap();
    for (level, result) in levels.iter().zip(&results) {
        assert_eq!(result.level_id, level.id);
        if level.id == PATHOLOGICAL_ID {
            assert!(!result.is_valid);
            assert!(
                result
                    .issues
                    .iter()
                    .any(|i| i.starts_with("validator pathological failed: ")),
                "issues: {:?}",
                result.issues
            );
            continue;
        }
        let alone = single.validate_level(level).unwrap();
        assert_eq!(
            fingerprint(result),
            fingerprint(&alone),
            "batch verdict for {} differs from single validation",
            level.id
        );
    }
}

#[test]
fn scenario_d_erroring_analyzer_is_isolated_too() {
    struct Refuses;

    impl LevelAnalyzer for Refuses {
        fn name(&self) -> &str {
            "refuses"
        }

        fn analyze(&self, level: &LevelDefinition) -> Result<AnalyzerReport, AnalyzerError> {
            if level.id == PATHOLOGICAL_ID {
                return Err(AnalyzerError::Failed {
                    detail: "refused".into(),
                });
            }
            Ok(AnalyzerReport::default())
        }
    }

    let validator =
        LevelValidator::with_analyzers(test_config(), vec![Box::new(Refuses)]).unwrap();
    let results = validator.validate_level_batch(&batch_levels());
    assert_eq!(results.len(), 10);
    let bad = results.iter().find(|r| r.level_id == PATHOLOGICAL_ID).unwrap();
    assert!(bad.has_issue("validator refuses failed: refused"));
    assert!(!bad.is_valid);
}
