//! Property tests over randomly generated small levels.

use std::collections::BTreeSet;

use cascade_kernel::level::{LevelDefinition, Objective};
use cascade_search::SearchPolicy;
use cascade_validator::{LevelValidator, ValidatorConfig};
use lock_tests::fixtures::test_config;
use proptest::prelude::*;

/// Settings light enough to run many cases.
fn quick_config(max_paths: usize) -> ValidatorConfig {
    ValidatorConfig {
        search: SearchPolicy {
            mcts_iterations: 20,
            max_expansions: 80,
            max_simulation_depth: 12,
            ..test_config().search
        },
        max_solution_paths: max_paths,
        enable_cache: false,
        ..test_config()
    }
}

fn arb_level() -> impl Strategy<Value = LevelDefinition> {
    (3usize..=5, 3usize..=5)
        .prop_flat_map(|(w, h)| {
            (
                prop::collection::vec(prop::collection::vec(1u8..=4, w), h),
                1u32..=5,
                0u64..=150,
            )
        })
        .prop_map(|(cells, move_limit, target)| {
            let rows: Vec<String> = cells
                .iter()
                .map(|row| row.iter().map(|c| char::from(b'0' + c)).collect())
                .collect();
            let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
            LevelDefinition::from_rows(
                "prop",
                &rows,
                move_limit,
                target,
                vec![Objective::ReachScore { target }],
            )
            .unwrap()
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn scores_stay_in_unit_interval(level in arb_level()) {
        let validator = LevelValidator::new(quick_config(5)).unwrap();
        let result = validator.validate_level(&level).unwrap();
        prop_assert!((0.0..=1.0).contains(&result.solvability_score));
        prop_assert!((0.0..=1.0).contains(&result.difficulty_score));
        for path in &result.solution_paths {
            prop_assert!((0.0..=1.0).contains(&path.difficulty));
            prop_assert!(path.efficiency >= 0.0);
        }
    }

    #[test]
    fn paths_are_distinct_and_bounded(level in arb_level(), max_paths in 1usize..=4) {
        let validator = LevelValidator::new(quick_config(max_paths)).unwrap();
        let result = validator.validate_level(&level).unwrap();
        prop_assert!(result.solution_paths.len() <= max_paths);
        let keys: BTreeSet<String> = result.solution_paths.iter().map(|p| p.key()).collect();
        prop_assert_eq!(keys.len(), result.solution_paths.len());
        for path in &result.solution_paths {
            prop_assert!(path.len() <= level.move_limit as usize);
        }
    }

    #[test]
    fn invalid_results_always_explain_themselves(level in arb_level()) {
        let validator = LevelValidator::new(quick_config(3)).unwrap();
        let result = validator.validate_level(&level).unwrap();
        if !result.is_valid {
            prop_assert!(!result.issues.is_empty());
        }
    }

    #[test]
    fn cache_size_respects_capacity(capacity in 1usize..=4, count in 0usize..=8) {
        let config = ValidatorConfig {
            max_cache_size: capacity,
            enable_cache: true,
            ..quick_config(2)
        };
        let validator = LevelValidator::new(config).unwrap();
        for i in 0..count {
            let level = LevelDefinition::from_rows(
                &format!("cap-{i}"),
                &["1"],
                1,
                0,
                vec![Objective::ReachScore { target: 0 }],
            )
            .unwrap();
            validator.validate_level(&level).unwrap();
            prop_assert!(validator.cache_len() <= capacity);
        }
        prop_assert_eq!(validator.cache_len(), count.min(capacity));
    }
}
