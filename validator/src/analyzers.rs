//! Search-backed analyzers: the tree search and the path finder.

use cascade_kernel::level::LevelDefinition;
use cascade_search::{find_paths, solve, GreedyRollout, SearchPolicy};
use tracing::debug;

use crate::config::ValidatorConfig;
use crate::contract::{AnalyzerError, AnalyzerKind, AnalyzerReport, LevelAnalyzer};
use crate::difficulty::DifficultyAnalyzer;

/// Monte Carlo tree search as an analyzer.
#[derive(Debug, Clone)]
pub struct SearchBasedSolver {
    policy: SearchPolicy,
    max_paths: usize,
}

impl SearchBasedSolver {
    #[must_use]
    pub fn new(policy: SearchPolicy, max_paths: usize) -> Self {
        Self { policy, max_paths }
    }
}

impl LevelAnalyzer for SearchBasedSolver {
    fn name(&self) -> &str {
        "tree_search"
    }

    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::TreeSearch
    }

    fn analyze(&self, level: &LevelDefinition) -> Result<AnalyzerReport, AnalyzerError> {
        let rollout = GreedyRollout {
            greediness: self.policy.rollout_greediness,
        };
        let outcome = solve(level, &self.policy, &rollout, self.max_paths)?;
        debug!(
            level = %level.id,
            iterations = outcome.iterations,
            timed_out = outcome.timed_out,
            paths = outcome.paths.len(),
            "tree search analyzed level"
        );
        Ok(AnalyzerReport {
            solvability: Some(outcome.solvability),
            difficulty: outcome.difficulty,
            paths: outcome.paths,
            issues: outcome.issues,
            metrics: Some(outcome.metrics),
        })
    }
}

/// Best-first path enumeration as an analyzer.
///
/// Its solvability estimate is `min(1, paths / min_paths)`; a level that is
/// complete before any move scores 1.
#[derive(Debug, Clone)]
pub struct SolutionPathFinder {
    policy: SearchPolicy,
    min_paths: usize,
    max_paths: usize,
}

impl SolutionPathFinder {
    #[must_use]
    pub fn new(policy: SearchPolicy, min_paths: usize, max_paths: usize) -> Self {
        Self {
            policy,
            min_paths,
            max_paths,
        }
    }
}

impl LevelAnalyzer for SolutionPathFinder {
    fn name(&self) -> &str {
        "path_finder"
    }

    fn kind(&self) -> AnalyzerKind {
        AnalyzerKind::PathEnumeration
    }

    #[allow(clippy::cast_precision_loss)]
    fn analyze(&self, level: &LevelDefinition) -> Result<AnalyzerReport, AnalyzerError> {
        let outcome = find_paths(level, &self.policy, self.max_paths)?;
        let trivially_complete = outcome.paths.iter().any(|p| p.is_empty());
        let estimate = if trivially_complete || self.min_paths == 0 {
            1.0
        } else {
            (outcome.paths.len() as f64 / self.min_paths as f64).min(1.0)
        };
        debug!(
            level = %level.id,
            termination = ?outcome.termination,
            expansions = outcome.expansions,
            paths = outcome.paths.len(),
            "path finder analyzed level"
        );
        Ok(AnalyzerReport {
            solvability: Some(estimate),
            difficulty: None,
            paths: outcome.paths,
            issues: Vec::new(),
            metrics: Some(outcome.metrics),
        })
    }
}

/// The standard trio: difficulty heuristic, tree search, path finder.
#[must_use]
pub fn default_analyzers(config: &ValidatorConfig) -> Vec<Box<dyn LevelAnalyzer>> {
    vec![
        Box::new(DifficultyAnalyzer),
        Box::new(SearchBasedSolver::new(
            config.search.clone(),
            config.max_solution_paths,
        )),
        Box::new(SolutionPathFinder::new(
            config.search.clone(),
            config.min_solution_paths,
            config.max_solution_paths,
        )),
    ]
}
