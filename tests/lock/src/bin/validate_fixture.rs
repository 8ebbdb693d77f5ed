//! Binary that validates the fixture levels and prints one deterministic
//! line per verdict for cross-process verification.
//!
//! Usage: `validate_fixture`
//!
//! Output: `fingerprint` lines (see `lock_tests::fixtures`), then
//! `passed=<n>` and `total=<n>`.

use cascade_validator::LevelValidator;
use lock_tests::fixtures::{batch_levels, fingerprint, impossible_level, test_config, trivial_level};

fn main() {
    let validator = match LevelValidator::new(test_config()) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("validator configuration rejected: {e}");
            std::process::exit(2);
        }
    };

    let mut levels = vec![trivial_level(), impossible_level()];
    levels.extend(batch_levels());

    let results = validator.validate_level_batch(&levels);
    for result in &results {
        println!("{}", fingerprint(result));
    }
    println!("passed={}", results.iter().filter(|r| r.is_valid).count());
    println!("total={}", results.len());
}
