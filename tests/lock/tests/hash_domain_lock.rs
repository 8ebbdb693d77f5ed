//! Hash domain governance locks.
//!
//! Proves:
//! 1. The domain set has the expected count
//! 2. All domain byte strings are unique
//! 3. All domains are null-terminated
//! 4. All domains follow the `CASCADE::*::V1\0` naming convention
//! 5. No raw `CASCADE::` domain literals in production source outside `hash_domain.rs`
//! 6. No `deny_unknown_fields` in production source (level and config JSON stay extensible)

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use cascade_kernel::digest::hash::canonical_hash;
use cascade_kernel::digest::hash_domain::HashDomain;

const PRODUCTION_DIRS: [&str; 3] = [
    concat!(env!("CARGO_MANIFEST_DIR"), "/../../kernel/src"),
    concat!(env!("CARGO_MANIFEST_DIR"), "/../../search/src"),
    concat!(env!("CARGO_MANIFEST_DIR"), "/../../validator/src"),
];

#[test]
fn hash_domain_canonical_set_count() {
    assert_eq!(
        HashDomain::ALL.len(),
        4,
        "expected 4 domain variants; if you added a new domain, update this count"
    );
}

#[test]
fn hash_domain_all_unique_bytes() {
    let mut seen = BTreeSet::new();
    for domain in HashDomain::ALL {
        assert!(
            seen.insert(domain.as_bytes()),
            "duplicate domain bytes: {domain}"
        );
    }
}

#[test]
fn hash_domain_all_null_terminated() {
    for domain in HashDomain::ALL {
        assert!(
            domain.as_bytes().ends_with(&[0]),
            "{domain} is not null-terminated"
        );
    }
}

#[test]
fn hash_domain_all_follow_naming_convention() {
    for domain in HashDomain::ALL {
        let bytes = domain.as_bytes();
        assert!(
            bytes.starts_with(b"CASCADE::"),
            "{domain} does not start with CASCADE::"
        );
        assert!(
            bytes.ends_with(b"::V1\0"),
            "{domain} does not end with ::V1\\0"
        );
    }
}

#[test]
fn same_payload_differs_across_domains() {
    let digests: BTreeSet<String> = HashDomain::ALL
        .iter()
        .map(|&d| canonical_hash(d, b"payload").hex_digest().to_string())
        .collect();
    assert_eq!(digests.len(), HashDomain::ALL.len());
}

#[test]
fn production_dirs_exist() {
    for dir in PRODUCTION_DIRS {
        assert!(Path::new(dir).is_dir(), "{dir} is missing; scan would be vacuous");
    }
}

#[test]
fn no_raw_domain_literals_outside_authority() {
    let pattern = "b\"CASCADE::";
    let authority_file = "hash_domain.rs";
    let mut violations = Vec::new();
    for dir in PRODUCTION_DIRS {
        scan_dir_for_pattern(dir, pattern, authority_file, &mut violations);
    }
    assert!(
        violations.is_empty(),
        "raw CASCADE:: domain literals found outside {authority_file}:\n{}",
        violations.join("\n")
    );
}

#[test]
fn no_deny_unknown_fields_in_production_code() {
    let mut violations = Vec::new();
    for dir in PRODUCTION_DIRS {
        scan_dir_for_pattern(dir, "deny_unknown_fields", "", &mut violations);
    }
    assert!(
        violations.is_empty(),
        "deny_unknown_fields found in production code:\n{}",
        violations.join("\n")
    );
}

/// Record lines containing `pattern` in `.rs` files under `dir`, skipping
/// `authority_file` and comment lines. Test modules sit at the end of each
/// file, so everything from the first `#[cfg(test)]` on is ignored.
fn scan_dir_for_pattern(
    dir: &str,
    pattern: &str,
    authority_file: &str,
    violations: &mut Vec<String>,
) {
    let sources = walk(Path::new(dir)).into_iter().filter(|p| {
        p.extension().is_some_and(|e| e == "rs")
            && p.file_name().and_then(|n| n.to_str()) != Some(authority_file)
    });
    for path in sources {
        let Ok(content) = std::fs::read_to_string(&path) else {
            continue;
        };
        let production = content
            .lines()
            .enumerate()
            .take_while(|(_, line)| !line.trim_start().starts_with("#[cfg(test)]"));
        for (i, line) in production {
            let trimmed = line.trim();
            if !trimmed.starts_with("//") && trimmed.contains(pattern) {
                violations.push(format!("  {}:{}: {trimmed}", path.display(), i + 1));
            }
        }
    }
}

fn walk(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    entries
        .flatten()
        .map(|e| e.path())
        .flat_map(|p| if p.is_dir() { walk(&p) } else { vec![p] })
        .collect()
}
