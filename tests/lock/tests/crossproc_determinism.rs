//! Cross-process determinism: the `validate_fixture` binary must print the
//! same verdicts regardless of working directory, locale, or unrelated
//! environment noise.

use std::path::Path;
use std::process::Command;

fn binary_path() -> String {
    let mut path = std::env::current_exe()
        .expect("can resolve test binary path")
        .parent()
        .expect("binary dir exists")
        .parent()
        .expect("deps parent exists")
        .to_path_buf();
    path.push("validate_fixture");
    path.to_string_lossy().to_string()
}

fn workspace_root() -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("tests/ exists")
        .parent()
        .expect("workspace root exists")
        .to_string_lossy()
        .to_string()
}

fn run_variant(work_dir: &str, env_overrides: &[(&str, &str)]) -> String {
    let bin = binary_path();
    let mut command = Command::new(&bin);
    command
        .current_dir(work_dir)
        .env_remove("LC_ALL")
        .env_remove("LC_COLLATE")
        .env_remove("LANG")
        .env_remove("LANGUAGE")
        .env_remove("RAYON_NUM_THREADS");
    for &(key, val) in env_overrides {
        command.env(key, val);
    }

    let output = command.output().unwrap_or_else(|e| {
        panic!("failed to spawn {bin} (work_dir={work_dir}, overrides={env_overrides:?}): {e}")
    });
    assert!(
        output.status.success(),
        "validate_fixture exited with {}: stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

#[test]
fn crossproc_determinism_four_env_variants() {
    let root = workspace_root();
    let baseline = run_variant(&root, &[]);

    assert!(baseline.contains("id=scenario-a valid=true"), "baseline:\n{baseline}");
    assert!(baseline.contains("id=scenario-b valid=false"), "baseline:\n{baseline}");
    assert!(baseline.contains("total=12"), "baseline:\n{baseline}");

    let tmp = std::env::temp_dir();
    let tmp = tmp.to_string_lossy();
    let variants: [(&str, &[(&str, &str)]); 3] = [
        (tmp.as_ref(), &[]),
        (root.as_str(), &[("LC_ALL", "C"), ("LANG", "C")]),
        (
            root.as_str(),
            &[
                ("CASCADE_NOISE", "1"),
                ("RAYON_NUM_THREADS", "1"),
                ("LANG", "en_US.UTF-8"),
            ],
        ),
    ];

    for (dir, env) in variants {
        let out = run_variant(dir, env);
        assert_eq!(
            out, baseline,
            "output diverged for work_dir={dir}, env={env:?}"
        );
    }
}

#[test]
fn fixture_output_has_one_line_per_level() {
    let out = run_variant(&workspace_root(), &[]);
    let verdicts = out.lines().filter(|l| l.starts_with("id=")).count();
    assert_eq!(verdicts, 12);
}
