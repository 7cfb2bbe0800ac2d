use std::path::{Path, PathBuf};

use arch_lint::rules::{NoErrorSwallowing, NoSilentResultDrop};
use arch_lint::{Analyzer, Severity};

const CRATES: [&str; 4] = ["unbox-core", "unbox-fetch", "unbox-build", "unbox-cli"];

fn crates_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("crates directory")
        .to_path_buf()
}

/// Runs AL003 (no-error-swallowing) and AL013 (no-silent-result-drop) over
/// one crate's `src/`. Integration tests are excluded.
fn lint_crate(name: &str) -> Option<String> {
    let analyzer = Analyzer::builder()
        .root(crates_dir().join(name))
        .exclude("**/target/**")
        .exclude("**/tests/**")
        .rule(NoErrorSwallowing::new())
        .rule(NoSilentResultDrop::new())
        .build()
        .expect("build analyzer");

    let result = analyzer.analyze().expect("analyze");
    result
        .has_violations_at(Severity::Warning)
        .then(|| format!("{name}:\n{}", result.format_test_report(Severity::Warning)))
}

#[test]
fn workspace_crates_are_all_linted() {
    for name in CRATES {
        assert!(
            crates_dir().join(name).join("Cargo.toml").exists(),
            "{name} is missing from crates/"
        );
    }
}

#[test]
fn no_swallowed_errors_in_any_crate() {
    let reports: Vec<String> = CRATES.iter().filter_map(|name| lint_crate(name)).collect();
    if !reports.is_empty() {
        panic!("{}", reports.join("\n"));
    }
}
