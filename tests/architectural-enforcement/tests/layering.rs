//! Integration Test: Layering
//!
//! The conductor is headless: it must build without any terminal crate, so
//! another surface can embed it. The TUI is a thin client: it reaches the
//! answer service only through the conductor.

use std::fs;

use architectural_enforcement::{code_part, rust_sources, workspace_root, Violation};

const TERMINAL_CRATES: &[&str] = &["ratatui", "crossterm", "clap"];

/// Names listed under `[dependencies]` in a manifest
fn dependency_names(manifest: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut in_deps = false;

    for line in manifest.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            in_deps = line == "[dependencies]";
            continue;
        }
        if !in_deps || line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((name, _)) = line.split_once('=') {
            names.push(name.trim().to_string());
        }
    }
    names
}

/// Lines in `dir` that mention any of `needles` in code
fn mentions(dir: &str, needles: &[&str], kind: &'static str) -> Vec<Violation> {
    let mut found = Vec::new();
    for path in rust_sources(dir) {
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        for (idx, line) in content.lines().enumerate() {
            let code = code_part(line);
            if needles.iter().any(|n| code.contains(n)) {
                found.push(Violation {
                    path: path.clone(),
                    line: idx + 1,
                    kind,
                    text: line.trim().to_string(),
                });
            }
        }
    }
    found
}

#[test]
fn test_conductor_manifest_has_no_terminal_crates() {
    let manifest = fs::read_to_string(workspace_root().join("conductor/core/Cargo.toml"))
        .expect("conductor manifest");
    let deps = dependency_names(&manifest);

    for banned in TERMINAL_CRATES {
        assert!(
            !deps.iter().any(|d| d == banned),
            "conductor/core must not depend on {banned}"
        );
    }
}

#[test]
fn test_conductor_source_is_headless() {
    let violations = mentions(
        "conductor/core/src",
        &["ratatui::", "crossterm::", "insight_tui"],
        "Terminal dependency in conductor",
    );
    for v in &violations {
        eprintln!("  ❌ {v}");
    }
    assert!(violations.is_empty(), "conductor must stay headless");
}

#[test]
fn test_tui_reaches_service_through_conductor() {
    let violations = mentions(
        "tui/src",
        &["reqwest::", "HttpAnswerService::new"],
        "Direct service access in TUI",
    );
    // The client module is where the HTTP service is plugged in
    let violations: Vec<_> = violations
        .into_iter()
        .filter(|v| !v.path.ends_with("tui/src/conductor_client.rs"))
        .collect();

    for v in &violations {
        eprintln!("  ❌ {v}");
    }
    assert!(violations.is_empty(), "the TUI must go through ConductorClient");
}

#[test]
fn test_dependency_names_reads_only_dependencies_table() {
    let manifest = "[package]\nname = \"x\"\n\n[dependencies]\n# comment\ntokio = \"1\"\nserde = { version = \"1\" }\n\n[dev-dependencies]\nratatui = \"0.29\"\n";
    assert_eq!(dependency_names(manifest), vec!["tokio", "serde"]);
}
