//! Integration Test: Blocking I/O Prohibition
//!
//! **Policy**: Async code in the TUI and Conductor MUST NOT use blocking I/O.
//! Use `tokio::fs`, `tokio::net` and async `reqwest`. Blocking calls are fine
//! in plain functions that run before the event loop (config loading, log
//! file setup) and in tests.

use std::fs;
use std::path::Path;

use architectural_enforcement::{code_part, enclosing_fn, is_test_code, rust_sources, Violation};

/// Test that async code does not use blocking I/O
#[test]
fn test_no_blocking_io_in_async_code() {
    let mut violations = Vec::new();
    for dir in ["tui/src", "conductor/core/src"] {
        for path in rust_sources(dir) {
            check_file(&path, &mut violations);
        }
    }

    if !violations.is_empty() {
        eprintln!("\n❌ CRITICAL: Blocking I/O calls found in async code!\n");

        for violation in &violations {
            eprintln!("  ❌ {}", violation);
        }

        eprintln!("\n❌ FORBIDDEN in async fns:");
        eprintln!("  - std::fs::*, std::net::*");
        eprintln!("  - std::process::Command");
        eprintln!("  - reqwest::blocking::*");
        eprintln!("  - std::io::stdin() / std::io::stdout() reads and writes");
        eprintln!("\n✅ ACCEPTABLE:");
        eprintln!("  - Non-async functions (config loading, logging setup)");
        eprintln!("  - Test code");

        panic!(
            "\nFound {} blocking I/O violation(s).\nFix these before merging!",
            violations.len()
        );
    }
}

fn check_file(path: &Path, violations: &mut Vec<Violation>) {
    let Ok(content) = fs::read_to_string(path) else {
        return;
    };
    let lines: Vec<&str> = content.lines().collect();
    violations.extend(scan_lines(path, &lines));
}

fn scan_lines(path: &Path, lines: &[&str]) -> Vec<Violation> {
    let mut found = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let code = code_part(line);

        if is_test_code(lines, idx) {
            continue;
        }

        // Blocking is fine outside async fns; `use` lines are judged at the call site
        let in_async = enclosing_fn(lines, idx).is_some_and(|f| f.is_async);
        if !in_async {
            continue;
        }

        let kind = if code.contains("std::fs::") {
            Some("Blocking file I/O")
        } else if code.contains("std::net::") {
            Some("Blocking network I/O")
        } else if code.contains("std::process::Command") {
            Some("Blocking process I/O")
        } else if code.contains("reqwest::blocking") {
            Some("Blocking HTTP client")
        } else if code.contains("std::io::stdin()") || code.contains("std::io::stdout()") {
            Some("Blocking stdin/stdout in async")
        } else {
            None
        };

        if let Some(kind) = kind {
            found.push(Violation {
                path: path.to_path_buf(),
                line: idx + 1,
                kind,
                text: line.trim().to_string(),
            });
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blocking_io_in_async_detected() {
        let code = vec![
            "pub async fn bad_function() {",
            "    let contents = std::fs::read_to_string(\"file.txt\")?;",
            "}",
        ];

        let found = scan_lines(Path::new("x.rs"), &code);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, "Blocking file I/O");
    }

    #[test]
    fn test_non_async_function_allowed() {
        let code = vec![
            "fn load() {",
            "    let contents = std::fs::read_to_string(\"config.toml\")?;",
            "}",
        ];
        assert!(scan_lines(Path::new("x.rs"), &code).is_empty());
    }

    #[test]
    fn test_test_function_allowed() {
        let code = vec![
            "#[tokio::test]",
            "async fn test_something() {",
            "    let contents = std::fs::read_to_string(\"test.txt\")?;",
            "}",
        ];
        assert!(scan_lines(Path::new("x.rs"), &code).is_empty());
    }
}
