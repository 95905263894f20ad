//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code in the TUI and Conductor MUST NOT call sleep
//! methods. Waiting happens on I/O, channels, `tokio::time::timeout` or an
//! interval ticker.
//!
//! **Exceptions**: Frame rate limiting (TUI only), test code in the TUI

use std::fs;
use std::path::Path;

use architectural_enforcement::{code_part, is_test_code, rust_sources, Violation};

struct SleepPolicy {
    allow_frame_limiting: bool,
    allow_tests: bool,
}

/// Test that production code does not contain sleep() calls
#[test]
fn test_no_sleep_in_production_code() {
    let violations = find_sleep_violations();

    if !violations.is_empty() {
        eprintln!("\n❌ CRITICAL: Sleep calls found in production code!\n");

        for violation in &violations {
            eprintln!("  ❌ {}", violation);
        }

        eprintln!("\n✅ ACCEPTABLE waiting:");
        eprintln!("  - tokio::time::interval() for frame ticks");
        eprintln!("  - tokio::time::timeout() around service calls");
        eprintln!("  - Notify / channels for test gating");
        eprintln!("\n❌ FORBIDDEN:");
        eprintln!("  - Sleep in polling loops");
        eprintln!("  - Sleep as poor man's synchronization");

        panic!(
            "\nFound {} sleep violation(s) in production code.\nFix these before merging!",
            violations.len()
        );
    }
}

/// Find all sleep() calls in production code
fn find_sleep_violations() -> Vec<Violation> {
    let mut violations = Vec::new();

    for path in rust_sources("tui/src") {
        check_file(
            &path,
            &mut violations,
            &SleepPolicy {
                allow_frame_limiting: true,
                allow_tests: true,
            },
        );
    }

    // Conductor tests gate on Notify instead
    for path in rust_sources("conductor/core/src") {
        check_file(
            &path,
            &mut violations,
            &SleepPolicy {
                allow_frame_limiting: false,
                allow_tests: false,
            },
        );
    }

    violations
}

fn check_file(path: &Path, violations: &mut Vec<Violation>, policy: &SleepPolicy) {
    let Ok(content) = fs::read_to_string(path) else {
        return;
    };
    let lines: Vec<&str> = content.lines().collect();
    violations.extend(scan_lines(path, &lines, policy));
}

fn scan_lines(path: &Path, lines: &[&str], policy: &SleepPolicy) -> Vec<Violation> {
    let mut found = Vec::new();

    for (idx, line) in lines.iter().enumerate() {
        let code = code_part(line);
        if !code.contains("::sleep(") && !code.contains(".sleep(") {
            continue;
        }

        if policy.allow_tests && is_test_code(lines, idx) {
            continue;
        }

        if policy.allow_frame_limiting
            && path.ends_with("tui/src/app.rs")
            && is_frame_limiting_context(lines, idx)
        {
            continue;
        }

        found.push(Violation {
            path: path.to_path_buf(),
            line: idx + 1,
            kind: "Sleep call",
            text: line.trim().to_string(),
        });
    }

    found
}

/// Check if sleep is used for frame rate limiting (acceptable in TUI)
fn is_frame_limiting_context(lines: &[&str], current_idx: usize) -> bool {
    let context_range = current_idx.saturating_sub(10)..(current_idx + 5).min(lines.len());

    lines[context_range].iter().any(|line| {
        let line = line.to_lowercase();
        line.contains("frame") || line.contains("fps") || line.contains("tick_rate")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const STRICT: SleepPolicy = SleepPolicy {
        allow_frame_limiting: false,
        allow_tests: false,
    };

    #[test]
    fn test_sleep_violation_detection() {
        let code = vec![
            "async fn bad_function() {",
            "    tokio::time::sleep(Duration::from_millis(10)).await;",
            "}",
        ];

        let found = scan_lines(Path::new("conductor/core/src/x.rs"), &code, &STRICT);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].line, 2);
    }

    #[test]
    fn test_commented_sleep_is_ignored() {
        let code = vec!["fn f() {", "    // tokio::time::sleep(d).await;", "}"];
        assert!(scan_lines(Path::new("x.rs"), &code, &STRICT).is_empty());
    }

    #[test]
    fn test_frame_limiting_detection() {
        let code = vec![
            "async fn render_loop() {",
            "    let frame_duration = Duration::from_millis(50);",
            "    loop {",
            "        render();",
            "        tokio::time::sleep(frame_duration).await;",
            "    }",
            "}",
        ];

        assert!(is_frame_limiting_context(&code, 4));

        let tui = SleepPolicy {
            allow_frame_limiting: true,
            allow_tests: true,
        };
        assert!(scan_lines(Path::new("tui/src/app.rs"), &code, &tui).is_empty());
        assert_eq!(
            scan_lines(Path::new("tui/src/display.rs"), &code, &tui).len(),
            1
        );
    }
}
