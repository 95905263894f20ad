//! Architectural Enforcement Integration Tests
//!
//! This package contains integration tests that enforce architectural principles:
//! - No sleep() calls in production code
//! - No blocking I/O inside async functions
//! - The conductor stays headless; the TUI reaches the service only through it
//!
//! The helpers below are shared by the test files: they locate the workspace,
//! list Rust sources and answer "what function is this line in?" with a
//! line-based scan that is good enough for rustfmt-formatted code.

use std::fmt;
use std::path::{Path, PathBuf};

/// Workspace root, independent of the directory `cargo test` runs from
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// All `.rs` files under `dir` (relative to the workspace root)
pub fn rust_sources(dir: &str) -> Vec<PathBuf> {
    let root = workspace_root().join(dir);
    if !root.exists() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// A rule broken at one source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub path: PathBuf,
    pub line: usize,
    pub kind: &'static str,
    pub text: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{} - {}: {}",
            self.path.display(),
            self.line,
            self.kind,
            self.text
        )
    }
}

/// The line with any `//` comment removed
pub fn code_part(line: &str) -> &str {
    line.split("//").next().unwrap_or(line)
}

/// The function a line belongs to, as far as a backwards scan can tell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnclosingFn {
    /// Index of the `fn` line
    pub line: usize,
    pub is_async: bool,
    pub is_test: bool,
}

/// Whether a trimmed line opens a function item
fn is_fn_line(trimmed: &str) -> bool {
    let mut rest = trimmed;
    for prefix in ["pub(crate) ", "pub(super) ", "pub ", "const ", "async ", "unsafe "] {
        if let Some(stripped) = rest.strip_prefix(prefix) {
            rest = stripped;
        }
    }
    // `async` may follow `pub`
    let rest = rest.strip_prefix("async ").unwrap_or(rest);
    rest.starts_with("fn ")
}

/// Find the function enclosing `current_idx`
///
/// Stops at `mod` and `impl` lines: code between an impl header and its
/// first method is not inside a function.
pub fn enclosing_fn(lines: &[&str], current_idx: usize) -> Option<EnclosingFn> {
    for i in (0..=current_idx).rev() {
        let line = lines[i].trim();

        if is_fn_line(line) {
            return Some(EnclosingFn {
                line: i,
                is_async: line.contains("async fn "),
                is_test: has_test_attribute(lines, i),
            });
        }

        if line.starts_with("mod ") || (line.starts_with("impl") && line.contains('{')) {
            return None;
        }
    }
    None
}

/// Whether the attributes directly above `fn_idx` mark a test
fn has_test_attribute(lines: &[&str], fn_idx: usize) -> bool {
    for i in (0..fn_idx).rev() {
        let line = lines[i].trim();
        if !line.starts_with("#[") && !line.starts_with("///") {
            break;
        }
        if line.starts_with("#[test]") || line.starts_with("#[tokio::test") {
            return true;
        }
    }
    false
}

/// Whether the line sits after a `#[cfg(test)]` marker
///
/// Test modules live at the bottom of each file, so everything after the
/// marker is test code.
pub fn in_test_module(lines: &[&str], current_idx: usize) -> bool {
    lines[..current_idx]
        .iter()
        .any(|line| line.trim().starts_with("#[cfg(test)]"))
}

/// Whether the line is test code of any kind
pub fn is_test_code(lines: &[&str], current_idx: usize) -> bool {
    in_test_module(lines, current_idx)
        || enclosing_fn(lines, current_idx).is_some_and(|f| f.is_test)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_has_manifest() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }

    #[test]
    fn test_rust_sources_finds_conductor() {
        let files = rust_sources("conductor/core/src");
        assert!(files.iter().any(|p| p.ends_with("conductor.rs")));
        assert!(rust_sources("does/not/exist").is_empty());
    }

    #[test]
    fn test_enclosing_fn_variants() {
        let code = vec![
            "impl Foo {",
            "    pub async fn run(&mut self) {",
            "        work().await;",
            "    }",
            "",
            "    pub(crate) fn helper() {",
            "        let x = 1;",
            "    }",
            "}",
        ];

        let run = enclosing_fn(&code, 2).unwrap();
        assert_eq!(run.line, 1);
        assert!(run.is_async);

        let helper = enclosing_fn(&code, 6).unwrap();
        assert_eq!(helper.line, 5);
        assert!(!helper.is_async);

        assert!(enclosing_fn(&code, 0).is_none());
    }

    #[test]
    fn test_test_attribute_detection() {
        let code = vec![
            "#[tokio::test]",
            "async fn test_something() {",
            "    tokio::time::sleep(d).await;",
            "}",
        ];
        assert!(is_test_code(&code, 2));
    }

    #[test]
    fn test_cfg_test_module_detection() {
        let code = vec![
            "fn real() {}",
            "#[cfg(test)]",
            "mod tests {",
            "    fn helper() { std::fs::read(\"x\"); }",
            "}",
        ];
        assert!(!is_test_code(&code, 0));
        assert!(is_test_code(&code, 3));
    }

    #[test]
    fn test_code_part_strips_comments() {
        assert_eq!(code_part("let x = 1; // sleep(1)"), "let x = 1; ");
        assert_eq!(code_part("/// docs"), "");
    }
}
