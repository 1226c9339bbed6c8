//! Architectural Enforcement Helpers
//!
//! Shared source scanning for the enforcement tests under `tests/`:
//! - No sleep() calls in production code (wait on timers and channels)
//! - The core crate stays free of terminal and UI dependencies
//!
//! Scanning is line based. Comments are dropped and everything from the
//! first `#[cfg(test)]` onwards is treated as test code.

use std::fs;
use std::path::{Path, PathBuf};

/// A line of production code that broke a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File the line came from
    pub path: PathBuf,
    /// 1-based line number
    pub line_number: usize,
    /// Trimmed source line
    pub line: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{} - {}", self.path.display(), self.line_number, self.line)
    }
}

/// Workspace root, two levels above this package
#[must_use]
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// Every `.rs` file below `dir` (relative to the workspace root)
#[must_use]
pub fn rust_files(dir: &str) -> Vec<PathBuf> {
    let root = workspace_root().join(dir);
    walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .map(|e| e.into_path())
        .collect()
}

/// Production lines of a source file with comments stripped
///
/// Yields `(line_number, code)` pairs and stops at the first `#[cfg(test)]`.
#[must_use]
pub fn production_lines(content: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("#[cfg(test)]") {
            break;
        }
        if trimmed.starts_with("//") {
            continue;
        }
        let code = line.split("//").next().unwrap_or(line);
        out.push((idx + 1, code));
    }
    out
}

/// Scan every production line below `dir` with `matches`
#[must_use]
pub fn scan<F>(dir: &str, matches: F) -> Vec<Violation>
where
    F: Fn(&str) -> bool,
{
    let mut violations = Vec::new();
    for path in rust_files(dir) {
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        for (line_number, code) in production_lines(&content) {
            if matches(code) {
                violations.push(Violation {
                    path: path.clone(),
                    line_number,
                    line: code.trim().to_string(),
                });
            }
        }
    }
    violations
}

/// A blocking or async sleep call
#[must_use]
pub fn is_sleep_call(code: &str) -> bool {
    code.contains("::sleep(") || code.contains(".sleep(") || code.contains("sleep_until(")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_lines_skip_comments_and_tests() {
        let source = "\
fn run() {
    // tokio::time::sleep(d).await;
    tick(); // sleep later
}

#[cfg(test)]
mod tests {
    fn wait() { std::thread::sleep(d); }
}
";
        let lines = production_lines(source);
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|(_, code)| !is_sleep_call(code)));
        assert_eq!(lines[1], (3, "    tick(); "));
    }

    #[test]
    fn test_sleep_detection() {
        assert!(is_sleep_call("tokio::time::sleep(Duration::from_millis(10)).await;"));
        assert!(is_sleep_call("std::thread::sleep(d);"));
        assert!(is_sleep_call("time::sleep_until(deadline).await;"));
        assert!(!is_sleep_call("let mut ticks = interval_at(start, period);"));
    }

    #[test]
    fn test_workspace_root_holds_crates() {
        assert!(workspace_root().join("companion/core/Cargo.toml").exists());
        assert!(workspace_root().join("tui/Cargo.toml").exists());
    }
}
