//! Integration Test: Core Independence
//!
//! The core crate holds all home screen state and must build without a
//! terminal. Rendering and input belong to the TUI crate.

use std::fs;

use architectural_enforcement::{scan, workspace_root};

const UI_CRATES: &[&str] = &["ratatui", "crossterm"];

#[test]
fn test_core_sources_do_not_import_ui_crates() {
    let violations = scan("companion/core/src", |code| {
        UI_CRATES
            .iter()
            .any(|krate| code.contains(&format!("{krate}::")))
    });

    for violation in &violations {
        eprintln!("  ❌ {violation}");
    }
    assert!(
        violations.is_empty(),
        "core must not reference terminal crates ({} found)",
        violations.len()
    );
}

#[test]
fn test_core_manifest_has_no_ui_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("companion/core/Cargo.toml"))
        .expect("core manifest readable");

    for krate in UI_CRATES {
        assert!(
            !manifest
                .lines()
                .any(|line| line.trim_start().starts_with(krate)),
            "core Cargo.toml depends on {krate}"
        );
    }
}

#[test]
fn test_tui_depends_on_core() {
    let manifest = fs::read_to_string(workspace_root().join("tui/Cargo.toml"))
        .expect("tui manifest readable");
    assert!(manifest.contains("companion-core"));
}
