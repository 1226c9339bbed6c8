//! Integration Test: Sleep Prohibition
//!
//! Production code in the core and the TUI must not sleep. Reply pacing uses
//! `tokio::time::interval_at`, redraws use a frame interval, and everything
//! else waits on channels or terminal events.
//!
//! Test code is exempt; paused-clock tests advance time with sleeps.

use architectural_enforcement::{is_sleep_call, scan};

fn report(dir: &str) {
    let violations = scan(dir, is_sleep_call);
    if violations.is_empty() {
        return;
    }

    eprintln!("\n❌ CRITICAL: Sleep calls found in {dir}\n");
    for violation in &violations {
        eprintln!("  ❌ {violation}");
    }
    eprintln!("\n✅ ACCEPTABLE:");
    eprintln!("  - Periodic work driven by tokio::time::interval()");
    eprintln!("  - Test code (#[cfg(test)] modules and tests/ directories)");

    panic!(
        "\nFound {} sleep violation(s) in {dir}.\nFix these before merging!",
        violations.len()
    );
}

#[test]
fn test_no_sleep_in_core() {
    report("companion/core/src");
}

#[test]
fn test_no_sleep_in_tui() {
    report("tui/src");
}
