//! Error Display Tests.
//!
//! The messages are shown to users verbatim, so their wording is checked here.

use cachesim_core::common::{ConfigError, SimError, TraceError};

#[test]
fn config_error_names_the_broken_rule() {
    let msg = ConfigError::BlockSize { b: 9 }.to_string();
    assert!(msg.starts_with("Invalid configuration!"));
    assert!(msg.contains("4 <= B <= 7"));
    assert!(msg.contains("B = 9"));
}

#[test]
fn tlb_error_reports_the_limit() {
    let msg = ConfigError::TlbEntries { t: 7, limit: 4 }.to_string();
    assert!(msg.contains("T = 7"));
    assert!(msg.contains("limit = 4"));
}

#[test]
fn trace_error_reports_line_number() {
    let err = TraceError::Direction {
        line: 12,
        direction: "X".to_owned(),
    };
    assert_eq!(err.to_string(), "line 12: unknown access direction \"X\"");
}

#[test]
fn sim_error_is_transparent_for_config() {
    let inner = ConfigError::CacheSize { c: 20 };
    let outer = SimError::from(inner.clone());
    assert_eq!(outer.to_string(), inner.to_string());
}
