//! Integration tests for pricefeed-cli.
//!
//! These tests run full resolutions against local mock exchanges:
//! - REST primaries and peg sources served by wiremock
//! - The ticker feed served by a local WebSocket server

pub mod common;
