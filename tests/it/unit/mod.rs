//! Unit tests for lexiscatter.

mod perf_tests;
mod settings_tests;
mod snapshot_tests;
mod validator_tests;
