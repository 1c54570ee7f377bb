//! CLI integration tests for packhorse.

mod common;
mod compile_tests;
mod plan_tests;
