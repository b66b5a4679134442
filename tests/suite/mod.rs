//! Integration test suites

mod config;
mod hydration;
mod preview;
mod reactor;
