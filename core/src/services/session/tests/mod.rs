//! Tests for the session service

#[cfg(test)]
mod service_tests;
