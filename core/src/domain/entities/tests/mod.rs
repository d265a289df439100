//! Tests for domain entities

#[cfg(test)]
mod token_tests;
#[cfg(test)]
mod user_tests;
