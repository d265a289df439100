//! Tests for the mock session repository
