//! Tests for the credential issuance flow
