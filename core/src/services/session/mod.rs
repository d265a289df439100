//! Session lifecycle service
//!
//! Owns the bounded-renewal state machine: validation against the
//! caller-presented version, extension through the store's conditional
//! update, and teardown on expiry, cap exhaustion, or logout.

mod service;

#[cfg(test)]
mod tests;

pub use service::SessionService;
