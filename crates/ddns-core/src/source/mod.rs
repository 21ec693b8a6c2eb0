//! Built-in IP source implementations
//!
//! Reflector-based discovery lives in the `ddns-ip-http` crate.

pub mod fixed;

pub use fixed::FixedIpSource;
