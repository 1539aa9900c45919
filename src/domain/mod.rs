//! Domain layer: value types for pricing configuration and quotes, plus the
//! ports the application layer uses to reach storage.

pub mod config;
pub mod money;
pub mod ports;
pub mod quote;
pub mod tier;
