//! Application layer containing the pricing logic and its orchestration.
//!
//! `engine` holds the pure quote computation. `catalog` and `quoting` wire it to
//! the storage ports: the catalog assembles versioned configuration snapshots and
//! the quote service prices requests against them. `job_request` turns a priced
//! job into the payload sent on to the CRM.

pub mod catalog;
pub mod engine;
pub mod job_request;
pub mod quoting;
