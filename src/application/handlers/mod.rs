//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations through
//! the ports. One area per module; HTTP handlers call these and nothing
//! below them.

mod common;

pub mod booking;
pub mod gym;
pub mod monetization;
pub mod review;
pub mod trainer;
pub mod upload;
pub mod user;

#[cfg(test)]
pub(crate) mod test_support;

pub use upload::UploadMediaHandler;
