//! GymHub - gym and personal-trainer booking marketplace.
//!
//! Members book gym passes, memberships and trainer sessions; gym owners
//! run their catalog and check members in; super-admins moderate gyms and
//! manage commission and payouts.
//!
//! Layered hexagonally: `domain` holds the rules, `ports` the contracts,
//! `application` the use cases and `adapters` the Postgres, HTTP, payment,
//! media, email and identity implementations.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
