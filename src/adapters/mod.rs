//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the application to external systems:
//! - `http` - axum routers, auth middleware and DTOs
//! - `postgres` - sqlx repositories
//! - `memory` - in-memory repositories for tests and local runs
//! - `auth` - JWKS-backed bearer token validation
//! - `payment` - Razorpay orders and checkout signatures
//! - `media` - Cloudinary uploads
//! - `email` - Resend transactional email

pub mod auth;
pub mod email;
pub mod http;
pub mod media;
pub mod memory;
pub mod payment;
pub mod postgres;
