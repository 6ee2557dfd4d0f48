//! User account handlers.

mod resolve_user;

pub use resolve_user::ResolveUserHandler;
