//! API Routes
//!
//! Route handlers organized by page and functionality.

pub mod analytics;
pub mod health;
pub mod sign_up;
