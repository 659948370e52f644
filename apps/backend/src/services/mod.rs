//! Service layer between the routes and the core engine

pub mod review;
pub mod session;
