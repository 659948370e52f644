//! HTTP route handlers

pub mod practice;
pub mod review;
pub mod sessions;
