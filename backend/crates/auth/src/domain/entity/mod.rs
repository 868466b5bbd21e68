//! Entity Module

pub mod account;
pub mod claims;
pub mod session_data;
