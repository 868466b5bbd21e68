//! Value Object Module

pub mod email;
pub mod token;
pub mod uid;
