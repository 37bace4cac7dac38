//! Session-wide primitives

pub mod time;
