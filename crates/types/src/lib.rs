//! Identity types shared by the UniCred admin registry crates.

pub mod address;

pub use address::*;
