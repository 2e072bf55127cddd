//! Combat systems

pub mod damage;

#[cfg(test)]
mod damage_tests;

pub use damage::*;
