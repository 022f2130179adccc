//! Utility helpers shared between layers

pub mod email;
