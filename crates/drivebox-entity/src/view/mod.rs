//! Logical view definitions for the projection layer.

pub mod context;

pub use context::ViewContext;
