//! # drivebox-entity
//!
//! Domain entity models for Drivebox: the flat [`entry::Entry`] record,
//! the typed [`entry::EntryFilter`] query predicate, and the
//! [`view::ViewContext`] value object consumed by the projection layer.

pub mod entry;
pub mod view;
