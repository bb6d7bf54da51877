//! Client-side selections of [`Property`]s: favorites and comparison.
//!
//! Both managers persist their state into a [`Storage`] on every mutation and
//! then notify their subscribers, so every clone of a manager observes the
//! same state.
//!
//! [`Property`]: service::domain::Property

#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod compare;
pub mod favorites;
pub mod storage;
mod store;

pub use self::{
    compare::{Compare, Outcome},
    favorites::Favorites,
    storage::{FileStorage, MemoryStorage, Storage, StorageError},
};
