//! Reckon semantic versions from the tags and history of a git repository.
//!
//! A reckoning combines a [strategy::NormalStrategy] with a
//! [strategy::PreReleaseStrategy] over an immutable [domain::VcsInventory],
//! and never hands out a version that another commit already carries.

pub mod based_on;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod lazy;
pub mod reckoner;
pub mod strategy;
pub mod ui;

pub use error::{ReckonError, Result};
pub use reckoner::{reckon, reckon_from};
