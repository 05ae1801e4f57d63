//! Core of the kiosk backend.
//!
//! This crate turns a navigation template, the document directories below
//! a files root and remote iCal feeds into the JSON the kiosk front end
//! renders:
//! - `template` loads `template.json` into resolved entries
//! - `scan` lists documents and applies per-file overrides
//! - `calendar` fetches, filters and normalizes feeds
//! - `navigation` composes everything in template order

pub mod calendar;
pub mod config;
pub mod date;
pub mod error;
pub mod navigation;
pub mod scan;
pub mod template;

pub use config::{ConfigOverrides, KioskConfig};
pub use error::{KioskError, KioskResult};
pub use navigation::{Navigation, NavigationEntry, Navigator};
