// src/standups/mod.rs

pub mod store;
pub mod types;

pub use store::StandupStore;
pub use types::{Standup, SubmitStandupRequest};
