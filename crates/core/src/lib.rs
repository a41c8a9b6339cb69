//! Core library for doctors
//!
//! This crate implements the **Functional Core** of the doctors search tool, following the
//! Functional Core - Imperative Shell architectural pattern.
//!
//! - **`doctors_core`** (this crate): pure transformations with zero I/O
//! - **`doctors`**: HTTP fetch, terminal rendering and orchestration (the Imperative Shell)
//!
//! # Module Organization
//!
//! - [`record`]: Canonical doctor records and normalization of the raw endpoint payload
//! - [`filters`]: Filter state and the filter/sort pipeline
//! - [`suggest`]: Autocomplete suggestions for the name search
//! - [`url_state`]: Query string codec for the filter state
//! - [`session`]: State-holder tying the pieces together behind a location port
//!
//! # Example Usage
//!
//! ```rust
//! use doctors_core::filters::{apply, FilterState, SortKey};
//! use doctors_core::record::parse_payload;
//! use doctors_core::url_state::{decode, encode};
//!
//! let doctors = parse_payload(
//!     r#"[{"name": "Dr. A", "fees": "₹ 200"}, {"name": "Dr. B", "fees": "₹ 100"}]"#,
//! )
//! .unwrap();
//!
//! let state = FilterState {
//!     sort: SortKey::Fee,
//!     ..Default::default()
//! };
//!
//! let sorted = apply(&doctors, &state);
//! assert_eq!(sorted[0].name, "Dr. B");
//! assert_eq!(decode(&encode(&state)), state);
//! ```

pub mod filters;
pub mod record;
pub mod session;
pub mod suggest;
pub mod url_state;
