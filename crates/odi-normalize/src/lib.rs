//! Row normalization for trial spreadsheets.
//!
//! [`normalize`] folds an ordered batch of [`Row`](odi_model::Row)s into a
//! [`TrialData`](odi_model::TrialData) tree:
//!
//! ```text
//! rows ──► test (by testid) ──► patient (by testid + nid) ──► encounters
//! ```
//!
//! Tests and patients are get-or-create: the first row that mentions a key
//! creates the entity, later rows reuse it unchanged. Encounters are appended
//! for every row with a non-empty ART start date. The first row that fails
//! field derivation aborts the whole batch.

pub mod derive;
pub mod error;
pub mod normalizer;

pub use derive::{parse_date, parse_sex};
pub use error::{DeriveError, NormalizeError, Result};
pub use normalizer::{normalize, normalize_iter};
