//! Column names expected in a normalized spreadsheet row.
//!
//! Headers are normalized on ingest (lowercase ASCII alphanumerics only), so
//! a sheet header such as `ART Start Date (Visit)` arrives as
//! [`ART_START_DATE_VISIT`].

/// Trial/test identifier. Groups rows into tests.
pub const TEST_ID: &str = "testid";

/// Patient identifier, unique within one test.
pub const NID: &str = "nid";

/// Raw sex code (`M`/`F`).
pub const GENDER: &str = "gender";

/// Patient date of birth.
pub const DATE_OF_BIRTH: &str = "dateofbirth";

/// Optional ART start date; a non-empty value creates an encounter.
pub const ART_START_DATE_VISIT: &str = "artstartdatevisit";
