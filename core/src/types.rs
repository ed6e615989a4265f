//! Shared primitive types used across the crate.

/// Position of a row in the table it was read from (0-based, header excluded).
pub type RowIndex = usize;

/// The opaque customer key carried by every upload.
pub type CustomerId = String;

/// The probability of the positive (default) class, in [0, 1].
pub type Probability = f64;
