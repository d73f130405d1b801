//! Common utility functions

pub mod format;
pub mod validation;

pub use format::duration_label;
pub use validation::{is_valid_email, mask_email, normalize_email};
