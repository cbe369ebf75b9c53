//! Create/edit form session.
//!
//! The form is either closed or open in one of two modes. Submitting
//! branches on the mode: create forces a pending status, edit writes only
//! the fields the form carries. A failed submit leaves the form open with
//! everything the user typed.

mod draft;
mod session;

pub use draft::TaskDraft;
pub use session::{FormError, FormMode, FormSession, OpenForm, SubmitOutcome};

#[cfg(test)]
mod tests;
