pub mod controller;
pub mod snapshot;
pub mod teardown;

pub use controller::{
    dispatch, FieldValue, FormController, FormPhase, PendingSubmission, SubmitError,
};
pub use snapshot::{DisplayHints, FormSnapshot, ResultPanel, Severity};
pub use teardown::{Teardown, TeardownToken};
