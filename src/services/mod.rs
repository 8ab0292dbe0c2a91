pub mod prediction;
pub mod server;
pub mod validation;

pub use prediction::PredictionService;
pub use server::ServerService;
pub use validation::{load_draft, ValidationService};
