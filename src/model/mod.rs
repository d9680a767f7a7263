pub mod classifier;
pub mod encoder;
pub mod trained;

pub use classifier::LogisticRegression;
pub use encoder::{SparseVector, TfIdfEncoder};
pub use trained::{IntentPredictor, TrainedModel};
