//! The model: weight storage, the update rule and the classifier.

pub mod classifier;
pub mod store;
pub mod update;

pub use classifier::classify;
pub use store::ModelStore;
pub use update::advance;
