pub mod assembler;
pub mod batch;
pub mod export;
pub mod linear_model;
pub mod pipeline;
pub mod resolver;

pub use crate::domain::model::{FeatureRecord, FeatureValue, Prediction, UserInputs};
pub use crate::domain::ports::{ModelHandle, ModelSource, Predictor, Storage, TrackingStore};
pub use crate::utils::error::Result;
