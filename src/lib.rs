pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, HouseInputs};

pub use adapters::{LocalFileSource, LocalStorage};
pub use config::TomlConfig;
pub use domain::model::{Prediction, UserInputs};
pub use crate::core::{
    assembler::FeatureAssembler, batch::BatchPredictor, export::ModelExporter,
    linear_model::LinearPriceModel, pipeline::PricePipeline, resolver::ModelResolver,
};
pub use utils::error::{PredictorError, Result};
