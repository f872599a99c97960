use crate::core::assembler::FeatureAssembler;
use crate::core::resolver::ModelResolver;
use crate::domain::model::{FeatureRecord, Prediction, UserInputs};
use crate::utils::error::{PredictorError, Result};
use std::sync::Arc;

/// resolve -> assemble -> predict -> expm1
pub struct PricePipeline {
    resolver: Arc<ModelResolver>,
    assembler: FeatureAssembler,
}

impl PricePipeline {
    pub fn new(resolver: Arc<ModelResolver>) -> Self {
        Self {
            resolver,
            assembler: FeatureAssembler::new(),
        }
    }

    pub fn resolver(&self) -> &ModelResolver {
        &self.resolver
    }

    pub fn assemble(&self, inputs: &UserInputs) -> Result<FeatureRecord> {
        self.assembler.assemble(inputs)
    }

    pub async fn predict(&self, inputs: &UserInputs) -> Result<Prediction> {
        // 模型不可用時直接回報，不做任何推論
        let model = self.resolver.resolve().await?;
        let record = self.assembler.assemble(inputs)?;

        let log_price = model.predict(&record)?;
        let prediction = Prediction::from_log_price(log_price);
        if !prediction.log_price.is_finite() || !prediction.price.is_finite() {
            return Err(PredictorError::InferenceError {
                message: format!(
                    "model output {} does not map to a finite price",
                    prediction.log_price
                ),
            });
        }

        tracing::debug!(
            "Raw prediction {:.6} -> price {:.2}",
            prediction.log_price,
            prediction.price
        );
        Ok(prediction)
    }
}
