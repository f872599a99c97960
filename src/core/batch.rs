use crate::core::pipeline::PricePipeline;
use crate::domain::model::UserInputs;
use crate::domain::ports::Storage;
use crate::domain::schema;
use crate::utils::error::{PredictorError, Result};
use crate::utils::validation::validate_user_inputs;

pub const PRICE_COLUMN: &str = "SalePrice";

#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub rows: usize,
    pub output_path: String,
}

/// CSV in, CSV out. Headers are schema field names; empty cells fall back to
/// the field default, and columns the model does not take are carried
/// through untouched.
pub struct BatchPredictor<'a, S: Storage> {
    pipeline: &'a PricePipeline,
    storage: S,
}

impl<'a, S: Storage> BatchPredictor<'a, S> {
    pub fn new(pipeline: &'a PricePipeline, storage: S) -> Self {
        Self { pipeline, storage }
    }

    pub async fn run(&self, input_path: &str, output_path: &str) -> Result<BatchSummary> {
        let data = self.storage.read_file(input_path).await?;
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(data.as_slice());

        let headers = reader.headers()?.clone();
        let input_columns: Vec<bool> = headers
            .iter()
            .map(|h| schema::field(h).is_some_and(|f| f.is_user_field()))
            .collect();

        let ignored: Vec<&str> = headers
            .iter()
            .zip(&input_columns)
            .filter(|(h, used)| !**used && *h != PRICE_COLUMN)
            .map(|(h, _)| h)
            .collect();
        if !ignored.is_empty() {
            tracing::warn!("Columns not used by the model: {}", ignored.join(", "));
        }

        let mut writer = csv::Writer::from_writer(Vec::new());
        let mut out_headers: Vec<&str> = headers.iter().filter(|h| *h != PRICE_COLUMN).collect();
        out_headers.push(PRICE_COLUMN);
        writer.write_record(&out_headers)?;

        let mut rows = 0;
        for (index, row) in reader.records().enumerate() {
            let row = row?;
            // 第 1 列是標題
            let line = index + 2;

            let mut inputs = UserInputs::new();
            for ((header, cell), used) in headers.iter().zip(row.iter()).zip(&input_columns) {
                if !*used || cell.is_empty() {
                    continue;
                }
                let value: f64 = cell.parse().map_err(|_| PredictorError::ValidationError {
                    message: format!(
                        "line {}, column '{}': '{}' is not a number",
                        line, header, cell
                    ),
                })?;
                inputs.insert(header.to_string(), value);
            }

            validate_user_inputs(&inputs).map_err(|e| PredictorError::ValidationError {
                message: format!("line {}: {}", line, e),
            })?;

            let prediction = self.pipeline.predict(&inputs).await?;

            let mut out_row: Vec<String> = headers
                .iter()
                .zip(row.iter())
                .filter(|(h, _)| *h != PRICE_COLUMN)
                .map(|(_, cell)| cell.to_string())
                .collect();
            out_row.push(format!("{:.2}", prediction.price));
            writer.write_record(&out_row)?;
            rows += 1;
        }

        let output = writer
            .into_inner()
            .map_err(|e| PredictorError::IoError(e.into_error()))?;
        self.storage.write_file(output_path, &output).await?;

        tracing::info!("📁 Wrote {} predictions to {}", rows, output_path);
        Ok(BatchSummary {
            rows,
            output_path: output_path.to_string(),
        })
    }
}
