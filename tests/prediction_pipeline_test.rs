use async_trait::async_trait;
use httpmock::prelude::*;
use price_predictor::core::linear_model::{
    CategoricalTerm, LinearPriceModel, NumericTerm, FORMAT_VERSION,
};
use price_predictor::core::{FeatureRecord, FeatureValue, ModelHandle, ModelSource, Predictor};
use price_predictor::domain::model::format_currency;
use price_predictor::domain::schema;
use price_predictor::{
    BatchPredictor, LocalStorage, ModelResolver, PredictorError, PricePipeline, TomlConfig,
    UserInputs,
};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn price_model() -> LinearPriceModel {
    LinearPriceModel {
        format_version: FORMAT_VERSION,
        model_type: "linear_regression".to_string(),
        target_transform: "log1p".to_string(),
        intercept: 12.0,
        feature_names: schema::expected_columns().map(str::to_string).collect(),
        numeric: vec![NumericTerm {
            name: "Gr Liv Area".to_string(),
            mean: 1500.0,
            scale: 500.0,
            coefficient: 0.25,
        }],
        categorical: vec![CategoricalTerm {
            name: "Neighborhood".to_string(),
            coefficients: BTreeMap::from([("NAmes".to_string(), -0.05)]),
        }],
        metadata: None,
    }
}

fn write_model(path: &Path) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, price_model().to_json_pretty().unwrap()).unwrap();
}

fn config_in(dir: &Path, tracking_uri: &str) -> TomlConfig {
    let mut config = TomlConfig::default();
    config.model.file = dir.join("model.json").to_str().unwrap().to_string();
    config.model.run_id = "run-abc".to_string();
    config.model.local_artifact_root = dir.join("mlruns").to_str().unwrap().to_string();
    config.tracking.uri = tracking_uri.to_string();
    config.tracking.timeout_seconds = 2;
    config
}

fn sample_inputs() -> UserInputs {
    [
        ("Lot Area", 9600.0),
        ("Gr Liv Area", 1710.0),
        ("Overall Qual", 5.0),
        ("Year Built", 1961.0),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

/// Returns `value` only for the exact record the sample inputs assemble to.
struct ExactRecordModel {
    value: f64,
}

impl Predictor for ExactRecordModel {
    fn predict(&self, record: &FeatureRecord) -> price_predictor::Result<f64> {
        let expected = [
            ("Lot Area", FeatureValue::Int(9600)),
            ("Gr Liv Area", FeatureValue::Float(1710.0)),
            ("Overall Qual", FeatureValue::Int(5)),
            ("Year Built", FeatureValue::Int(1961)),
            ("Garage Yr Blt", FeatureValue::Int(1961)),
            ("Overall Cond", FeatureValue::Int(7)),
            ("Sale Condition", FeatureValue::Category("Normal".to_string())),
        ];
        let matches = record.len() == schema::SCHEMA.len()
            && expected
                .iter()
                .all(|(name, value)| record.get(name) == Some(value));

        if matches {
            Ok(self.value)
        } else {
            Err(PredictorError::InferenceError {
                message: "unexpected record".to_string(),
            })
        }
    }
}

struct ExactRecordSource(f64);

#[async_trait]
impl ModelSource for ExactRecordSource {
    fn describe(&self) -> String {
        "exact".to_string()
    }

    async fn load(&self) -> price_predictor::Result<ModelHandle> {
        Ok(Arc::new(ExactRecordModel { value: self.0 }))
    }
}

#[tokio::test]
async fn test_sample_house_returns_expm1_of_model_value() {
    let v = 12.1;
    let resolver = Arc::new(ModelResolver::new(vec![Box::new(ExactRecordSource(v))]));
    let pipeline = PricePipeline::new(resolver);

    let result = pipeline.predict(&sample_inputs()).await;
    tokio_test::assert_ok!(&result);
    let prediction = result.unwrap();

    assert_eq!(prediction.log_price, v);
    assert_eq!(prediction.formatted(), format_currency(v.exp_m1()));
    assert!(prediction.formatted().starts_with('$'));
}

#[tokio::test]
async fn test_end_to_end_with_local_model_file() {
    let temp_dir = TempDir::new().unwrap();
    write_model(&temp_dir.path().join("model.json"));

    // 追蹤伺服器不應被呼叫
    let server = MockServer::start();
    let tracking_mock = server.mock(|when, then| {
        when.method(GET).path("/get-artifact");
        then.status(500);
    });

    let config = config_in(temp_dir.path(), &server.base_url());
    let pipeline = PricePipeline::new(Arc::new(ModelResolver::from_config(&config).unwrap()));

    let prediction = pipeline.predict(&sample_inputs()).await.unwrap();

    assert!((prediction.log_price - 12.055).abs() < 1e-9);
    assert!((prediction.price.ln_1p() - prediction.log_price).abs() < 1e-9);
    tracking_mock.assert_hits(0);
}

#[tokio::test]
async fn test_falls_back_to_tracking_store() {
    let temp_dir = TempDir::new().unwrap();

    let server = MockServer::start();
    let artifact_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/get-artifact")
            .query_param("path", "model/model.json")
            .query_param("run_uuid", "run-abc");
        then.status(200)
            .header("Content-Type", "application/json")
            .body(price_model().to_json_pretty().unwrap());
    });

    let config = config_in(temp_dir.path(), &server.base_url());
    let pipeline = PricePipeline::new(Arc::new(ModelResolver::from_config(&config).unwrap()));

    let first = pipeline.predict(&sample_inputs()).await.unwrap();
    let second = pipeline.predict(&sample_inputs()).await.unwrap();

    assert_eq!(first, second);
    // 第二次使用快取，不再請求
    artifact_mock.assert_hits(1);
}

#[tokio::test]
async fn test_falls_back_to_local_run_artifacts() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_in(temp_dir.path(), "http://127.0.0.1:1");
    write_model(&config.local_artifact_dir().join("model.json"));

    let resolver = ModelResolver::from_config(&config).unwrap();
    let a = resolver.resolve().await.unwrap();
    let b = resolver.resolve().await.unwrap();

    assert!(Arc::ptr_eq(&a, &b));
}

#[tokio::test]
async fn test_all_sources_absent_is_model_unavailable() {
    let temp_dir = TempDir::new().unwrap();
    let config = config_in(temp_dir.path(), "http://127.0.0.1:1");
    let pipeline = PricePipeline::new(Arc::new(ModelResolver::from_config(&config).unwrap()));

    let result = pipeline.predict(&sample_inputs()).await;
    tokio_test::assert_err!(&result);
    let err = result.unwrap_err();

    match &err {
        PredictorError::ModelUnavailable { attempted } => assert_eq!(attempted.len(), 3),
        other => panic!("expected ModelUnavailable, got {:?}", other),
    }
    assert!(err.user_friendly_message().contains("model.json"));
}

#[tokio::test]
async fn test_corrupt_local_file_falls_through_unless_strict() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("model.json"), b"\x80\x04\x95pickle").unwrap();

    let mut config = config_in(temp_dir.path(), "http://127.0.0.1:1");
    write_model(&config.local_artifact_dir().join("model.json"));

    let lenient = ModelResolver::from_config(&config).unwrap();
    assert!(lenient.resolve().await.is_ok());

    config.model.strict_sources = true;
    let strict = ModelResolver::from_config(&config).unwrap();
    let err = strict.resolve().await.err().unwrap();
    assert!(matches!(err, PredictorError::ModelUnavailable { .. }));
}

#[tokio::test]
async fn test_batch_prediction_from_csv() {
    let temp_dir = TempDir::new().unwrap();
    write_model(&temp_dir.path().join("model.json"));
    let config = config_in(temp_dir.path(), "http://127.0.0.1:1");
    let pipeline = PricePipeline::new(Arc::new(ModelResolver::from_config(&config).unwrap()));

    std::fs::write(
        temp_dir.path().join("houses.csv"),
        "Id,Lot Area,Gr Liv Area,Overall Qual\n1,9600,1710,5\n2,12000,,7\n3,8000,2210,6\n",
    )
    .unwrap();

    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    let summary = BatchPredictor::new(&pipeline, storage)
        .run("houses.csv", "out/predictions.csv")
        .await
        .unwrap();
    assert_eq!(summary.rows, 3);

    let output = std::fs::read_to_string(temp_dir.path().join("out/predictions.csv")).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "Id,Lot Area,Gr Liv Area,Overall Qual,SalePrice");
    assert!(lines[2].starts_with("2,12000,,7,"));

    // 空白欄位使用預設值 1710，與第一列相同
    let price = |line: &str| line.rsplit(',').next().unwrap().to_string();
    assert_eq!(price(lines[1]), price(lines[2]));
    assert_eq!(price(lines[1]), format!("{:.2}", 12.055_f64.exp_m1()));
    assert_ne!(price(lines[1]), price(lines[3]));
}

#[tokio::test]
async fn test_batch_rejects_non_numeric_cell() {
    let temp_dir = TempDir::new().unwrap();
    write_model(&temp_dir.path().join("model.json"));
    let config = config_in(temp_dir.path(), "http://127.0.0.1:1");
    let pipeline = PricePipeline::new(Arc::new(ModelResolver::from_config(&config).unwrap()));

    std::fs::write(
        temp_dir.path().join("houses.csv"),
        "Lot Area,Overall Qual\nbig,5\n",
    )
    .unwrap();

    let storage = LocalStorage::new(temp_dir.path().to_str().unwrap().to_string());
    let err = BatchPredictor::new(&pipeline, storage)
        .run("houses.csv", "predictions.csv")
        .await
        .unwrap_err();

    assert!(matches!(err, PredictorError::ValidationError { .. }));
    assert!(err.to_string().contains("line 2"));
}
