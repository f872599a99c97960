use crate::config::toml_config::{TomlConfig, DEFAULT_CONFIG_FILE};
use crate::domain::model::UserInputs;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Args, Parser};

/// House details collected from the user. Defaults are the form's
/// "typical house".
#[derive(Debug, Clone, PartialEq, Args)]
pub struct HouseInputs {
    #[arg(long, default_value_t = 9600, help = "Lot Area (sq ft)")]
    pub lot_area: i64,
    #[arg(long, default_value_t = 1710.0, help = "Above Grade Living Area (sq ft)")]
    pub gr_liv_area: f64,
    #[arg(long, default_value_t = 5, help = "Overall Quality (1-10)")]
    pub overall_qual: i64,
    #[arg(long, default_value_t = 7, help = "Overall Condition (1-10)")]
    pub overall_cond: i64,
    #[arg(long, default_value_t = 1961)]
    pub year_built: i64,
    #[arg(long, default_value_t = 850.0, help = "Total Basement Area (sq ft)")]
    pub total_bsmt_sf: f64,
    #[arg(long = "first-flr-sf", default_value_t = 856, help = "1st Floor Area (sq ft)")]
    pub first_flr_sf: i64,
    #[arg(long = "second-flr-sf", default_value_t = 854, help = "2nd Floor Area (sq ft)")]
    pub second_flr_sf: i64,
    #[arg(long, default_value_t = 1)]
    pub full_bath: i64,
    #[arg(long, default_value_t = 0)]
    pub half_bath: i64,
    #[arg(long, default_value_t = 3, help = "Bedrooms Above Grade")]
    pub bedrooms: i64,
    #[arg(long, default_value_t = 7, help = "Total Rooms Above Grade")]
    pub tot_rms_abv_grd: i64,
    #[arg(long, default_value_t = 2)]
    pub fireplaces: i64,
    #[arg(long, default_value_t = 2)]
    pub garage_cars: i64,
    #[arg(long, default_value_t = 500.0, help = "Garage Area (sq ft)")]
    pub garage_area: f64,
    #[arg(long, default_value_t = 1961, help = "Year Remodeled")]
    pub year_remod: i64,
    #[arg(long, default_value_t = 80.0, help = "Lot Frontage (ft)")]
    pub lot_frontage: f64,
    #[arg(long, default_value_t = 0.0, help = "Masonry Veneer Area (sq ft)")]
    pub mas_vnr_area: f64,
    #[arg(long = "bsmtfin-sf-1", default_value_t = 700.0)]
    pub bsmtfin_sf_1: f64,
    #[arg(long = "bsmtfin-sf-2", default_value_t = 0.0)]
    pub bsmtfin_sf_2: f64,
    #[arg(long, default_value_t = 150.0, help = "Basement Unfinished Area (sq ft)")]
    pub bsmt_unf_sf: f64,
    #[arg(long, default_value_t = 210.0)]
    pub wood_deck_sf: f64,
    #[arg(long, default_value_t = 0.0)]
    pub open_porch_sf: f64,
    #[arg(long, default_value_t = 5, help = "Month Sold (1-12)")]
    pub mo_sold: i64,
    #[arg(long, default_value_t = 2010)]
    pub yr_sold: i64,
}

impl Default for HouseInputs {
    fn default() -> Self {
        Self {
            lot_area: 9600,
            gr_liv_area: 1710.0,
            overall_qual: 5,
            overall_cond: 7,
            year_built: 1961,
            total_bsmt_sf: 850.0,
            first_flr_sf: 856,
            second_flr_sf: 854,
            full_bath: 1,
            half_bath: 0,
            bedrooms: 3,
            tot_rms_abv_grd: 7,
            fireplaces: 2,
            garage_cars: 2,
            garage_area: 500.0,
            year_remod: 1961,
            lot_frontage: 80.0,
            mas_vnr_area: 0.0,
            bsmtfin_sf_1: 700.0,
            bsmtfin_sf_2: 0.0,
            bsmt_unf_sf: 150.0,
            wood_deck_sf: 210.0,
            open_porch_sf: 0.0,
            mo_sold: 5,
            yr_sold: 2010,
        }
    }
}

impl HouseInputs {
    pub fn to_user_inputs(&self) -> UserInputs {
        let fields: [(&str, f64); 25] = [
            ("Lot Frontage", self.lot_frontage),
            ("Lot Area", self.lot_area as f64),
            ("Overall Qual", self.overall_qual as f64),
            ("Overall Cond", self.overall_cond as f64),
            ("Year Built", self.year_built as f64),
            ("Year Remod/Add", self.year_remod as f64),
            ("Mas Vnr Area", self.mas_vnr_area),
            ("BsmtFin SF 1", self.bsmtfin_sf_1),
            ("BsmtFin SF 2", self.bsmtfin_sf_2),
            ("Bsmt Unf SF", self.bsmt_unf_sf),
            ("Total Bsmt SF", self.total_bsmt_sf),
            ("1st Flr SF", self.first_flr_sf as f64),
            ("2nd Flr SF", self.second_flr_sf as f64),
            ("Gr Liv Area", self.gr_liv_area),
            ("Full Bath", self.full_bath as f64),
            ("Half Bath", self.half_bath as f64),
            ("Bedroom AbvGr", self.bedrooms as f64),
            ("TotRms AbvGrd", self.tot_rms_abv_grd as f64),
            ("Fireplaces", self.fireplaces as f64),
            ("Garage Cars", self.garage_cars as f64),
            ("Garage Area", self.garage_area),
            ("Wood Deck SF", self.wood_deck_sf),
            ("Open Porch SF", self.open_porch_sf),
            ("Mo Sold", self.mo_sold as f64),
            ("Yr Sold", self.yr_sold as f64),
        ];

        fields
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect()
    }
}

impl Validate for HouseInputs {
    fn validate(&self) -> Result<()> {
        validation::validate_user_inputs(&self.to_user_inputs())
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "predict")]
#[command(about = "Predict a house sale price with the deployed regression model")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: String,

    /// Override model.file
    #[arg(long)]
    pub model_file: Option<String>,

    /// Override model.run_id
    #[arg(long)]
    pub run_id: Option<String>,

    /// Override tracking.uri
    #[arg(long)]
    pub tracking_uri: Option<String>,

    /// Stop at a model source that exists but cannot be loaded
    #[arg(long)]
    pub strict_sources: bool,

    /// Predict every row of a CSV file instead of a single house
    #[arg(long)]
    pub batch: Option<String>,

    /// Output file for --batch
    #[arg(long, default_value = "predictions.csv")]
    pub output: String,

    /// Print the assembled feature record as JSON
    #[arg(long)]
    pub show_record: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,

    #[command(flatten)]
    pub house: HouseInputs,
}

impl CliConfig {
    /// 命令列參數覆蓋 TOML 設定
    pub fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(file) = &self.model_file {
            config.model.file = file.clone();
        }
        if let Some(run_id) = &self.run_id {
            config.model.run_id = run_id.clone();
        }
        if let Some(uri) = &self.tracking_uri {
            config.tracking.uri = uri.clone();
        }
        if self.strict_sources {
            config.model.strict_sources = true;
        }
        if self.verbose {
            config.logging.verbose = true;
        }
        if self.json_logs {
            config.logging.json = true;
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(batch) = &self.batch {
            validation::validate_file_extensions("batch", std::slice::from_ref(batch), &["csv"])?;
            validation::validate_path("output", &self.output)?;
            return Ok(());
        }
        self.house.validate()
    }
}
