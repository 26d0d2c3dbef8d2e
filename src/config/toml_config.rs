use crate::core::{ConfigProvider, MasterSchema};
use crate::utils::error::{Result, ShipError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub master_data: MasterDataConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterDataConfig {
    pub products_path: String,
    pub pallets_path: String,
    #[serde(default)]
    pub product_columns: ProductColumns,
    #[serde(default)]
    pub pallet_columns: PalletColumns,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductColumns {
    pub identifier: String,
    pub unit_weight: String,
    pub pack_size: Option<String>,
}

impl Default for ProductColumns {
    fn default() -> Self {
        let schema = MasterSchema::default();
        Self {
            identifier: schema.product_identifier,
            unit_weight: schema.product_unit_weight,
            pack_size: schema.product_pack_size,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PalletColumns {
    pub identifier: String,
    pub weight: String,
}

impl Default for PalletColumns {
    fn default() -> Self {
        let schema = MasterSchema::default();
        Self {
            identifier: schema.pallet_identifier,
            weight: schema.pallet_weight,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub delimiter: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            delimiter: ",".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub output_path: String,
    pub formats: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
            formats: vec!["csv".to_string(), "json".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl TomlConfig {
    /// Loads the configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ShipError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ShipError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` placeholders (e.g. `${MASTER_DIR}`) with environment values.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| ShipError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("master_data.products_path", &self.master_data.products_path)?;
        validation::validate_path("master_data.pallets_path", &self.master_data.pallets_path)?;
        validation::validate_path("output.output_path", &self.output.output_path)?;
        validation::validate_delimiter("input.delimiter", &self.input.delimiter)?;

        let columns = [
            ("master_data.product_columns.identifier", &self.master_data.product_columns.identifier),
            ("master_data.product_columns.unit_weight", &self.master_data.product_columns.unit_weight),
            ("master_data.pallet_columns.identifier", &self.master_data.pallet_columns.identifier),
            ("master_data.pallet_columns.weight", &self.master_data.pallet_columns.weight),
        ];
        for (field, column) in columns {
            validation::validate_non_empty_string(field, column)?;
        }

        let valid_formats = ["csv", "json"];
        for format in &self.output.formats {
            if !valid_formats.contains(&format.as_str()) {
                return Err(ShipError::InvalidConfigValueError {
                    field: "output.formats".to_string(),
                    value: format.clone(),
                    reason: format!(
                        "Unsupported format. Valid formats: {}",
                        valid_formats.join(", ")
                    ),
                });
            }
        }

        Ok(())
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn json_logging(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn products_path(&self) -> &str {
        &self.master_data.products_path
    }

    fn pallets_path(&self) -> &str {
        &self.master_data.pallets_path
    }

    fn schema(&self) -> MasterSchema {
        MasterSchema {
            product_identifier: self.master_data.product_columns.identifier.trim().to_string(),
            product_unit_weight: self.master_data.product_columns.unit_weight.trim().to_string(),
            product_pack_size: self
                .master_data
                .product_columns
                .pack_size
                .as_ref()
                .map(|c| c.trim().to_string()),
            pallet_identifier: self.master_data.pallet_columns.identifier.trim().to_string(),
            pallet_weight: self.master_data.pallet_columns.weight.trim().to_string(),
        }
    }

    fn delimiter(&self) -> u8 {
        self.input.delimiter.as_bytes().first().copied().unwrap_or(b',')
    }

    fn output_path(&self) -> &str {
        &self.output.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let toml_content = r#"
[master_data]
products_path = "master/products.csv"
pallets_path = "master/pallets.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.products_path(), "master/products.csv");
        assert_eq!(config.schema(), MasterSchema::default());
        assert_eq!(config.delimiter(), b',');
        assert_eq!(config.output_path(), "./output");
        assert_eq!(config.output_formats(), ["csv", "json"]);
        assert!(!config.json_logging());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[master_data]
products_path = "products.tsv"
pallets_path = "pallets.tsv"

[master_data.product_columns]
identifier = "code"
unit_weight = " weight_kg "

[master_data.pallet_columns]
identifier = "pallet"
weight = "kg"

[input]
delimiter = "\t"

[output]
output_path = "./reports"
formats = ["csv"]

[logging]
level = "debug"
json = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let schema = config.schema();

        assert_eq!(schema.product_identifier, "code");
        assert_eq!(schema.product_unit_weight, "weight_kg");
        assert_eq!(schema.product_pack_size.as_deref(), Some("入数"));
        assert_eq!(schema.pallet_weight, "kg");
        assert_eq!(config.delimiter(), b'\t');
        assert_eq!(config.log_level(), Some("debug"));
        assert!(config.json_logging());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SHIPWEIGHT_TEST_MASTER_DIR", "/srv/master");

        let toml_content = r#"
[master_data]
products_path = "${SHIPWEIGHT_TEST_MASTER_DIR}/products.csv"
pallets_path = "${SHIPWEIGHT_TEST_MASTER_DIR}/pallets.csv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.products_path(), "/srv/master/products.csv");

        std::env::remove_var("SHIPWEIGHT_TEST_MASTER_DIR");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[master_data]
products_path = "products.csv"
pallets_path = ""

[output]
formats = ["xlsx"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let mut config = config;
        config.master_data.pallets_path = "pallets.csv".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ShipError::InvalidConfigValueError { ref field, .. } if field == "output.formats"));
    }

    #[test]
    fn test_missing_master_section_is_error() {
        let err = TomlConfig::from_toml_str("[output]\nformats = [\"csv\"]\n").unwrap_err();
        assert!(matches!(err, ShipError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[master_data]
products_path = "p.csv"
pallets_path = "q.csv"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pallets_path(), "q.csv");
    }
}
