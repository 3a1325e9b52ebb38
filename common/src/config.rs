use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    pub models: HashMap<String, ModelConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub model_type: String,
    /// Path to the serialized classifier (ONNX export of the trained
    /// model).
    pub artifact: String,
    pub input_name: String,
    pub output_name: String,
    pub num_features: usize,
    /// Categorical code table generation the artifact was trained with.
    pub encoding_version: u32,
}

impl ModelsConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: ModelsConfig = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn get_model(&self, name: &str) -> Option<&ModelConfig> {
        self.models.get(name)
    }
}
