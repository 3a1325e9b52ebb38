pub mod config;
pub mod encoding;
pub mod http;
pub mod outcome;
pub mod patient;

pub use config::{ModelConfig, ModelsConfig};
pub use encoding::{encode, ENCODING_VERSION, FEATURE_COUNT, FEATURE_NAMES};
pub use http::{HealthResponse, InfoResponse, PredictResponse};
pub use outcome::Outcome;
pub use patient::PatientReport;
