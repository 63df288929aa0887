mod writer;

pub use writer::{ResultWriter, default_output_name};

use crate::analysis::AnalysisResult;
use crate::metrics::{CacheMode, RunRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Document written at the end of a test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestReport {
    pub test_config: TestConfig,
    pub results: Vec<RunRecord>,
    pub analysis: AnalysisResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestConfig {
    pub url: String,
    pub cache_mode: CacheMode,
    pub runs: u32,
    pub timestamp: DateTime<Utc>,
}
