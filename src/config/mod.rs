use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{StatsError, StatsResult};
use crate::query::estimator::EstimatorConfig;

/// 直方图构建配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct HistogramConfig {
    /// 期望桶数，解码时也作为数组预分配的提示
    pub preferred_size: usize,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self { preferred_size: 64 }
    }
}

/// 日志配置
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            file: "graphstats".to_string(),
            max_file_size: 100 * 1024 * 1024, // 100MB
            max_files: 5,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub histogram: HistogramConfig,
    pub estimator: EstimatorConfig,
    pub log: LogConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> StatsResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> StatsResult<()> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> StatsResult<()> {
        if self.histogram.preferred_size == 0 {
            return Err(StatsError::Config("histogram.preferred_size 必须大于 0".to_string()));
        }
        let e = &self.estimator;
        for (name, value) in [
            ("join_selectivity", e.join_selectivity),
            ("filter_selectivity", e.filter_selectivity),
            ("optional_selectivity", e.optional_selectivity),
            ("duplicate_ratio", e.duplicate_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(StatsError::Config(format!(
                    "estimator.{} 必须在 [0, 1] 范围内: {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
