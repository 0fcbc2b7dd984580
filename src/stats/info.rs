//! 数据集元数据

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::vocab;

/// 统计信息来源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceType {
    /// RDF 文档
    RdfDocument,
    /// SPARQL 端点
    SparqlEndpoint,
}

impl SourceType {
    pub fn uri(&self) -> &'static str {
        match self {
            SourceType::RdfDocument => vocab::STATS_RDF_DOCUMENT,
            SourceType::SparqlEndpoint => vocab::STATS_SPARQL_ENDPOINT,
        }
    }

    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            vocab::STATS_RDF_DOCUMENT => Some(SourceType::RdfDocument),
            vocab::STATS_SPARQL_ENDPOINT => Some(SourceType::SparqlEndpoint),
            _ => None,
        }
    }
}

/// 数据集元数据
///
/// 数据集以来源 URL 作为标识
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    pub source_url: String,
    pub source_type: SourceType,
    /// 统计信息的生成者
    pub creator: Option<String>,
    /// 统计信息的生成时间
    pub created: Option<DateTime<Utc>>,
}

impl DatasetInfo {
    pub fn new(source_url: impl Into<String>, source_type: SourceType) -> Self {
        Self {
            source_url: source_url.into(),
            source_type,
            creator: None,
            created: None,
        }
    }

    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }

    pub fn is_endpoint(&self) -> bool {
        self.source_type == SourceType::SparqlEndpoint
    }
}
