//! 三元组数据源
//!
//! 统计构建阶段从外部三元组存储读取原始数据。存储自身的读锁由实现方负责：
//! `scan` 在整个扫描期间持有读锁，返回（包括出错返回）时释放。

use std::collections::HashMap;

use parking_lot::RwLock;

use super::info::DatasetInfo;
use crate::core::error::{StatsError, StatsResult};
use crate::core::term::Triple;

/// 三元组访问回调
pub type TripleVisitor<'a> = dyn FnMut(&Triple) -> StatsResult<()> + 'a;

/// 外部三元组存储
pub trait TripleSource: Send + Sync {
    /// 数据集元数据
    fn dataset_info(&self, dataset: &str) -> StatsResult<DatasetInfo>;

    /// 按顺序访问数据集中的全部三元组，回调出错时立即停止
    fn scan(&self, dataset: &str, visitor: &mut TripleVisitor<'_>) -> StatsResult<()>;
}

#[derive(Debug)]
struct MemoryDataset {
    info: DatasetInfo,
    triples: Vec<Triple>,
}

/// 内存三元组存储
#[derive(Debug, Default)]
pub struct MemoryTripleSource {
    datasets: RwLock<HashMap<String, MemoryDataset>>,
}

impl MemoryTripleSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dataset(&self, info: DatasetInfo) {
        self.datasets
            .write()
            .entry(info.source_url.clone())
            .or_insert_with(|| MemoryDataset {
                info,
                triples: Vec::new(),
            });
    }

    pub fn insert(&self, dataset: &str, triple: Triple) -> StatsResult<()> {
        let mut datasets = self.datasets.write();
        let entry = datasets
            .get_mut(dataset)
            .ok_or_else(|| StatsError::Source(format!("未知的数据集: {}", dataset)))?;
        entry.triples.push(triple);
        Ok(())
    }

    pub fn extend(&self, dataset: &str, triples: impl IntoIterator<Item = Triple>) -> StatsResult<()> {
        let mut datasets = self.datasets.write();
        let entry = datasets
            .get_mut(dataset)
            .ok_or_else(|| StatsError::Source(format!("未知的数据集: {}", dataset)))?;
        entry.triples.extend(triples);
        Ok(())
    }

    pub fn len(&self, dataset: &str) -> usize {
        self.datasets
            .read()
            .get(dataset)
            .map(|d| d.triples.len())
            .unwrap_or(0)
    }

    pub fn datasets(&self) -> Vec<String> {
        let mut names: Vec<String> = self.datasets.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl TripleSource for MemoryTripleSource {
    fn dataset_info(&self, dataset: &str) -> StatsResult<DatasetInfo> {
        self.datasets
            .read()
            .get(dataset)
            .map(|d| d.info.clone())
            .ok_or_else(|| StatsError::Source(format!("未知的数据集: {}", dataset)))
    }

    fn scan(&self, dataset: &str, visitor: &mut TripleVisitor<'_>) -> StatsResult<()> {
        let datasets = self.datasets.read();
        let entry = datasets
            .get(dataset)
            .ok_or_else(|| StatsError::Source(format!("未知的数据集: {}", dataset)))?;
        for triple in &entry.triples {
            visitor(triple)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::term::Term;
    use crate::stats::info::SourceType;

    const DS: &str = "http://example.org/data.rdf";

    fn source() -> MemoryTripleSource {
        let source = MemoryTripleSource::new();
        source.add_dataset(DatasetInfo::new(DS, SourceType::RdfDocument));
        source
            .extend(
                DS,
                (0..3).map(|i| {
                    Triple::new(
                        Term::uri(format!("http://example.org/s{}", i)),
                        Term::uri("http://example.org/p"),
                        Term::integer(i),
                    )
                }),
            )
            .unwrap();
        source
    }

    #[test]
    fn test_scan_visits_all() {
        let source = source();
        let mut seen = 0;
        source
            .scan(DS, &mut |_t: &Triple| {
                seen += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(seen, 3);
        assert_eq!(source.len(DS), 3);
    }

    #[test]
    fn test_scan_stops_on_error_and_releases_lock() {
        let source = source();
        let mut seen = 0;
        let result = source.scan(DS, &mut |_t: &Triple| {
            seen += 1;
            Err(StatsError::Source("stop".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(seen, 1);

        // 读锁已释放，可以继续写入
        source
            .insert(DS, Triple::new(Term::blank("b"), Term::uri("http://example.org/p"), Term::integer(9)))
            .unwrap();
        assert_eq!(source.len(DS), 4);
    }

    #[test]
    fn test_unknown_dataset() {
        let source = MemoryTripleSource::new();
        assert!(matches!(source.dataset_info(DS), Err(StatsError::Source(_))));
        assert!(source.scan(DS, &mut |_t: &Triple| Ok(())).is_err());
    }
}
