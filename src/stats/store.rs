//! 统计信息存储
//!
//! 按数据集保存已加载的直方图，提供线程安全的只读查找。
//! 每次查找只在读取期间持有读锁，守卫在所有返回路径上自动释放。

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use log::{debug, info};
use parking_lot::RwLock;

use super::info::{DatasetInfo, SourceType};
use crate::core::codec::CodecResult;
use crate::histogram::{decode, Histogram};

/// 单个数据集的统计信息
#[derive(Debug, Clone)]
struct DatasetEntry {
    info: DatasetInfo,
    /// URI 主语直方图
    uri_subjects: Option<Arc<Histogram>>,
    /// 空白节点主语直方图
    blank_subjects: Option<Arc<Histogram>>,
    /// 属性 -> 值域类型 -> 直方图
    properties: BTreeMap<String, BTreeMap<String, Arc<Histogram>>>,
}

impl DatasetEntry {
    fn new(info: DatasetInfo) -> Self {
        Self {
            info,
            uri_subjects: None,
            blank_subjects: None,
            properties: BTreeMap::new(),
        }
    }

    fn histogram_count(&self) -> usize {
        self.uri_subjects.is_some() as usize
            + self.blank_subjects.is_some() as usize
            + self.properties.values().map(BTreeMap::len).sum::<usize>()
    }
}

/// 统计信息存储
///
/// 加载完成后只读，可被多个估算器并发读取
#[derive(Debug)]
pub struct StatisticsStore {
    datasets: Arc<RwLock<HashMap<String, DatasetEntry>>>,
}

impl StatisticsStore {
    pub fn new() -> Self {
        Self {
            datasets: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// 注册数据集元数据，已存在时只替换元数据
    pub fn register_dataset(&self, info: DatasetInfo) {
        let mut datasets = self.datasets.write();
        match datasets.get_mut(&info.source_url) {
            Some(entry) => entry.info = info,
            None => {
                debug!("注册数据集: {}", info.source_url);
                datasets.insert(info.source_url.clone(), DatasetEntry::new(info));
            }
        }
    }

    /// 保存主语直方图
    ///
    /// 数据集未注册时按 RDF 文档来源自动注册
    pub fn put_subject_histogram(&self, dataset: &str, anonymous: bool, histogram: Histogram) {
        let mut datasets = self.datasets.write();
        let entry = Self::entry_mut(&mut datasets, dataset);
        let slot = if anonymous {
            &mut entry.blank_subjects
        } else {
            &mut entry.uri_subjects
        };
        *slot = Some(Arc::new(histogram));
    }

    /// 保存属性直方图，值域类型取自直方图本身
    pub fn put_property_histogram(&self, dataset: &str, property: &str, histogram: Histogram) {
        let mut datasets = self.datasets.write();
        let entry = Self::entry_mut(&mut datasets, dataset);
        entry
            .properties
            .entry(property.to_string())
            .or_default()
            .insert(histogram.type_uri().to_string(), Arc::new(histogram));
    }

    /// 从二进制数据加载主语直方图
    pub fn load_subject_histogram(
        &self,
        dataset: &str,
        anonymous: bool,
        data: &[u8],
        pref_hint: usize,
    ) -> CodecResult<()> {
        let histogram = decode(data, pref_hint)?;
        info!(
            "加载主语直方图: dataset={}, anonymous={}, total={}",
            dataset,
            anonymous,
            histogram.total_count()
        );
        self.put_subject_histogram(dataset, anonymous, histogram);
        Ok(())
    }

    /// 从二进制数据加载属性直方图
    pub fn load_property_histogram(
        &self,
        dataset: &str,
        property: &str,
        data: &[u8],
        pref_hint: usize,
    ) -> CodecResult<()> {
        let histogram = decode(data, pref_hint)?;
        info!(
            "加载属性直方图: dataset={}, property={}, range={}",
            dataset,
            property,
            histogram.type_uri()
        );
        self.put_property_histogram(dataset, property, histogram);
        Ok(())
    }

    /// URI 主语（`anonymous = false`）或空白节点主语直方图
    pub fn subject_histogram(&self, dataset: &str, anonymous: bool) -> Option<Arc<Histogram>> {
        let datasets = self.datasets.read();
        let entry = datasets.get(dataset)?;
        if anonymous {
            entry.blank_subjects.clone()
        } else {
            entry.uri_subjects.clone()
        }
    }

    pub fn property_histogram(
        &self,
        dataset: &str,
        property: &str,
        range: &str,
    ) -> Option<Arc<Histogram>> {
        self.datasets
            .read()
            .get(dataset)?
            .properties
            .get(property)?
            .get(range)
            .cloned()
    }

    /// 属性出现过的全部值域类型
    pub fn property_ranges(&self, dataset: &str, property: &str) -> Vec<String> {
        self.datasets
            .read()
            .get(dataset)
            .and_then(|entry| entry.properties.get(property))
            .map(|ranges| ranges.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// 数据集中有直方图的属性，可按值域类型过滤
    pub fn properties(&self, dataset: &str, range: Option<&str>) -> BTreeSet<String> {
        let datasets = self.datasets.read();
        let entry = match datasets.get(dataset) {
            Some(entry) => entry,
            None => return BTreeSet::new(),
        };
        entry
            .properties
            .iter()
            .filter(|(_, ranges)| range.map_or(true, |r| ranges.contains_key(r)))
            .map(|(p, _)| p.clone())
            .collect()
    }

    pub fn dataset_info(&self, dataset: &str) -> Option<DatasetInfo> {
        self.datasets.read().get(dataset).map(|e| e.info.clone())
    }

    pub fn contains_dataset(&self, dataset: &str) -> bool {
        self.datasets.read().contains_key(dataset)
    }

    pub fn datasets(&self) -> Vec<String> {
        let mut names: Vec<String> = self.datasets.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// 数据集中的直方图数量（含主语直方图）
    pub fn histogram_count(&self, dataset: &str) -> usize {
        self.datasets
            .read()
            .get(dataset)
            .map(DatasetEntry::histogram_count)
            .unwrap_or(0)
    }

    pub fn remove_dataset(&self, dataset: &str) -> bool {
        self.datasets.write().remove(dataset).is_some()
    }

    pub fn clear_all(&self) {
        self.datasets.write().clear();
    }

    fn entry_mut<'a>(
        datasets: &'a mut HashMap<String, DatasetEntry>,
        dataset: &str,
    ) -> &'a mut DatasetEntry {
        datasets.entry(dataset.to_string()).or_insert_with(|| {
            DatasetEntry::new(DatasetInfo::new(dataset, SourceType::RdfDocument))
        })
    }
}

impl Default for StatisticsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for StatisticsStore {
    fn clone(&self) -> Self {
        Self {
            datasets: Arc::new(RwLock::new(self.datasets.read().clone())),
        }
    }
}
