//! 统计信息收集器
//!
//! 一次性扫描数据集的全部三元组，为主语和每个 (属性, 值域类型) 生成直方图

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};
use rayon::prelude::*;

use super::info::DatasetInfo;
use super::source::TripleSource;
use super::store::StatisticsStore;
use crate::core::error::{StatsError, StatsResult};
use crate::core::term::{Term, Triple};
use crate::core::vocab;
use crate::histogram::{AnyHistogramBuilder, Histogram, HistogramBuilder, OrderedStringHistogramBuilder};

/// 单个数据集的统计结果
#[derive(Debug, Clone)]
pub struct DatasetHistograms {
    pub info: DatasetInfo,
    /// URI 主语直方图
    pub uri_subjects: Option<Histogram>,
    /// 空白节点主语直方图
    pub blank_subjects: Option<Histogram>,
    /// (属性, 直方图)，值域类型取自直方图
    pub properties: Vec<(String, Histogram)>,
    /// 扫描的三元组数
    pub triples: u64,
    /// 无法解析而跳过的宾语数
    pub skipped_values: u64,
}

impl DatasetHistograms {
    pub fn histogram_count(&self) -> usize {
        self.uri_subjects.is_some() as usize
            + self.blank_subjects.is_some() as usize
            + self.properties.len()
    }
}

/// 单次扫描中的构建状态
struct CollectState {
    pref_size: usize,
    seen_subjects: HashSet<Term>,
    uri_subjects: OrderedStringHistogramBuilder,
    blank_subjects: OrderedStringHistogramBuilder,
    properties: HashMap<(String, String), AnyHistogramBuilder>,
    triples: u64,
    skipped_values: u64,
}

impl CollectState {
    fn new(pref_size: usize) -> Self {
        Self {
            pref_size,
            seen_subjects: HashSet::new(),
            uri_subjects: OrderedStringHistogramBuilder::new(vocab::RDFS_RESOURCE, pref_size),
            blank_subjects: OrderedStringHistogramBuilder::new(vocab::STATS_BLANK_NODE, pref_size),
            properties: HashMap::new(),
            triples: 0,
            skipped_values: 0,
        }
    }

    fn add(&mut self, triple: &Triple) -> StatsResult<()> {
        self.triples += 1;

        // 每个不同的主语只记录一次
        if !self.seen_subjects.contains(&triple.subject) {
            match &triple.subject {
                Term::Uri(_) => self.uri_subjects.add_term(&triple.subject)?,
                Term::Blank(_) => self.blank_subjects.add_term(&triple.subject)?,
                other => {
                    return Err(StatsError::Source(format!("非法的主语: {}", other)));
                }
            }
            self.seen_subjects.insert(triple.subject.clone());
        }

        let property = triple
            .predicate
            .as_uri()
            .ok_or_else(|| StatsError::Source(format!("非法的谓语: {}", triple.predicate)))?;
        let range = triple
            .object
            .range_type()
            .ok_or_else(|| StatsError::Source(format!("宾语不能是变量: {}", triple)))?;

        let pref_size = self.pref_size;
        let builder = self
            .properties
            .entry((property.to_string(), range.to_string()))
            .or_insert_with(|| AnyHistogramBuilder::for_range(range, pref_size));
        if let Err(e) = builder.add_term(&triple.object) {
            warn!("跳过无法解析的宾语 {}: {}", triple.object, e);
            self.skipped_values += 1;
        }
        Ok(())
    }

    fn finish(self, info: DatasetInfo) -> StatsResult<DatasetHistograms> {
        let uri_subjects = generate_if_any(self.uri_subjects)?;
        let blank_subjects = generate_if_any(self.blank_subjects)?;

        let mut properties = Vec::with_capacity(self.properties.len());
        for ((property, _range), builder) in self.properties {
            if builder.is_empty() {
                continue;
            }
            properties.push((property, builder.generate()?));
        }
        properties.sort_by(|a, b| (a.0.as_str(), a.1.type_uri()).cmp(&(b.0.as_str(), b.1.type_uri())));

        Ok(DatasetHistograms {
            info,
            uri_subjects,
            blank_subjects,
            properties,
            triples: self.triples,
            skipped_values: self.skipped_values,
        })
    }
}

fn generate_if_any(builder: OrderedStringHistogramBuilder) -> StatsResult<Option<Histogram>> {
    if builder.distinct_values() == 0 {
        return Ok(None);
    }
    Ok(Some(builder.generate()?))
}

/// 统计信息收集器
pub struct StatisticsCollector<S: TripleSource> {
    source: Arc<S>,
    pref_size: usize,
}

impl<S: TripleSource> StatisticsCollector<S> {
    pub fn new(source: Arc<S>, pref_size: usize) -> Self {
        Self { source, pref_size }
    }

    pub fn pref_size(&self) -> usize {
        self.pref_size
    }

    /// 扫描数据集并生成直方图
    pub fn collect(&self, dataset: &str) -> StatsResult<DatasetHistograms> {
        let started = Instant::now();
        let info = self.source.dataset_info(dataset)?;
        let mut state = CollectState::new(self.pref_size);
        self.source.scan(dataset, &mut |triple: &Triple| state.add(triple))?;

        let result = state.finish(info)?;
        info!(
            "数据集 {} 统计完成: {} 个三元组, {} 个直方图, 跳过 {} 个取值, 耗时 {:?}",
            dataset,
            result.triples,
            result.histogram_count(),
            result.skipped_values,
            started.elapsed()
        );
        Ok(result)
    }

    /// 扫描数据集并写入存储
    pub fn collect_into(&self, dataset: &str, store: &StatisticsStore) -> StatsResult<DatasetHistograms> {
        let result = self.collect(dataset)?;
        store.register_dataset(result.info.clone());
        if let Some(h) = &result.uri_subjects {
            store.put_subject_histogram(dataset, false, h.clone());
        }
        if let Some(h) = &result.blank_subjects {
            store.put_subject_histogram(dataset, true, h.clone());
        }
        for (property, h) in &result.properties {
            store.put_property_histogram(dataset, property, h.clone());
        }
        debug!("数据集 {} 的直方图已写入存储", dataset);
        Ok(result)
    }

    /// 并行收集多个数据集，每个数据集仍由单个工作线程扫描
    pub fn collect_all(
        &self,
        datasets: &[String],
        store: &StatisticsStore,
    ) -> StatsResult<Vec<DatasetHistograms>> {
        datasets
            .par_iter()
            .map(|dataset| self.collect_into(dataset, store))
            .collect()
    }
}
