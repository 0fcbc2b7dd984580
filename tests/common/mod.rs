//! 集成测试共享工具模块
//!
//! 提供内存三元组数据集和已收集的统计信息，供所有集成测试使用

#![allow(dead_code)]

use std::sync::Arc;

use graphstats::core::term::{Term, Triple};
use graphstats::core::vocab;
use graphstats::stats::{
    DatasetInfo, DatasetStatistics, MemoryTripleSource, SourceType, StatisticsCollector,
    StatisticsStore,
};

pub const DATASET: &str = "http://example.org/people.rdf";

pub const AGE: &str = "http://example.org/vocab/age";
pub const NAME: &str = "http://example.org/vocab/name";
pub const KNOWS: &str = "http://example.org/vocab/knows";
pub const ACTIVE: &str = "http://example.org/vocab/active";
pub const HEIGHT: &str = "http://example.org/vocab/height";
pub const BORN: &str = "http://example.org/vocab/born";
pub const CITY: &str = "http://example.org/vocab/city";

pub const PEOPLE: usize = 100;
pub const ADDRESSES: usize = 10;

/// 测试使用的期望桶数
pub const PREF_SIZE: usize = 10;

pub fn person(i: usize) -> Term {
    Term::uri(format!("http://example.org/person/{:03}", i))
}

/// 100 个人和 10 个匿名地址
///
/// - age: 18 + i % 50，每个年龄恰好两人
/// - name: 每人唯一
/// - knows: 指向下一个人
/// - active: 每 4 人一个 true
/// - height: 1.50 + i / 100
/// - born: xsd:dateTime，只有前 20 人有
/// - city: 地址节点上 3 个城市
pub fn people_triples() -> Vec<Triple> {
    let mut triples = Vec::new();
    for i in 0..PEOPLE {
        let s = person(i);
        let p = |uri: &str| Term::uri(uri);
        triples.push(Triple::new(s.clone(), p(AGE), Term::integer(18 + (i % 50) as i64)));
        triples.push(Triple::new(s.clone(), p(NAME), Term::string(format!("Person {:03}", i))));
        triples.push(Triple::new(s.clone(), p(KNOWS), person((i + 1) % PEOPLE)));
        triples.push(Triple::new(s.clone(), p(ACTIVE), Term::boolean(i % 4 == 0)));
        triples.push(Triple::new(s.clone(), p(HEIGHT), Term::double(1.5 + i as f64 / 100.0)));
        if i < 20 {
            triples.push(Triple::new(
                s,
                p(BORN),
                Term::typed(format!("19{:02}-01-01T00:00:00Z", 50 + i), vocab::XSD_DATE_TIME),
            ));
        }
    }
    for i in 0..ADDRESSES {
        triples.push(Triple::new(
            Term::blank(format!("addr{}", i)),
            Term::uri(CITY),
            Term::string(format!("City {}", i % 3)),
        ));
    }
    triples
}

pub fn people_source() -> Arc<MemoryTripleSource> {
    let source = MemoryTripleSource::new();
    source.add_dataset(
        DatasetInfo::new(DATASET, SourceType::RdfDocument).with_creator("integration-tests"),
    );
    source
        .extend(DATASET, people_triples())
        .expect("Failed to load test triples");
    Arc::new(source)
}

/// 收集测试数据集的统计信息
pub fn collected_store() -> Arc<StatisticsStore> {
    let store = StatisticsStore::new();
    StatisticsCollector::new(people_source(), PREF_SIZE)
        .collect_into(DATASET, &store)
        .expect("Failed to collect statistics");
    Arc::new(store)
}

pub fn people_statistics() -> DatasetStatistics {
    DatasetStatistics::new(collected_store(), DATASET)
}
