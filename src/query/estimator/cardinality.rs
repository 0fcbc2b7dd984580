//! 基数区间 `[min, avg, max]` 及其组合规则

use std::fmt;

/// 乘积取整时容忍的浮点误差
const ROUNDING_EPSILON: f64 = 1e-9;

/// 按比例缩放后向上取整
pub fn ceil_scaled(value: u64, factor: f64) -> u64 {
    let scaled = value as f64 * factor - ROUNDING_EPSILON;
    if scaled <= 0.0 {
        0
    } else {
        scaled.ceil() as u64
    }
}

/// 估算的结果行数区间
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cardinality {
    pub min: u64,
    pub avg: u64,
    pub max: u64,
}

impl Cardinality {
    pub fn new(min: u64, avg: u64, max: u64) -> Self {
        Self { min, avg, max }
    }

    /// 三个分量相同的区间
    pub fn exact(value: u64) -> Self {
        Self::new(value, value, value)
    }

    pub fn empty() -> Self {
        Self::exact(0)
    }

    pub fn as_array(&self) -> [u64; 3] {
        [self.min, self.avg, self.max]
    }

    /// 连接
    ///
    /// 有共享变量时按选择率折减平均值，最大值取所有取值都相同的退化情况；
    /// 没有共享变量时为笛卡尔积
    pub fn join(&self, other: &Cardinality, shared_vars: bool, selectivity: f64) -> Cardinality {
        if shared_vars {
            Cardinality {
                min: 0,
                avg: ceil_scaled(1, self.avg as f64 * other.avg as f64 * selectivity),
                max: self.max.saturating_mul(other.max),
            }
        } else {
            Cardinality {
                min: self.min.saturating_mul(other.min),
                avg: self.avg.saturating_mul(other.avg),
                max: self.max.saturating_mul(other.max),
            }
        }
    }

    /// 左外连接，只由左侧决定
    pub fn left_join(&self, shared_vars: bool, selectivity: f64) -> Cardinality {
        Cardinality {
            min: if shared_vars { 0 } else { self.min },
            avg: ceil_scaled(self.avg, selectivity),
            max: self.max,
        }
    }

    pub fn union(&self, other: &Cardinality) -> Cardinality {
        Cardinality {
            min: self.min.saturating_add(other.min),
            avg: self.avg.saturating_add(other.avg),
            max: self.max.saturating_add(other.max),
        }
    }

    /// 非模式子节点上的过滤
    pub fn filtered(&self, selectivity: f64) -> Cardinality {
        Cardinality {
            min: 0,
            avg: if self.avg > 1 {
                ceil_scaled(self.avg, selectivity)
            } else {
                self.avg
            },
            max: self.max,
        }
    }

    /// 去重：`k` 个自由变量时平均值乘以 `1 - ratio^k`
    pub fn reduced(&self, free_vars: usize, duplicate_ratio: f64) -> Cardinality {
        let exponent = i32::try_from(free_vars).unwrap_or(i32::MAX);
        let factor = 1.0 - duplicate_ratio.powi(exponent);
        Cardinality {
            min: self.max.min(1),
            avg: ceil_scaled(self.avg, factor),
            max: self.max,
        }
    }

    /// LIMIT
    pub fn limited(&self, length: Option<u64>) -> Cardinality {
        match length {
            Some(n) => Cardinality {
                min: self.min.min(n),
                avg: self.avg.min(n),
                max: self.max.min(n),
            },
            None => *self,
        }
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.min, self.avg, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cross_product() {
        let left = Cardinality::new(0, 5, 10);
        let right = Cardinality::new(0, 3, 6);
        assert_eq!(left.join(&right, false, 0.5), Cardinality::new(0, 15, 60));
    }

    #[test]
    fn test_join_shared_vars() {
        let left = Cardinality::new(2, 5, 10);
        let right = Cardinality::new(1, 3, 6);
        assert_eq!(left.join(&right, true, 0.5), Cardinality::new(0, 8, 60));
    }

    #[test]
    fn test_left_join() {
        let left = Cardinality::new(4, 7, 10);
        assert_eq!(left.left_join(true, 0.5), Cardinality::new(0, 4, 10));
        assert_eq!(left.left_join(false, 0.5), Cardinality::new(4, 4, 10));
    }

    #[test]
    fn test_filtered() {
        assert_eq!(Cardinality::exact(9).filtered(0.5), Cardinality::new(0, 5, 9));
        assert_eq!(Cardinality::exact(1).filtered(0.5), Cardinality::new(0, 1, 1));
    }

    #[test]
    fn test_reduced() {
        let c = Cardinality::new(100, 100, 100);
        assert_eq!(c.reduced(2, 0.5), Cardinality::new(1, 75, 100));
        assert_eq!(c.reduced(1, 0.5).avg, 50);
        assert_eq!(c.reduced(3, 0.5).avg, 88);
        assert_eq!(Cardinality::empty().reduced(1, 0.5), Cardinality::empty());
    }

    #[test]
    fn test_limited_and_union() {
        let c = Cardinality::new(2, 50, 500);
        assert_eq!(c.limited(Some(10)), Cardinality::new(2, 10, 10));
        assert_eq!(c.limited(None), c);
        assert_eq!(c.union(&Cardinality::exact(u64::MAX)).max, u64::MAX);
    }

    #[test]
    fn test_ceil_scaled_tolerates_rounding() {
        assert_eq!(ceil_scaled(10, 0.7), 7);
        assert_eq!(ceil_scaled(3, 0.5), 2);
        assert_eq!(ceil_scaled(0, 0.5), 0);
    }
}
