//! 求解器配置

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// 匹配算法选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingStrategy {
    /// 奇度顶点不多时用子集动态规划，否则用分支定界
    #[default]
    Auto,
    /// 分支定界
    BranchAndBound,
    /// 子集动态规划
    SubsetDp,
}

/// 求解器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// 匹配算法
    pub matching: MatchingStrategy,
    /// Auto 策略下交给子集动态规划的最大奇度顶点数
    pub subset_dp_limit: usize,
    /// 奇度顶点数上限，超过时直接失败（用于约束最坏情况运行时间）
    pub max_odd_vertices: Option<usize>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            matching: MatchingStrategy::Auto,
            subset_dp_limit: 20,
            max_odd_vertices: None,
        }
    }
}

impl SolverConfig {
    /// 从 JSON 解析配置，缺省字段取默认值
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 设置匹配算法
    pub fn with_matching(mut self, strategy: MatchingStrategy) -> Self {
        self.matching = strategy;
        self
    }

    /// 设置子集动态规划上限
    pub fn with_subset_dp_limit(mut self, limit: usize) -> Self {
        self.subset_dp_limit = limit;
        self
    }

    /// 设置奇度顶点数上限
    pub fn with_max_odd_vertices(mut self, limit: usize) -> Self {
        self.max_odd_vertices = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_config_from_json() {
        let config = SolverConfig::from_json(r#"{"matching":"branch_and_bound","max_odd_vertices":12}"#)
            .unwrap();

        assert_eq!(config.matching, MatchingStrategy::BranchAndBound);
        assert_eq!(config.max_odd_vertices, Some(12));
        assert_eq!(config.subset_dp_limit, 20);

        assert_eq!(SolverConfig::from_json("{}").unwrap(), SolverConfig::default());
    }

    #[test]
    fn test_config_invalid_json() {
        let err = SolverConfig::from_json(r#"{"matching":"greedy"}"#).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_config_builder() {
        let config = SolverConfig::default()
            .with_matching(MatchingStrategy::SubsetDp)
            .with_subset_dp_limit(8)
            .with_max_odd_vertices(16);

        assert_eq!(config.matching, MatchingStrategy::SubsetDp);
        assert_eq!(config.subset_dp_limit, 8);
        assert_eq!(config.max_odd_vertices, Some(16));

        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(SolverConfig::from_json(&json).unwrap(), config);
    }
}
