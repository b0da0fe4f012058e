//! 图增广
//!
//! 沿每对匹配顶点之间的最短路径复制边，使所有顶点的度变为偶数

use super::matching::Matching;
use super::shortest_path::DistanceTable;
use crate::error::{Error, Result};
use crate::graph::{EdgeId, Graph};
use crate::types::Weight;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 增广结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Augmentation {
    /// 被复制的边（按配对顺序、路径顺序）
    pub duplicated: Vec<EdgeId>,
    /// 复制边的权重之和
    pub added_weight: Weight,
}

/// 增广器
pub struct Augmenter<'a> {
    table: &'a DistanceTable,
}

impl<'a> Augmenter<'a> {
    /// 创建增广器，距离表必须在增广前的图上计算
    pub fn new(table: &'a DistanceTable) -> Self {
        Self { table }
    }

    /// 把匹配对应的最短路径复制进图中
    pub fn apply(&self, graph: &mut Graph, matching: &Matching) -> Result<Augmentation> {
        let mut result = Augmentation::default();

        for pair in &matching.pairs {
            let path = self
                .table
                .path(pair.first, pair.second)
                .ok_or(Error::Disconnected {
                    from: pair.first,
                    to: pair.second,
                })?;

            for &edge_id in &path.edges {
                graph.duplicate_edge(edge_id)?;
                result.duplicated.push(edge_id);
            }
            result.added_weight += path.total_weight;
        }

        if !graph.is_even() {
            return Err(Error::InvariantViolation(format!(
                "增广后仍有奇度顶点: {:?}",
                graph.odd_vertices()
            )));
        }

        debug!(
            duplicated = result.duplicated.len(),
            weight = result.added_weight,
            "增广完成"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::matching::MinWeightMatcher;
    use crate::graph::VertexId;
    use crate::types::MatchedPair;

    #[test]
    fn test_augment_path() {
        let mut graph = Graph::from_edges([(1, 1, 2, 1.0), (2, 2, 3, 1.0)]).unwrap();
        let table = DistanceTable::compute(&graph);
        let matching = MinWeightMatcher::default()
            .find(&graph.odd_vertices(), &table)
            .unwrap();

        let result = Augmenter::new(&table).apply(&mut graph, &matching).unwrap();

        assert_eq!(result.duplicated, vec![EdgeId(1), EdgeId(2)]);
        assert_eq!(result.added_weight, 2.0);
        assert!(graph.is_even());
        assert_eq!(graph.degree(VertexId(2)), 4);
        assert_eq!(graph.slot_count(), 4);
        // 原始边不受影响
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.total_weight(), 2.0);
    }

    #[test]
    fn test_augment_empty_matching_is_noop() {
        let mut graph = Graph::from_edges([(1, 1, 2, 1.0), (2, 2, 1, 1.0)]).unwrap();
        let table = DistanceTable::compute(&graph);

        let result = Augmenter::new(&table)
            .apply(&mut graph, &Matching::default())
            .unwrap();

        assert!(result.duplicated.is_empty());
        assert_eq!(graph.slot_count(), 2);
    }

    #[test]
    fn test_augment_uses_lightest_parallel_edge() {
        // 1 与 2 之间三条平行边，再加 2-3
        let mut graph =
            Graph::from_edges([(1, 1, 2, 4.0), (2, 1, 2, 1.0), (3, 1, 2, 1.0), (4, 2, 3, 2.0)]).unwrap();
        assert_eq!(graph.odd_vertices(), vec![VertexId(1), VertexId(3)]);
        let table = DistanceTable::compute(&graph);
        let matching = Matching {
            pairs: vec![MatchedPair::new(VertexId(1), VertexId(3))],
            total_cost: 3.0,
        };

        let result = Augmenter::new(&table).apply(&mut graph, &matching).unwrap();
        assert_eq!(result.duplicated, vec![EdgeId(2), EdgeId(4)]);
        assert_eq!(result.added_weight, 3.0);
    }

    #[test]
    fn test_augment_bad_matching_detected() {
        // 只给出一半的配对，增广后仍有奇度顶点
        let mut graph = Graph::from_edges([(1, 1, 2, 1.0), (2, 3, 4, 1.0), (3, 2, 3, 1.0)]).unwrap();
        let table = DistanceTable::compute(&graph);
        let matching = Matching {
            pairs: vec![MatchedPair::new(VertexId(1), VertexId(2))],
            total_cost: 1.0,
        };

        let err = Augmenter::new(&table).apply(&mut graph, &matching).unwrap_err();
        assert!(matches!(err, Error::InvariantViolation(_)));
    }
}
