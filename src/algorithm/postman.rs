//! 中国邮递员问题求解
//!
//! 奇度分析 → 全源最短路径 → 最小权完美匹配 → 增广 → 欧拉回路

use super::augment::Augmenter;
use super::euler::CircuitBuilder;
use super::matching::{Matching, MinWeightMatcher};
use super::shortest_path::DistanceTable;
use crate::config::SolverConfig;
use crate::error::{Error, Result};
use crate::graph::{EdgeId, Graph, VertexId};
use crate::metrics::{SolveStats, StageTimer};
use crate::types::Weight;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::{debug, info};

/// 邮递员回路
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostmanTour {
    /// 起点
    pub start: VertexId,
    /// 总代价 = 原始边权重之和 + 匹配代价
    pub total_cost: Weight,
    /// 原始边权重之和
    pub base_cost: Weight,
    /// 匹配代价（复制边的权重之和）
    pub matching_cost: Weight,
    /// 回路边序列
    pub edges: Vec<EdgeId>,
    /// 回路顶点序列（首尾都是起点）
    pub vertices: Vec<VertexId>,
    /// 奇度顶点的匹配
    pub matching: Matching,
    /// 被复制的边
    pub duplicated_edges: Vec<EdgeId>,
    /// 统计信息
    pub stats: SolveStats,
}

/// 中国邮递员求解器
///
/// 求解不会修改持有的图：增广发生在私有副本上，因此可以重复求解。
#[derive(Debug, Clone)]
pub struct PostmanSolver {
    graph: Graph,
    config: SolverConfig,
}

impl PostmanSolver {
    /// 创建求解器
    pub fn new(graph: Graph) -> Self {
        Self {
            graph,
            config: SolverConfig::default(),
        }
    }

    /// 设置配置
    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.config = config;
        self
    }

    /// 获取图
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// 获取配置
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// 从 start 出发求最短邮递员回路
    pub fn solve(&self, start: VertexId) -> Result<PostmanTour> {
        let total_timer = StageTimer::start();
        let graph = &self.graph;

        if !graph.contains_vertex(start) {
            return Err(Error::VertexNotFound(start));
        }

        let mut stats = SolveStats {
            vertices: graph.vertex_count(),
            edges: graph.edge_count(),
            ..SolveStats::default()
        };
        let base_cost = graph.total_weight();
        // 最短距离和最优匹配代价都不超过 base_cost，总代价不超过其两倍
        if !(base_cost * 2.0).is_finite() {
            return Err(Error::WeightOverflow { total: base_cost });
        }

        // 奇度分析
        let timer = StageTimer::start();
        let odd = graph.odd_vertices();
        stats.timings.degree_us = timer.elapsed_us();
        stats.odd_vertices = odd.len();

        if odd.len() % 2 == 1 {
            return Err(Error::InvariantViolation(format!(
                "奇度顶点个数为奇数: {}",
                odd.len()
            )));
        }
        if let Some(limit) = self.config.max_odd_vertices {
            if odd.len() > limit {
                return Err(Error::TooManyOddVertices {
                    count: odd.len(),
                    limit,
                });
            }
        }
        debug!(
            vertices = stats.vertices,
            edges = stats.edges,
            odd = odd.len(),
            "奇度分析完成"
        );

        let mut matching = Matching::default();
        let mut duplicated_edges = Vec::new();
        let mut working: Cow<'_, Graph> = Cow::Borrowed(graph);

        if !odd.is_empty() {
            let timer = StageTimer::start();
            let table = DistanceTable::compute(graph);
            stats.timings.shortest_path_us = timer.elapsed_us();
            ensure_reachable(&odd, &table)?;

            let timer = StageTimer::start();
            matching = MinWeightMatcher::new(self.config.matching)
                .with_subset_dp_limit(self.config.subset_dp_limit)
                .find(&odd, &table)?;
            stats.timings.matching_us = timer.elapsed_us();

            let timer = StageTimer::start();
            let augmentation = Augmenter::new(&table).apply(working.to_mut(), &matching)?;
            stats.timings.augment_us = timer.elapsed_us();
            duplicated_edges = augmentation.duplicated;
        }
        stats.duplicated_edges = working.duplicate_count();

        let timer = StageTimer::start();
        let circuit = CircuitBuilder::new(&working).build(start)?;
        stats.timings.circuit_us = timer.elapsed_us();
        stats.circuit_length = circuit.len();

        let matching_cost = matching.total_cost;
        let total_cost = base_cost + matching_cost;
        stats.timings.total_us = total_timer.elapsed_us();

        info!(
            start = %start,
            cost = total_cost,
            edges = circuit.len(),
            duplicated = stats.duplicated_edges,
            elapsed_us = stats.timings.total_us,
            "邮递员回路求解完成"
        );

        Ok(PostmanTour {
            start,
            total_cost,
            base_cost,
            matching_cost,
            edges: circuit.edges,
            vertices: circuit.vertices,
            matching,
            duplicated_edges,
            stats,
        })
    }
}

/// 任意两个奇度顶点之间都必须可达
fn ensure_reachable(odd: &[VertexId], table: &DistanceTable) -> Result<()> {
    for (i, &from) in odd.iter().enumerate() {
        for &to in &odd[i + 1..] {
            if !table.is_reachable(from, to) {
                return Err(Error::Disconnected { from, to });
            }
        }
    }
    Ok(())
}

/// 用默认配置求解
pub fn solve(graph: &Graph, start: VertexId) -> Result<PostmanTour> {
    PostmanSolver::new(graph.clone()).solve(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchingStrategy;
    use crate::types::MatchedPair;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use std::collections::HashMap;

    /// 在原始图上回放回路，核对闭合性、边的使用次数和总代价
    fn assert_valid_tour(graph: &Graph, tour: &PostmanTour) {
        assert_eq!(tour.vertices.len(), tour.edges.len() + 1);
        assert_eq!(tour.vertices.first(), Some(&tour.start));
        assert_eq!(tour.vertices.last(), Some(&tour.start));
        assert_eq!(
            tour.edges.len(),
            graph.edge_count() + tour.duplicated_edges.len()
        );

        let mut walked = 0.0;
        for (i, edge_id) in tour.edges.iter().enumerate() {
            let edge = graph.get_edge(*edge_id).expect("回路中的边必须存在");
            assert!(edge.connects(tour.vertices[i], tour.vertices[i + 1]));
            walked += edge.weight();
        }
        assert_eq!(walked, tour.total_cost);

        let mut used: HashMap<EdgeId, usize> = HashMap::new();
        for &edge in &tour.edges {
            *used.entry(edge).or_insert(0) += 1;
        }
        for edge in graph.edges() {
            let extra = tour.duplicated_edges.iter().filter(|&&d| d == edge.id()).count();
            assert_eq!(used.get(&edge.id()).copied().unwrap_or(0), 1 + extra);
        }
    }

    /// 随机连通多重图：随机生成树 + 随机附加边（可能是平行边或自环），整数权重
    fn random_connected_graph(rng: &mut StdRng) -> Graph {
        let n = rng.gen_range(2..=9u64);
        let mut edges = Vec::new();
        let mut next_id = 1;
        for v in 2..=n {
            let u = rng.gen_range(1..v);
            edges.push((next_id, u, v, rng.gen_range(0..10) as Weight));
            next_id += 1;
        }
        for _ in 0..rng.gen_range(0..8) {
            let u = rng.gen_range(1..=n);
            let v = rng.gen_range(1..=n);
            // 自环权重必须为正
            let low = if u == v { 1 } else { 0 };
            edges.push((next_id, u, v, rng.gen_range(low..10) as Weight));
            next_id += 1;
        }
        edges.shuffle(rng);
        Graph::from_edges(edges).unwrap()
    }

    #[test]
    fn test_eulerian_square() {
        let graph =
            Graph::from_edges([(1, 1, 2, 1.0), (2, 2, 3, 1.0), (3, 3, 4, 1.0), (4, 4, 1, 1.0)]).unwrap();
        let tour = solve(&graph, VertexId(1)).unwrap();

        assert_eq!(tour.total_cost, 4.0);
        assert_eq!(tour.base_cost, 4.0);
        assert_eq!(tour.matching_cost, 0.0);
        assert!(tour.matching.is_empty());
        assert!(tour.duplicated_edges.is_empty());
        assert_eq!(tour.edges.len(), 4);
        assert_valid_tour(&graph, &tour);
    }

    #[test]
    fn test_path_graph() {
        let graph = Graph::from_edges([(1, 1, 2, 1.0), (2, 2, 3, 1.0)]).unwrap();
        let tour = solve(&graph, VertexId(1)).unwrap();

        assert_eq!(tour.total_cost, 4.0);
        assert_eq!(
            tour.matching.pairs,
            vec![MatchedPair::new(VertexId(1), VertexId(3))]
        );
        assert_eq!(tour.duplicated_edges, vec![EdgeId(1), EdgeId(2)]);
        assert_eq!(tour.edges, vec![EdgeId(1), EdgeId(2), EdgeId(2), EdgeId(1)]);
        assert_valid_tour(&graph, &tour);
    }

    #[test]
    fn test_disjoint_edges_disconnected() {
        let graph = Graph::from_edges([(1, 1, 2, 1.0), (2, 3, 4, 1.0)]).unwrap();
        let err = solve(&graph, VertexId(1)).unwrap_err();
        assert_eq!(
            err,
            Error::Disconnected {
                from: VertexId(1),
                to: VertexId(3)
            }
        );
    }

    #[test]
    fn test_disjoint_cycles_disconnected() {
        // 所有顶点度为偶数，但两个分量互不相连
        let graph = Graph::from_edges([
            (1, 1, 2, 1.0),
            (2, 2, 3, 1.0),
            (3, 3, 1, 1.0),
            (4, 4, 5, 1.0),
            (5, 5, 6, 1.0),
            (6, 6, 4, 1.0),
        ])
        .unwrap();

        let err = solve(&graph, VertexId(1)).unwrap_err();
        assert!(matches!(err, Error::Disconnected { .. }));
    }

    #[test]
    fn test_weight_overflow_rejected() {
        // 连通的路径图，但权重之和溢出
        let graph = Graph::from_edges([(1, 1, 2, 1e308), (2, 2, 3, 1e308)]).unwrap();
        let err = solve(&graph, VertexId(1)).unwrap_err();
        assert!(matches!(err, Error::WeightOverflow { .. }));

        // 权重很大但总代价仍有限
        let graph = Graph::from_edges([(1, 1, 2, 4e307), (2, 2, 3, 4e307)]).unwrap();
        let tour = solve(&graph, VertexId(1)).unwrap();
        assert!(tour.total_cost.is_finite());
        assert_eq!(tour.matching_cost, 8e307);
        assert_eq!(tour.edges, vec![EdgeId(1), EdgeId(2), EdgeId(2), EdgeId(1)]);
    }

    #[test]
    fn test_missing_start_vertex() {
        let graph = Graph::from_edges([(1, 1, 2, 1.0)]).unwrap();
        assert_eq!(
            solve(&graph, VertexId(5)).unwrap_err(),
            Error::VertexNotFound(VertexId(5))
        );
        assert_eq!(
            solve(&Graph::new(), VertexId(1)).unwrap_err(),
            Error::VertexNotFound(VertexId(1))
        );
    }

    #[test]
    fn test_matching_beats_greedy() {
        // 奇度顶点 1..4 各有一条权重 100 的边连到 0；最近邻贪心会先配 1-2（总 6），最优是 1-3 + 2-4（总 4）
        let graph = Graph::from_edges([
            (1, 1, 2, 1.0),
            (2, 1, 3, 2.0),
            (3, 2, 4, 2.0),
            (4, 3, 4, 5.0),
            (5, 0, 1, 100.0),
            (6, 0, 2, 100.0),
            (7, 0, 3, 100.0),
            (8, 0, 4, 100.0),
        ])
        .unwrap();
        assert_eq!(
            graph.odd_vertices(),
            vec![VertexId(1), VertexId(2), VertexId(3), VertexId(4)]
        );

        let tour = solve(&graph, VertexId(0)).unwrap();

        assert_eq!(tour.matching_cost, 4.0);
        assert_eq!(tour.total_cost, 414.0);
        assert_eq!(
            tour.matching.pairs,
            vec![
                MatchedPair::new(VertexId(1), VertexId(3)),
                MatchedPair::new(VertexId(2), VertexId(4))
            ]
        );
        assert_valid_tour(&graph, &tour);
    }

    #[test]
    fn test_solve_is_repeatable() {
        let graph = Graph::from_edges([
            (1, 1, 2, 3.0),
            (2, 2, 3, 1.0),
            (3, 3, 4, 2.0),
            (4, 4, 1, 1.0),
            (5, 1, 3, 4.0),
        ])
        .unwrap();
        let solver = PostmanSolver::new(graph);

        let first = solver.solve(VertexId(2)).unwrap();
        let second = solver.solve(VertexId(2)).unwrap();

        assert_eq!(first.total_cost, second.total_cost);
        assert_eq!(first.edges, second.edges);
        assert_eq!(first.vertices, second.vertices);
        // 求解器持有的图没有被增广
        assert_eq!(solver.graph().slot_count(), solver.graph().edge_count());
        assert_valid_tour(solver.graph(), &first);
    }

    #[test]
    fn test_insertion_order_does_not_change_cost() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut edges = vec![
            (1, 1, 2, 2.0),
            (2, 2, 3, 3.0),
            (3, 3, 4, 1.0),
            (4, 4, 5, 4.0),
            (5, 5, 1, 2.0),
            (6, 2, 5, 1.0),
            (7, 3, 5, 6.0),
            (8, 2, 2, 1.0),
        ];
        let expected = solve(&Graph::from_edges(edges.clone()).unwrap(), VertexId(1))
            .unwrap()
            .total_cost;

        for _ in 0..10 {
            edges.shuffle(&mut rng);
            let graph = Graph::from_edges(edges.clone()).unwrap();
            let tour = solve(&graph, VertexId(1)).unwrap();
            assert_eq!(tour.total_cost, expected);
            assert_valid_tour(&graph, &tour);
        }
    }

    #[test]
    fn test_too_many_odd_vertices() {
        // 星形图：四个叶子都是奇度顶点
        let graph =
            Graph::from_edges([(1, 0, 1, 1.0), (2, 0, 2, 1.0), (3, 0, 3, 1.0), (4, 0, 4, 1.0)]).unwrap();
        let solver = PostmanSolver::new(graph).with_config(SolverConfig::default().with_max_odd_vertices(2));

        assert_eq!(
            solver.solve(VertexId(1)).unwrap_err(),
            Error::TooManyOddVertices { count: 4, limit: 2 }
        );
    }

    #[test]
    fn test_stats() {
        let graph = Graph::from_edges([(1, 1, 2, 1.0), (2, 2, 3, 1.0)]).unwrap();
        let tour = solve(&graph, VertexId(2)).unwrap();

        assert_eq!(tour.stats.vertices, 3);
        assert_eq!(tour.stats.edges, 2);
        assert_eq!(tour.stats.odd_vertices, 2);
        assert_eq!(tour.stats.duplicated_edges, 2);
        assert_eq!(tour.stats.circuit_length, 4);
        assert_valid_tour(&graph, &tour);
    }

    #[test]
    fn test_tour_serializes() {
        let graph = Graph::from_edges([(1, 1, 2, 1.0), (2, 2, 3, 1.0)]).unwrap();
        let tour = solve(&graph, VertexId(1)).unwrap();

        let json = serde_json::to_string(&tour).unwrap();
        let restored: PostmanTour = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, tour);
    }

    #[test]
    fn test_random_graphs_all_strategies() {
        let mut rng = StdRng::seed_from_u64(2024);
        for round in 0..60 {
            let graph = random_connected_graph(&mut rng);
            let start = VertexId(rng.gen_range(1..=graph.vertex_count() as u64));

            let costs: Vec<Weight> = [
                MatchingStrategy::Auto,
                MatchingStrategy::BranchAndBound,
                MatchingStrategy::SubsetDp,
            ]
            .into_iter()
            .map(|strategy| {
                let config = SolverConfig::default().with_matching(strategy);
                let tour = PostmanSolver::new(graph.clone())
                    .with_config(config)
                    .solve(start)
                    .unwrap();
                assert_valid_tour(&graph, &tour);
                tour.total_cost
            })
            .collect();

            assert!(
                costs.windows(2).all(|w| w[0] == w[1]),
                "round {}: {:?}",
                round,
                costs
            );
        }
    }
}
