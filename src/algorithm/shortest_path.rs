//! 全源最短路径
//!
//! Floyd–Warshall 距离矩阵 + 下一跳表，可重构任意两点间的最短边序列

use crate::graph::{EdgeId, Graph, VertexId};
use crate::types::{Weight, UNREACHABLE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 路径结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    /// 路径上的顶点序列
    pub vertices: Vec<VertexId>,
    /// 路径上的边序列
    pub edges: Vec<EdgeId>,
    /// 路径长度（跳数）
    pub length: usize,
    /// 路径总权重
    pub total_weight: Weight,
}

impl PathResult {
    fn with_start(start: VertexId) -> Self {
        Self {
            vertices: vec![start],
            edges: Vec::new(),
            length: 0,
            total_weight: 0.0,
        }
    }
}

/// 两点之间的直连边（取最轻的一条）
#[derive(Debug, Clone, Copy)]
struct Hop {
    edge: EdgeId,
    weight: Weight,
}

/// 距离表
///
/// 每次求解计算一次，之后只读。
#[derive(Debug, Clone)]
pub struct DistanceTable {
    /// 顶点（升序），下标即矩阵行列号
    vertices: Vec<VertexId>,
    /// 顶点到下标的映射
    index: HashMap<VertexId, usize>,
    /// 距离矩阵（n × n，行优先）
    dist: Vec<Weight>,
    /// 下一跳矩阵
    next: Vec<Option<usize>>,
    /// 直连边矩阵
    hops: Vec<Option<Hop>>,
    /// 连通分量代表元，与距离是否溢出无关
    component: Vec<usize>,
}

impl DistanceTable {
    /// 在图上计算全源最短路径
    pub fn compute(graph: &Graph) -> Self {
        let vertices = graph.vertices();
        let n = vertices.len();
        let index: HashMap<VertexId, usize> =
            vertices.iter().enumerate().map(|(i, &v)| (v, i)).collect();

        let mut dist = vec![UNREACHABLE; n * n];
        let mut next = vec![None; n * n];
        let mut hops: Vec<Option<Hop>> = vec![None; n * n];
        let mut parent: Vec<usize> = (0..n).collect();

        for i in 0..n {
            dist[i * n + i] = 0.0;
            next[i * n + i] = Some(i);
        }

        // 直连距离：平行边只取最轻的，权重相同取 ID 最小的
        for edge in graph.edges() {
            if edge.is_loop() {
                continue;
            }
            let (a, b) = edge.endpoints();
            let (i, j) = (index[&a], index[&b]);
            let (ri, rj) = (find_root(&mut parent, i), find_root(&mut parent, j));
            parent[ri] = rj;

            let candidate = Hop {
                edge: edge.id(),
                weight: edge.weight(),
            };

            let better = match hops[i * n + j] {
                None => true,
                Some(current) => {
                    candidate.weight < current.weight
                        || (candidate.weight == current.weight && candidate.edge < current.edge)
                }
            };
            if better {
                for (x, y) in [(i, j), (j, i)] {
                    hops[x * n + y] = Some(candidate);
                    dist[x * n + y] = candidate.weight;
                    next[x * n + y] = Some(y);
                }
            }
        }

        for k in 0..n {
            for i in 0..n {
                let d_ik = dist[i * n + k];
                if d_ik == UNREACHABLE {
                    continue;
                }
                for j in 0..n {
                    let candidate = d_ik + dist[k * n + j];
                    if candidate < dist[i * n + j] {
                        dist[i * n + j] = candidate;
                        next[i * n + j] = next[i * n + k];
                    }
                }
            }
        }

        let component = (0..n).map(|i| find_root(&mut parent, i)).collect();

        Self {
            vertices,
            index,
            dist,
            next,
            hops,
            component,
        }
    }

    /// 最短距离；不可达或顶点不存在时为无穷大
    pub fn distance(&self, from: VertexId, to: VertexId) -> Weight {
        match (self.index.get(&from), self.index.get(&to)) {
            (Some(&i), Some(&j)) => self.dist[i * self.vertices.len() + j],
            _ => UNREACHABLE,
        }
    }

    /// 判断两点是否连通
    pub fn is_reachable(&self, from: VertexId, to: VertexId) -> bool {
        match (self.index.get(&from), self.index.get(&to)) {
            (Some(&i), Some(&j)) => self.component[i] == self.component[j],
            _ => false,
        }
    }

    /// 重构最短路径
    pub fn path(&self, from: VertexId, to: VertexId) -> Option<PathResult> {
        let n = self.vertices.len();
        let (&i, &j) = (self.index.get(&from)?, self.index.get(&to)?);
        if i == j {
            return Some(PathResult::with_start(from));
        }
        self.next[i * n + j]?;

        let mut path = PathResult::with_start(from);
        let mut current = i;
        while current != j {
            // 非负权重下下一跳链不会成环，超过 n 跳说明表已损坏
            if path.length >= n {
                return None;
            }
            let step = self.next[current * n + j]?;
            let hop = self.hops[current * n + step]?;

            path.vertices.push(self.vertices[step]);
            path.edges.push(hop.edge);
            path.total_weight += hop.weight;
            path.length += 1;
            current = step;
        }

        Some(path)
    }
}

/// 并查集查找（路径减半）
fn find_root(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}
