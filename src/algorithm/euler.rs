//! 欧拉回路
//!
//! Hierholzer 算法（显式栈）。按槽位标记已用边，不修改图本身：
//! 复制边与原始边共享边 ID，但各自是一次独立的遍历机会。

use crate::error::{Error, Result};
use crate::graph::{EdgeId, Graph, Incidence, VertexId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// 欧拉回路
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EulerCircuit {
    /// 边序列
    pub edges: Vec<EdgeId>,
    /// 顶点序列（闭合，首尾都是起点，长度 = 边数 + 1）
    pub vertices: Vec<VertexId>,
}

impl EulerCircuit {
    /// 起点
    pub fn start(&self) -> Option<VertexId> {
        self.vertices.first().copied()
    }

    /// 边数
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// 回路构造器
pub struct CircuitBuilder<'a> {
    graph: &'a Graph,
}

impl<'a> CircuitBuilder<'a> {
    /// 创建构造器，图必须连通且所有顶点度为偶数
    pub fn new(graph: &'a Graph) -> Self {
        Self { graph }
    }

    /// 从 start 出发构造欧拉回路
    ///
    /// 同一顶点有多条可用边时，按 (邻居 ID, 边 ID, 槽位) 升序选择，结果可复现。
    pub fn build(&self, start: VertexId) -> Result<EulerCircuit> {
        if !self.graph.contains_vertex(start) {
            return Err(Error::VertexNotFound(start));
        }
        if !self.graph.is_even() {
            return Err(Error::InvariantViolation(format!(
                "欧拉回路要求所有顶点度为偶数，奇度顶点: {:?}",
                self.graph.odd_vertices()
            )));
        }

        let mut ordered: HashMap<VertexId, Vec<Incidence>> = HashMap::new();
        let mut cursors: HashMap<VertexId, usize> = HashMap::new();
        let mut used = vec![false; self.graph.slot_count()];

        let mut stack: Vec<(VertexId, Option<EdgeId>)> = vec![(start, None)];
        let mut edges = Vec::with_capacity(self.graph.slot_count());
        let mut vertices = Vec::with_capacity(self.graph.slot_count() + 1);

        while let Some(&(current, via)) = stack.last() {
            let incidences = ordered.entry(current).or_insert_with(|| {
                let mut list = self.graph.incidences(current).to_vec();
                list.sort_by_key(|inc| (inc.neighbor, inc.edge, inc.slot));
                list
            });
            let cursor = cursors.entry(current).or_insert(0);

            // 跳过已用槽位
            while *cursor < incidences.len() && used[incidences[*cursor].slot.index()] {
                *cursor += 1;
            }

            match incidences.get(*cursor) {
                Some(inc) => {
                    used[inc.slot.index()] = true;
                    stack.push((inc.neighbor, Some(inc.edge)));
                }
                None => {
                    stack.pop();
                    vertices.push(current);
                    if let Some(edge) = via {
                        edges.push(edge);
                    }
                }
            }
        }

        if edges.len() != self.graph.slot_count() {
            return Err(self.unreached(start, &used));
        }

        edges.reverse();
        vertices.reverse();

        debug!(start = %start, edges = edges.len(), "欧拉回路构造完成");
        Ok(EulerCircuit { edges, vertices })
    }

    /// 回路结束后仍有未用槽位：这些边与起点不连通
    fn unreached(&self, start: VertexId, used: &[bool]) -> Error {
        let to = self
            .graph
            .slots()
            .iter()
            .zip(used)
            .find(|&(_, &taken)| !taken)
            .and_then(|(slot, _)| self.graph.get_edge(slot.edge))
            .map(|edge| edge.endpoints().0);

        match to {
            Some(to) => Error::Disconnected { from: start, to },
            None => Error::InvariantViolation("回路边数与槽位数不一致".to_string()),
        }
    }
}
