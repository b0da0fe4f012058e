//! 图数据结构
//!
//! 无向带权多重图：边按 ID 独立存储，平行边互不合并，
//! 邻接表与边集合始终保持一致

use super::edge::{Edge, EdgeId};
use super::index::{AdjacencyIndex, Incidence};
use super::vertex::VertexId;
use crate::error::{Error, Result};
use crate::types::{SlotId, Weight};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 边槽位：原始边或其复制边的一次可遍历机会
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSlot {
    /// 对应的边 ID
    pub edge: EdgeId,
    /// 是否为增广产生的复制边
    pub duplicate: bool,
}

/// 多重图
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// 原始边（按插入顺序）
    edges: IndexMap<EdgeId, Edge>,
    /// 所有边槽位，下标即 SlotId
    slots: Vec<EdgeSlot>,
    /// 邻接索引
    adjacency: AdjacencyIndex,
}

impl Graph {
    /// 创建空图
    pub fn new() -> Self {
        Self::default()
    }

    /// 从 (边 ID, 端点 a, 端点 b, 权重) 列表构建图
    pub fn from_edges<I>(edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u64, u64, u64, Weight)>,
    {
        let mut graph = Self::new();
        for (id, a, b, weight) in edges {
            graph.add_edge(EdgeId::new(id), VertexId::new(a), VertexId::new(b), weight)?;
        }
        Ok(graph)
    }

    // ==================== 边操作 ====================

    /// 添加边
    ///
    /// 重复的边 ID 会被拒绝；平行边各自保留，不按权重替换。
    pub fn add_edge(&mut self, id: EdgeId, a: VertexId, b: VertexId, weight: Weight) -> Result<()> {
        if self.edges.contains_key(&id) {
            return Err(Error::DuplicateEdge(id));
        }
        let edge = Edge::new(id, a, b, weight)?;

        let slot = self.push_slot(id, false);
        self.adjacency.insert(id, a, b, weight, slot);
        self.edges.insert(id, edge);

        Ok(())
    }

    /// 复制一条已有的边
    ///
    /// 复制边沿用原边的 ID、端点和权重，占用一个新的槽位。
    /// 只增不删，原始边不受影响。
    pub fn duplicate_edge(&mut self, id: EdgeId) -> Result<SlotId> {
        let edge = *self.edges.get(&id).ok_or(Error::EdgeNotFound(id))?;
        let (a, b) = edge.endpoints();

        let slot = self.push_slot(id, true);
        self.adjacency.insert(id, a, b, edge.weight(), slot);

        Ok(slot)
    }

    fn push_slot(&mut self, edge: EdgeId, duplicate: bool) -> SlotId {
        let slot = SlotId(self.slots.len());
        self.slots.push(EdgeSlot { edge, duplicate });
        slot
    }

    /// 获取边
    pub fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// 按插入顺序遍历原始边
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.values()
    }

    /// 获取槽位
    pub fn slot(&self, slot: SlotId) -> Option<&EdgeSlot> {
        self.slots.get(slot.index())
    }

    /// 所有槽位
    pub fn slots(&self) -> &[EdgeSlot] {
        &self.slots
    }

    /// 原始边数量
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// 槽位数量（原始边 + 复制边）
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// 复制边数量
    pub fn duplicate_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.duplicate).count()
    }

    /// 原始边权重之和
    pub fn total_weight(&self) -> Weight {
        self.edges.values().map(|e| e.weight()).sum()
    }

    // ==================== 顶点与邻居 ====================

    /// 顶点是否在图中
    pub fn contains_vertex(&self, vertex: VertexId) -> bool {
        self.adjacency.contains(vertex)
    }

    /// 所有顶点（升序）
    pub fn vertices(&self) -> Vec<VertexId> {
        let mut vertices: Vec<VertexId> = self.adjacency.vertices().collect();
        vertices.sort_unstable();
        vertices
    }

    /// 顶点数量
    pub fn vertex_count(&self) -> usize {
        self.adjacency.vertex_count()
    }

    /// 获取顶点的关联表
    pub fn incidences(&self, vertex: VertexId) -> &[Incidence] {
        self.adjacency.incidences(vertex)
    }

    /// 获取顶点的邻居（按关联表顺序，平行边会重复出现）
    pub fn neighbors(&self, vertex: VertexId) -> Vec<VertexId> {
        self.incidences(vertex).iter().map(|inc| inc.neighbor).collect()
    }

    // ==================== 度分析 ====================

    /// 顶点的度（自环计 2，平行边与复制边各自计数）
    pub fn degree(&self, vertex: VertexId) -> usize {
        self.adjacency.degree(vertex)
    }

    /// 所有顶点的度（按顶点升序）
    pub fn degrees(&self) -> Vec<(VertexId, usize)> {
        self.vertices()
            .into_iter()
            .map(|v| (v, self.degree(v)))
            .collect()
    }

    /// 奇度顶点（升序）
    ///
    /// 图变化后需要重新计算。
    pub fn odd_vertices(&self) -> Vec<VertexId> {
        self.vertices()
            .into_iter()
            .filter(|&v| self.degree(v) % 2 == 1)
            .collect()
    }

    /// 所有顶点的度是否均为偶数
    pub fn is_even(&self) -> bool {
        self.adjacency
            .vertices()
            .all(|v| self.adjacency.degree(v) % 2 == 0)
    }
}
