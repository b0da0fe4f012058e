//! 邻接索引
//!
//! 每个顶点一张关联表，表项携带邻居、权重、边 ID 和边槽位

use crate::graph::edge::EdgeId;
use crate::graph::vertex::VertexId;
use crate::types::{SlotId, Weight};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// 关联表项
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Incidence {
    /// 邻居顶点
    pub neighbor: VertexId,
    /// 边权重
    pub weight: Weight,
    /// 边 ID（复制边沿用原始边的 ID）
    pub edge: EdgeId,
    /// 边槽位
    pub slot: SlotId,
}

type IncidenceList = SmallVec<[Incidence; 4]>;

/// 邻接索引
#[derive(Debug, Clone, Default)]
pub struct AdjacencyIndex {
    /// 顶点到关联表的映射（按首次出现顺序）
    lists: IndexMap<VertexId, IncidenceList>,
}

impl AdjacencyIndex {
    /// 创建新索引
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一个边槽位
    ///
    /// a 的表中追加 (b, w, id)，b 的表中追加 (a, w, id)。
    /// 自环会在同一张表中出现两次，因此贡献 2 个度。
    pub fn insert(&mut self, edge: EdgeId, a: VertexId, b: VertexId, weight: Weight, slot: SlotId) {
        self.lists.entry(a).or_default().push(Incidence {
            neighbor: b,
            weight,
            edge,
            slot,
        });
        self.lists.entry(b).or_default().push(Incidence {
            neighbor: a,
            weight,
            edge,
            slot,
        });
    }

    /// 获取顶点的关联表
    pub fn incidences(&self, vertex: VertexId) -> &[Incidence] {
        self.lists
            .get(&vertex)
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    /// 顶点的度（关联表项数）
    pub fn degree(&self, vertex: VertexId) -> usize {
        self.lists.get(&vertex).map(|list| list.len()).unwrap_or(0)
    }

    /// 顶点是否已登记
    pub fn contains(&self, vertex: VertexId) -> bool {
        self.lists.contains_key(&vertex)
    }

    /// 按首次出现顺序遍历顶点
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.lists.keys().copied()
    }

    /// 顶点数量
    pub fn vertex_count(&self) -> usize {
        self.lists.len()
    }
}
