//! 边定义
//!
//! 无向带权边：两个端点、一个非负权重和一个在整个求解过程中稳定的 ID

use crate::error::{Error, Result};
use crate::graph::vertex::VertexId;
use crate::types::Weight;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 边 ID（同一张图内唯一）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

impl EdgeId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for EdgeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 无向边
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// 边 ID
    id: EdgeId,
    /// 端点 a
    a: VertexId,
    /// 端点 b
    b: VertexId,
    /// 权重
    weight: Weight,
}

impl Edge {
    /// 创建新边，权重必须是有限的非负数；自环的权重必须为正
    pub fn new(id: EdgeId, a: VertexId, b: VertexId, weight: Weight) -> Result<Self> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::InvalidWeight { edge: id, weight });
        }
        if a == b && weight == 0.0 {
            return Err(Error::ZeroWeightLoop(id));
        }
        Ok(Self { id, a, b, weight })
    }

    /// 获取边 ID
    pub fn id(&self) -> EdgeId {
        self.id
    }

    /// 获取两个端点
    pub fn endpoints(&self) -> (VertexId, VertexId) {
        (self.a, self.b)
    }

    /// 获取权重
    pub fn weight(&self) -> Weight {
        self.weight
    }

    /// 是否为自环
    pub fn is_loop(&self) -> bool {
        self.a == self.b
    }

    /// 给定一个端点，返回另一个端点
    pub fn other(&self, v: VertexId) -> Option<VertexId> {
        if v == self.a {
            Some(self.b)
        } else if v == self.b {
            Some(self.a)
        } else {
            None
        }
    }

    /// 是否连接 u 和 v（不区分方向）
    pub fn connects(&self, u: VertexId, v: VertexId) -> bool {
        (self.a == u && self.b == v) || (self.a == v && self.b == u)
    }
}
