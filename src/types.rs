//! 通用类型定义

use crate::graph::VertexId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 边权重（有限的非负实数）
pub type Weight = f64;

/// 不可达距离
pub const UNREACHABLE: Weight = f64::INFINITY;

/// 边槽位 ID
///
/// 原始边和它的每一条复制边各占一个槽位。复制边与原始边共享 `EdgeId`，
/// 但槽位不同，欧拉回路按槽位而不是按边 ID 消耗。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotId(pub usize);

impl SlotId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 匹配中的一对奇度顶点（无序，规范化为 first < second）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MatchedPair {
    pub first: VertexId,
    pub second: VertexId,
}

impl MatchedPair {
    pub fn new(u: VertexId, v: VertexId) -> Self {
        if u <= v {
            Self { first: u, second: v }
        } else {
            Self { first: v, second: u }
        }
    }

    pub fn contains(&self, v: VertexId) -> bool {
        self.first == v || self.second == v
    }
}
