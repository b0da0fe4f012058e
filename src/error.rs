//! 错误类型定义

use crate::graph::{EdgeId, VertexId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("边 ID 重复: {0}")]
    DuplicateEdge(EdgeId),

    #[error("边 {edge} 的权重无效: {weight}（必须为有限的非负数）")]
    InvalidWeight { edge: EdgeId, weight: f64 },

    #[error("边 {0} 是零权重自环")]
    ZeroWeightLoop(EdgeId),

    #[error("边权重之和溢出: {total}")]
    WeightOverflow { total: f64 },

    #[error("顶点不存在: {0}")]
    VertexNotFound(VertexId),

    #[error("边不存在: {0}")]
    EdgeNotFound(EdgeId),

    #[error("图不连通: 顶点 {from} 无法到达顶点 {to}")]
    Disconnected { from: VertexId, to: VertexId },

    #[error("奇度顶点过多: {count} 个（上限 {limit}）")]
    TooManyOddVertices { count: usize, limit: usize },

    #[error("内部不变量被破坏: {0}")]
    InvariantViolation(String),

    #[error("配置错误: {0}")]
    ConfigError(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::ConfigError(e.to_string())
    }
}
