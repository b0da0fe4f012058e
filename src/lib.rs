//! PostGraph - 中国邮递员（路线巡检）求解器
//!
//! 在带权无向多重图上求从指定起点出发、经过每条边至少一次的最短闭合回路：
//! - 多重图存储，平行边和自环各自保留
//! - Floyd–Warshall 全源最短路径
//! - 精确最小权完美匹配（子集动态规划 / 分支定界）
//! - Hierholzer 欧拉回路构造，结果可复现

pub mod algorithm;
pub mod config;
pub mod error;
pub mod graph;
pub mod metrics;
pub mod types;

// 重导出常用类型
pub use algorithm::{solve, EulerCircuit, Matching, PostmanSolver, PostmanTour};
pub use config::{MatchingStrategy, SolverConfig};
pub use error::{Error, Result};
pub use graph::{Edge, EdgeId, Graph, VertexId};
pub use metrics::SolveStats;
pub use types::{MatchedPair, SlotId, Weight, UNREACHABLE};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
