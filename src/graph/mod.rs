//! 图核心模块
//!
//! 定义顶点、边、邻接索引和多重图

mod edge;
mod graph;
mod index;
mod vertex;

pub use edge::{Edge, EdgeId};
pub use graph::{EdgeSlot, Graph};
pub use index::{AdjacencyIndex, Incidence};
pub use vertex::VertexId;
