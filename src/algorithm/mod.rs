//! 图算法模块
//!
//! 包含全源最短路径、最小权完美匹配、增广、欧拉回路和邮递员求解

mod augment;
mod euler;
mod matching;
mod postman;
mod shortest_path;

pub use augment::{Augmentation, Augmenter};
pub use euler::{CircuitBuilder, EulerCircuit};
pub use matching::{
    branch_and_bound, subset_dp, CostMatrix, Matching, MinWeightMatcher, Pairings,
    SUBSET_DP_HARD_LIMIT,
};
pub use postman::{solve, PostmanSolver, PostmanTour};
pub use shortest_path::{DistanceTable, PathResult};
