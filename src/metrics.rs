//! 求解指标
//!
//! 每次求解独立收集各阶段耗时和规模，不保留全局状态

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// 阶段计时器
pub struct StageTimer {
    start: Instant,
}

impl StageTimer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// 已耗时（微秒）
    pub fn elapsed_us(&self) -> u64 {
        self.elapsed().as_micros() as u64
    }
}

/// 各阶段耗时（微秒）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageTimings {
    pub degree_us: u64,
    pub shortest_path_us: u64,
    pub matching_us: u64,
    pub augment_us: u64,
    pub circuit_us: u64,
    pub total_us: u64,
}

/// 单次求解的统计快照
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveStats {
    /// 顶点数
    pub vertices: usize,
    /// 原始边数
    pub edges: usize,
    /// 奇度顶点数
    pub odd_vertices: usize,
    /// 复制边数
    pub duplicated_edges: usize,
    /// 回路长度（边数）
    pub circuit_length: usize,
    /// 阶段耗时
    pub timings: StageTimings,
}

impl SolveStats {
    /// 导出为 Prometheus 文本格式
    pub fn to_prometheus(&self) -> String {
        let gauges: [(&str, &str, u64); 11] = [
            ("postgraph_vertices", "Vertices in the input graph", self.vertices as u64),
            ("postgraph_edges", "Original edges in the input graph", self.edges as u64),
            ("postgraph_odd_vertices", "Odd-degree vertices before augmentation", self.odd_vertices as u64),
            ("postgraph_duplicated_edges", "Edges duplicated by augmentation", self.duplicated_edges as u64),
            ("postgraph_circuit_length", "Edges in the Eulerian circuit", self.circuit_length as u64),
            ("postgraph_degree_us", "Degree analysis time in microseconds", self.timings.degree_us),
            ("postgraph_shortest_path_us", "All-pairs shortest path time in microseconds", self.timings.shortest_path_us),
            ("postgraph_matching_us", "Matching time in microseconds", self.timings.matching_us),
            ("postgraph_augment_us", "Augmentation time in microseconds", self.timings.augment_us),
            ("postgraph_circuit_us", "Circuit construction time in microseconds", self.timings.circuit_us),
            ("postgraph_total_us", "Total solve time in microseconds", self.timings.total_us),
        ];

        let mut content = String::new();
        for (name, help, value) in gauges {
            content.push_str(&format!("# HELP {} {}\n", name, help));
            content.push_str(&format!("# TYPE {} gauge\n", name));
            content.push_str(&format!("{} {}\n", name, value));
        }
        content
    }
}
