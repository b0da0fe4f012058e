//! 最小权完美匹配
//!
//! 在奇度顶点集合上求全局最优的两两配对，权重为最短路径距离。
//! 两种精确算法：
//! - 分支定界：在惰性配对生成器 [`Pairings`] 上不断收紧上界
//! - 子集动态规划：O(2^n · n)，适合奇度顶点较少的情况

use super::shortest_path::DistanceTable;
use crate::config::MatchingStrategy;
use crate::error::{Error, Result};
use crate::graph::VertexId;
use crate::types::{MatchedPair, Weight, UNREACHABLE};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// 子集动态规划允许的最大顶点数
///
/// 动态规划表和回溯表各有 2^n 项，每项约 11 字节：n = 22 时约 46 MB，
/// 每多两个顶点内存翻四倍。
pub const SUBSET_DP_HARD_LIMIT: usize = 22;

/// 匹配结果
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Matching {
    /// 配对（规范化并升序）
    pub pairs: Vec<MatchedPair>,
    /// 配对距离之和
    pub total_cost: Weight,
}

impl Matching {
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

/// 对称代价矩阵
#[derive(Debug, Clone)]
pub struct CostMatrix {
    n: usize,
    costs: Vec<Weight>,
}

impl CostMatrix {
    /// 用函数填充矩阵，只调用 i < j 的部分
    pub fn from_fn<F>(n: usize, mut cost: F) -> Self
    where
        F: FnMut(usize, usize) -> Weight,
    {
        let mut costs = vec![UNREACHABLE; n * n];
        for i in 0..n {
            costs[i * n + i] = 0.0;
            for j in (i + 1)..n {
                let c = cost(i, j);
                costs[i * n + j] = c;
                costs[j * n + i] = c;
            }
        }
        Self { n, costs }
    }

    /// 从距离表构建
    pub fn from_distances(vertices: &[VertexId], table: &DistanceTable) -> Self {
        Self::from_fn(vertices.len(), |i, j| table.distance(vertices[i], vertices[j]))
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn get(&self, i: usize, j: usize) -> Weight {
        self.costs[i * self.n + j]
    }
}

/// 配对搜索栈帧
#[derive(Debug, Clone)]
struct Frame {
    /// 本层要配对的顶点（当前编号最小的未匹配顶点）
    first: usize,
    /// 下一个待尝试的候选在 `order[first]` 中的位置
    cursor: usize,
    /// 当前选中的伙伴
    chosen: Option<usize>,
    /// 本层选择之前的累计代价
    base: Weight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchState {
    Fresh,
    Running,
    Done,
}

/// 惰性完美匹配生成器
///
/// 用显式栈枚举 `0..n` 的所有完美匹配，每次 `next` 产出一个
/// (配对列表, 总代价)。代价为无穷的配对不会被选择；部分代价已达到
/// 上界的分支会被剪掉，因此收紧上界后只会产出严格更优的匹配。
/// 候选伙伴按代价升序尝试，好的解会较早出现。
pub struct Pairings<'a> {
    costs: &'a CostMatrix,
    /// 每个顶点的候选伙伴（按代价升序，代价相同按编号）
    order: Vec<Vec<usize>>,
    matched: Vec<bool>,
    frames: Vec<Frame>,
    pairs: Vec<(usize, usize)>,
    bound: Weight,
    state: SearchState,
}

impl<'a> Pairings<'a> {
    /// 创建生成器（不设上界）
    pub fn new(costs: &'a CostMatrix) -> Self {
        let n = costs.len();
        let order = (0..n)
            .map(|i| {
                let mut partners: Vec<usize> = (0..n)
                    .filter(|&j| j != i && costs.get(i, j) < UNREACHABLE)
                    .collect();
                partners.sort_by(|&a, &b| costs.get(i, a).total_cmp(&costs.get(i, b)).then(a.cmp(&b)));
                partners
            })
            .collect();

        Self {
            costs,
            order,
            matched: vec![false; n],
            frames: Vec::with_capacity(n / 2),
            pairs: Vec::with_capacity(n / 2),
            bound: UNREACHABLE,
            state: SearchState::Fresh,
        }
    }

    /// 设置初始上界
    pub fn with_bound(mut self, bound: Weight) -> Self {
        self.bound = bound;
        self
    }

    /// 收紧上界（只降不升）
    pub fn tighten(&mut self, bound: Weight) {
        if bound < self.bound {
            self.bound = bound;
        }
    }

    /// 当前上界
    pub fn bound(&self) -> Weight {
        self.bound
    }

    /// 从头重新枚举（保留当前上界）
    pub fn restart(&mut self) {
        self.matched.iter_mut().for_each(|m| *m = false);
        self.frames.clear();
        self.pairs.clear();
        self.state = SearchState::Fresh;
    }

    fn first_unmatched(&self) -> Option<usize> {
        self.matched.iter().position(|&m| !m)
    }

    fn push_frame(&mut self, first: usize, base: Weight) {
        self.matched[first] = true;
        self.frames.push(Frame {
            first,
            cursor: 0,
            chosen: None,
            base,
        });
    }
}

impl Iterator for Pairings<'_> {
    type Item = (Vec<(usize, usize)>, Weight);

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            SearchState::Done => return None,
            SearchState::Fresh => {
                self.state = SearchState::Running;
                match self.first_unmatched() {
                    Some(first) => self.push_frame(first, 0.0),
                    None => {
                        // 空集合只有一个（空）匹配
                        self.state = SearchState::Done;
                        return (0.0 < self.bound).then(|| (Vec::new(), 0.0));
                    }
                }
            }
            SearchState::Running => {}
        }

        loop {
            let Some(depth) = self.frames.len().checked_sub(1) else {
                self.state = SearchState::Done;
                return None;
            };
            let first = self.frames[depth].first;
            let base = self.frames[depth].base;

            // 撤销本层上一次的选择
            if let Some(partner) = self.frames[depth].chosen.take() {
                self.matched[partner] = false;
                self.pairs.pop();
            }

            let mut found = None;
            let mut cursor = self.frames[depth].cursor;
            while let Some(&partner) = self.order[first].get(cursor) {
                cursor += 1;
                if self.matched[partner] {
                    continue;
                }
                let cost = base + self.costs.get(first, partner);
                if cost < self.bound {
                    found = Some((partner, cost));
                } else {
                    // 候选按代价升序，其余候选同样超出上界
                    cursor = self.order[first].len();
                }
                break;
            }
            self.frames[depth].cursor = cursor;

            match found {
                Some((partner, cost)) => {
                    self.frames[depth].chosen = Some(partner);
                    self.matched[partner] = true;
                    // first 是编号最小的未匹配顶点，必然小于 partner
                    self.pairs.push((first, partner));

                    match self.first_unmatched() {
                        Some(next_first) => self.push_frame(next_first, cost),
                        None => return Some((self.pairs.clone(), cost)),
                    }
                }
                None => {
                    self.matched[first] = false;
                    self.frames.pop();
                }
            }
        }
    }
}

/// 分支定界求最小权完美匹配
pub fn branch_and_bound(costs: &CostMatrix) -> Option<(Vec<(usize, usize)>, Weight)> {
    let mut search = Pairings::new(costs);
    let mut best = None;
    while let Some((pairs, cost)) = search.next() {
        search.tighten(cost);
        best = Some((pairs, cost));
    }
    best
}

/// 子集动态规划求最小权完美匹配
///
/// 状态为已匹配顶点集合，每步把编号最小的未匹配顶点与另一个未匹配顶点配对。
pub fn subset_dp(costs: &CostMatrix) -> Option<(Vec<(usize, usize)>, Weight)> {
    let n = costs.len();
    if n % 2 == 1 || n > SUBSET_DP_HARD_LIMIT {
        return None;
    }
    if n == 0 {
        return Some((Vec::new(), 0.0));
    }

    let full = (1usize << n) - 1;
    let mut dp = vec![UNREACHABLE; full + 1];
    let mut choice: Vec<Option<(u8, u8)>> = vec![None; full + 1];
    dp[0] = 0.0;

    for mask in 0..full {
        let current = dp[mask];
        if current == UNREACHABLE {
            continue;
        }
        let i = (!mask).trailing_zeros() as usize;
        for j in (i + 1)..n {
            if mask & (1 << j) != 0 {
                continue;
            }
            let c = costs.get(i, j);
            if c == UNREACHABLE {
                continue;
            }
            let next = mask | (1 << i) | (1 << j);
            let candidate = current + c;
            if candidate < dp[next] {
                dp[next] = candidate;
                choice[next] = Some((i as u8, j as u8));
            }
        }
    }

    if dp[full] == UNREACHABLE {
        return None;
    }

    let mut pairs = Vec::with_capacity(n / 2);
    let mut mask = full;
    while mask != 0 {
        let (i, j) = choice[mask]?;
        pairs.push((i as usize, j as usize));
        mask &= !((1 << i) | (1 << j));
    }
    pairs.sort_unstable();

    Some((pairs, dp[full]))
}

/// 最小权完美匹配器
#[derive(Debug, Clone)]
pub struct MinWeightMatcher {
    strategy: MatchingStrategy,
    subset_dp_limit: usize,
}

impl Default for MinWeightMatcher {
    fn default() -> Self {
        Self::new(MatchingStrategy::Auto)
    }
}

impl MinWeightMatcher {
    /// 创建匹配器
    pub fn new(strategy: MatchingStrategy) -> Self {
        Self {
            strategy,
            subset_dp_limit: 20,
        }
    }

    /// 设置 Auto 策略下使用子集动态规划的顶点数上限
    pub fn with_subset_dp_limit(mut self, limit: usize) -> Self {
        self.subset_dp_limit = limit.min(SUBSET_DP_HARD_LIMIT);
        self
    }

    /// 实际使用的策略
    fn resolve(&self, n: usize) -> MatchingStrategy {
        match self.strategy {
            MatchingStrategy::Auto if n <= self.subset_dp_limit => MatchingStrategy::SubsetDp,
            MatchingStrategy::Auto => MatchingStrategy::BranchAndBound,
            MatchingStrategy::SubsetDp if n > SUBSET_DP_HARD_LIMIT => {
                warn!(odd = n, limit = SUBSET_DP_HARD_LIMIT, "子集动态规划规模超限，改用分支定界");
                MatchingStrategy::BranchAndBound
            }
            other => other,
        }
    }

    /// 在给定顶点集合上求最小权完美匹配
    pub fn find(&self, vertices: &[VertexId], table: &DistanceTable) -> Result<Matching> {
        let n = vertices.len();
        if n % 2 == 1 {
            return Err(Error::InvariantViolation(format!(
                "奇度顶点个数为奇数: {}",
                n
            )));
        }
        if n == 0 {
            return Ok(Matching::default());
        }

        let costs = CostMatrix::from_distances(vertices, table);
        let strategy = self.resolve(n);
        debug!(odd = n, ?strategy, "开始最小权完美匹配");

        let solved = match strategy {
            MatchingStrategy::SubsetDp => subset_dp(&costs),
            _ => branch_and_bound(&costs),
        };

        let Some((index_pairs, total_cost)) = solved else {
            return Err(first_unreachable(vertices, &costs));
        };

        let mut pairs: Vec<MatchedPair> = index_pairs
            .into_iter()
            .map(|(i, j)| MatchedPair::new(vertices[i], vertices[j]))
            .collect();
        pairs.sort_unstable();

        debug!(pairs = pairs.len(), cost = total_cost, "匹配完成");
        Ok(Matching { pairs, total_cost })
    }
}

/// 找出第一对不可达的顶点，用于报告不连通
fn first_unreachable(vertices: &[VertexId], costs: &CostMatrix) -> Error {
    for i in 0..costs.len() {
        for j in (i + 1)..costs.len() {
            if costs.get(i, j) == UNREACHABLE {
                return Error::Disconnected {
                    from: vertices[i],
                    to: vertices[j],
                };
            }
        }
    }
    Error::InvariantViolation("连通的奇度顶点集合找不到完美匹配".to_string())
}
