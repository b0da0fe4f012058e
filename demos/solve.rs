//! PostGraph 演示脚本
//!
//! 构造几个小图并求邮递员回路。日志级别由 RUST_LOG 控制，默认 info。

use postgraph::{Error, Graph, MatchingStrategy, PostmanSolver, SolverConfig, VertexId};
use tracing_subscriber::EnvFilter;

fn print_tour(name: &str, graph: Graph, start: u64, config: SolverConfig) {
    println!("{}", name);
    println!(
        "   图大小: {} 顶点, {} 边, 奇度顶点 {:?}",
        graph.vertex_count(),
        graph.edge_count(),
        graph.odd_vertices()
    );

    let solver = PostmanSolver::new(graph).with_config(config);
    match solver.solve(VertexId(start)) {
        Ok(tour) => {
            println!(
                "   总代价: {} (原始 {} + 复制 {})",
                tour.total_cost, tour.base_cost, tour.matching_cost
            );
            for pair in &tour.matching.pairs {
                println!("   匹配: {} - {}", pair.first, pair.second);
            }
            let edges: Vec<String> = tour.edges.iter().map(|e| e.to_string()).collect();
            let vertices: Vec<String> = tour.vertices.iter().map(|v| v.to_string()).collect();
            println!("   边序列: {}", edges.join(" → "));
            println!("   顶点序列: {}", vertices.join(" → "));
        }
        Err(Error::Disconnected { from, to }) => {
            println!("   无解: 顶点 {} 与 {} 不连通", from, to);
        }
        Err(e) => println!("   求解失败: {}", e),
    }
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("PostGraph 演示 v{}", postgraph::VERSION);
    println!("================\n");

    // 已是欧拉图的正方形
    let square = Graph::from_edges([(1, 1, 2, 1.0), (2, 2, 3, 1.0), (3, 3, 4, 1.0), (4, 4, 1, 1.0)])?;
    print_tour("1. 正方形回路", square, 1, SolverConfig::default());

    // 路径图：两端奇度，需要整条复制
    let path = Graph::from_edges([(1, 1, 2, 1.0), (2, 2, 3, 1.0)])?;
    print_tour("2. 路径 1-2-3", path, 1, SolverConfig::default());

    // 两条不相交的边
    let split = Graph::from_edges([(1, 1, 2, 1.0), (2, 3, 4, 1.0)])?;
    print_tour("3. 不连通图", split, 1, SolverConfig::default());

    // 带平行边和自环的多重图，用分支定界匹配
    let multi = Graph::from_edges([
        (1, 1, 2, 4.0),
        (2, 1, 2, 1.0),
        (3, 2, 3, 2.0),
        (4, 3, 3, 0.5),
        (5, 3, 4, 3.0),
        (6, 4, 1, 2.0),
        (7, 2, 4, 5.0),
        (8, 4, 5, 1.0),
    ])?;
    let config = SolverConfig::default().with_matching(MatchingStrategy::BranchAndBound);
    print_tour("4. 多重图（分支定界）", multi, 2, config);

    println!("演示完成!");
    Ok(())
}
