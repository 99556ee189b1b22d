// ==========================================
// 门店排班填充系统 - 最小费用最大流
// ==========================================
// 算法: 连续最短路 (SSP) + Johnson 顶点位势
// 表示: 邻接表 + 孪生反向边索引，O(1) 回退
// ==========================================

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// 距离哨兵值，留出加法余量
pub const INF: i64 = i64::MAX / 2;

// ==========================================
// FlowEdge - 残量图中的一条边
// ==========================================

/// 残量图中的一条边
///
/// 每条正向边与其孪生反向边（初始容量 0、费用取负）成对存储，
/// twin 指向孪生边在目标顶点邻接表中的下标
#[derive(Debug, Clone)]
pub struct FlowEdge {
    /// 目标顶点
    pub to: usize,
    /// 孪生边在 to 的邻接表中的下标
    pub twin: usize,
    /// 剩余容量
    pub capacity: i64,
    /// 单位流量费用
    pub cost: i64,
}

// ==========================================
// FlowGraph - 残量图
// ==========================================

#[derive(Debug, Clone)]
pub struct FlowGraph {
    adjacency: Vec<Vec<FlowEdge>>,
}

impl FlowGraph {
    /// 创建 node_count 个顶点的空图
    pub fn new(node_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); node_count],
        }
    }

    /// 顶点数
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// 顶点的出边（含反向边）
    pub fn edges(&self, node: usize) -> &[FlowEdge] {
        &self.adjacency[node]
    }

    /// 添加正向边及其容量 0 的孪生反向边
    pub fn add_edge(&mut self, from: usize, to: usize, capacity: i64, cost: i64) {
        let twin_in_to = self.adjacency[to].len();
        let twin_in_from = self.adjacency[from].len();
        self.adjacency[from].push(FlowEdge {
            to,
            twin: twin_in_to,
            capacity,
            cost,
        });
        self.adjacency[to].push(FlowEdge {
            to: from,
            twin: twin_in_from,
            capacity: 0,
            cost: -cost,
        });
    }

    /// 求 source 到 sink 的最小费用最大流
    ///
    /// 初始费用全部非负，位势从 0 起步；此后每轮以约减费用
    /// `cost + h[u] - h[v]` 跑 Dijkstra，约减费用恒非负，
    /// 这使得 Dijkstra 在含负费用反向边的残量图上依然成立。
    /// 堆键为 (距离, 顶点)，等距路径的选取在单次运行内确定。
    ///
    /// # 返回
    /// (总流量, 总费用)；不可行不是错误，流量可以为 0
    pub fn min_cost_max_flow(&mut self, source: usize, sink: usize) -> (i64, i64) {
        let n = self.node_count();
        let mut potential = vec![0i64; n];
        let mut total_flow = 0i64;
        let mut total_cost = 0i64;

        loop {
            // Dijkstra: 约减费用下的最短路
            let mut distance = vec![INF; n];
            let mut prev_node = vec![usize::MAX; n];
            let mut prev_edge = vec![usize::MAX; n];
            distance[source] = 0;

            let mut queue: BinaryHeap<Reverse<(i64, usize)>> = BinaryHeap::new();
            queue.push(Reverse((0, source)));

            while let Some(Reverse((current_distance, u))) = queue.pop() {
                if current_distance > distance[u] {
                    continue;
                }

                for (edge_index, edge) in self.adjacency[u].iter().enumerate() {
                    if edge.capacity <= 0 {
                        continue;
                    }

                    let v = edge.to;
                    let candidate =
                        current_distance + edge.cost + potential[u] - potential[v];

                    if candidate < distance[v] {
                        distance[v] = candidate;
                        prev_node[v] = u;
                        prev_edge[v] = edge_index;
                        queue.push(Reverse((candidate, v)));
                    }
                }
            }

            // 汇点不可达，增广结束
            if distance[sink] >= INF {
                break;
            }

            // 更新位势，保持约减费用非负
            for v in 0..n {
                if distance[v] < INF {
                    potential[v] += distance[v];
                }
            }

            // 沿前驱链找瓶颈容量
            let mut bottleneck = INF;
            let mut v = sink;
            while v != source {
                let edge = &self.adjacency[prev_node[v]][prev_edge[v]];
                bottleneck = bottleneck.min(edge.capacity);
                v = prev_node[v];
            }

            // 推流: 正向边减容量，孪生边加容量，费用按边累计
            let mut v = sink;
            while v != source {
                let u = prev_node[v];
                let edge_index = prev_edge[v];
                let (twin, cost) = {
                    let edge = &self.adjacency[u][edge_index];
                    (edge.twin, edge.cost)
                };
                self.adjacency[u][edge_index].capacity -= bottleneck;
                self.adjacency[v][twin].capacity += bottleneck;
                total_cost += bottleneck * cost;
                v = u;
            }

            total_flow += bottleneck;
        }

        (total_flow, total_cost)
    }
}
