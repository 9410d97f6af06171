//! AI 落子策略模块：随机、启发式、Minimax（Alpha-Beta 剪枝）。

pub mod heuristic;
pub mod minimax;

pub use heuristic::{heuristic_move, random_move};
pub use minimax::{
    get_ai_move, minimax_root, AiAgent, AiConfig, AiDecision, AiDifficulty, AiStrategy,
    SearchOutcome,
};
