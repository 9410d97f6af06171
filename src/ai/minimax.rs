use std::str::FromStr;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::heuristic::{heuristic_move, random_move};
use crate::game::{Board, Player};
use crate::utils::Stopwatch;

/// 终局分值基数：赢 `WIN_SCORE - depth`，输 `depth - WIN_SCORE`。
const WIN_SCORE: i32 = 10;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AiDifficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl AiDifficulty {
    /// 无法识别的难度回退到随机策略（easy）。
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }
}

impl FromStr for AiDifficulty {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(AiDifficulty::Easy),
            "medium" | "normal" => Ok(AiDifficulty::Medium),
            "hard" => Ok(AiDifficulty::Hard),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AiStrategy {
    Random,
    Heuristic,
    Minimax,
}

impl FromStr for AiStrategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(AiStrategy::Random),
            "heuristic" => Ok(AiStrategy::Heuristic),
            "minimax" => Ok(AiStrategy::Minimax),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AiConfig {
    pub difficulty: AiDifficulty,
    pub strategy: AiStrategy,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: AiDifficulty) -> Self {
        let strategy = match difficulty {
            AiDifficulty::Easy => AiStrategy::Random,
            AiDifficulty::Medium => AiStrategy::Heuristic,
            AiDifficulty::Hard => AiStrategy::Minimax,
        };
        Self {
            difficulty,
            strategy,
        }
    }

    pub fn with_strategy(mut self, strategy: AiStrategy) -> Self {
        self.strategy = strategy;
        self
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig::from_difficulty(AiDifficulty::default())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AiDecision {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// 仅 minimax 策略给出根节点评分。
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<i32>,
    pub nodes: u64,
    pub duration_ms: u64,
    pub strategy: AiStrategy,
}

/// 根节点搜索结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub index: usize,
    pub score: i32,
    pub nodes: u64,
}

/// 一次根搜索共享的上下文：AI 所执子与已访问节点数。
struct SearchContext {
    ai_player: Player,
    nodes: u64,
}

impl SearchContext {
    fn new(ai_player: Player) -> Self {
        Self {
            ai_player,
            nodes: 0,
        }
    }

    fn minimax(
        &mut self,
        board: &Board,
        maximizing: bool,
        depth: i32,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.nodes += 1;

        if let Some(winner) = board.check_winner().winner {
            return if winner == self.ai_player {
                WIN_SCORE - depth
            } else {
                depth - WIN_SCORE
            };
        }
        if board.check_draw() {
            return 0;
        }

        if maximizing {
            let mut value = i32::MIN;
            for index in board.available_moves() {
                let child = board.apply_move(index, self.ai_player);
                let score = self.minimax(&child, false, depth + 1, alpha, beta);
                value = value.max(score);
                alpha = alpha.max(score);
                if beta <= alpha {
                    break;
                }
            }
            value
        } else {
            let opponent = self.ai_player.toggle();
            let mut value = i32::MAX;
            for index in board.available_moves() {
                let child = board.apply_move(index, opponent);
                let score = self.minimax(&child, true, depth + 1, alpha, beta);
                value = value.min(score);
                beta = beta.min(score);
                if beta <= alpha {
                    break;
                }
            }
            value
        }
    }
}

/// 按难度分派到三种策略之一；棋盘已满时返回 `None`。
pub fn get_ai_move<R: Rng + ?Sized>(
    board: &Board,
    ai_player: Player,
    difficulty: AiDifficulty,
    rng: &mut R,
) -> Option<usize> {
    match difficulty {
        AiDifficulty::Easy => random_move(board, rng),
        AiDifficulty::Medium => heuristic_move(board, ai_player, rng),
        AiDifficulty::Hard => minimax_root(board, ai_player).map(|outcome| outcome.index),
    }
}

/// 升序遍历根节点，仅在严格更优时替换，平分时保留索引最小的着法。
pub fn minimax_root(board: &Board, ai_player: Player) -> Option<SearchOutcome> {
    let mut ctx = SearchContext::new(ai_player);
    let mut best: Option<(usize, i32)> = None;

    for index in board.available_moves() {
        let child = board.apply_move(index, ai_player);
        let score = ctx.minimax(&child, false, 1, i32::MIN, i32::MAX);
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
    }

    best.map(|(index, score)| SearchOutcome {
        index,
        score,
        nodes: ctx.nodes,
    })
}

pub struct AiAgent {
    config: AiConfig,
    rng: SmallRng,
}

impl AiAgent {
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            rng: SmallRng::from_entropy(),
        }
    }

    pub fn with_seed(config: AiConfig, seed: u64) -> Self {
        Self {
            config,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn decide_move(&mut self, board: &Board, ai_player: Player) -> AiDecision {
        let start = Stopwatch::start();
        let strategy = self.config.strategy;

        let (index, evaluation, nodes) = match strategy {
            AiStrategy::Random => (random_move(board, &mut self.rng), None, 0),
            AiStrategy::Heuristic => (heuristic_move(board, ai_player, &mut self.rng), None, 0),
            AiStrategy::Minimax => match minimax_root(board, ai_player) {
                Some(outcome) => (Some(outcome.index), Some(outcome.score), outcome.nodes),
                None => (None, None, 0),
            },
        };

        AiDecision {
            index,
            evaluation,
            nodes,
            duration_ms: start.elapsed_ms(),
            strategy,
        }
    }
}
