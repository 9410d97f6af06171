//! 低级（随机）与中级（启发式）落子策略。

use rand::seq::SliceRandom;
use rand::Rng;

use crate::game::{Board, Player, CENTER, CORNERS};

/// 在所有空位中均匀随机选择。
pub fn random_move<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Option<usize> {
    board.available_moves().choose(rng).copied()
}

/// 固定优先级：赢棋 > 阻挡 > 中心 > 角 > 边。
pub fn heuristic_move<R: Rng + ?Sized>(
    board: &Board,
    ai_player: Player,
    rng: &mut R,
) -> Option<usize> {
    let opponent = ai_player.toggle();
    let available = board.available_moves();
    if available.is_empty() {
        return None;
    }

    if let Some(index) = completing_move(board, &available, ai_player) {
        return Some(index);
    }
    if let Some(index) = completing_move(board, &available, opponent) {
        return Some(index);
    }
    if available.contains(&CENTER) {
        return Some(CENTER);
    }

    let corners: Vec<usize> = CORNERS
        .iter()
        .copied()
        .filter(|corner| available.contains(corner))
        .collect();
    if let Some(corner) = corners.choose(rng) {
        return Some(*corner);
    }

    available.choose(rng).copied()
}

/// 升序扫描，返回第一个能让 `player` 立即获胜的空位。
fn completing_move(board: &Board, available: &[usize], player: Player) -> Option<usize> {
    available
        .iter()
        .copied()
        .find(|&index| board.apply_move(index, player).check_winner().winner == Some(player))
}
