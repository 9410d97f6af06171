use serde::{Deserialize, Serialize};

use super::{
    board::{Player, WinPattern, BOARD_SIZE},
    state::{GameEvent, GameState, GameStatus, IntegrityError},
};
use crate::ai::{AiAgent, AiDecision};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoveAction {
    pub player: Player,
    pub index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum RuleError {
    GameFinished,
    NotPlayerTurn { expected: Player, actual: Player },
    IndexOutOfRange { index: i64 },
    CellOccupied { index: usize },
    NoAvailableMoves,
    NotAiTurn,
    InvalidPlayer { value: String },
    IntegrityViolation { error: IntegrityError },
}

/// 终局信息，供前端高亮获胜连线。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Outcome {
    pub status: GameStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Player>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<WinPattern>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveResolution {
    pub state: GameState,
    pub events: Vec<GameEvent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

impl MoveResolution {
    pub fn new(state: GameState, events: Vec<GameEvent>) -> Self {
        let outcome = state.is_finished().then(|| Outcome {
            status: state.status,
            winner: state.winner,
            line: state.winning_line,
        });
        Self {
            state,
            events,
            outcome,
        }
    }
}

/// 会话层落子规则：先校验，再通过不可变棋盘落子并结算。
pub struct RuleEngine;

impl RuleEngine {
    fn ensure_playing(state: &GameState) -> Result<(), RuleError> {
        if state.is_finished() {
            return Err(RuleError::GameFinished);
        }
        Ok(())
    }

    fn ensure_turn_owner(state: &GameState, player: Player) -> Result<(), RuleError> {
        if state.current_player != player {
            return Err(RuleError::NotPlayerTurn {
                expected: state.current_player,
                actual: player,
            });
        }
        Ok(())
    }

    fn ensure_cell_free(state: &GameState, index: usize) -> Result<(), RuleError> {
        if index >= BOARD_SIZE {
            return Err(RuleError::IndexOutOfRange {
                index: index as i64,
            });
        }
        if !state.board.is_valid_move(index) {
            return Err(RuleError::CellOccupied { index });
        }
        Ok(())
    }

    /// 人机模式且轮到 AI 时才允许由 AI 落子。
    pub fn ensure_ai_turn(state: &GameState) -> Result<(), RuleError> {
        Self::ensure_playing(state)?;
        if !state.is_ai_turn() {
            return Err(RuleError::NotAiTurn);
        }
        Ok(())
    }

    /// 前端传入的索引可能为负数。
    pub fn checked_index(index: i64) -> Result<usize, RuleError> {
        usize::try_from(index)
            .ok()
            .filter(|index| *index < BOARD_SIZE)
            .ok_or(RuleError::IndexOutOfRange { index })
    }

    pub fn ensure_integrity(state: &GameState) -> Result<(), RuleError> {
        state
            .integrity_check()
            .map_err(|error| RuleError::IntegrityViolation { error })
    }

    pub fn play_move(
        state: &mut GameState,
        action: MoveAction,
    ) -> Result<Vec<GameEvent>, RuleError> {
        Self::ensure_playing(state)?;
        Self::ensure_turn_owner(state, action.player)?;
        Self::ensure_cell_free(state, action.index)?;

        state.board = state.board.apply_move(action.index, action.player);
        let mut events = vec![GameEvent::MovePlayed {
            player: action.player,
            index: action.index,
        }];
        state.record_event(events[0].clone());
        events.extend(state.settle());
        Ok(events)
    }

    /// 由 AI 替当前玩家落子。
    pub fn ai_move(
        state: &mut GameState,
        agent: &mut AiAgent,
    ) -> Result<(AiDecision, Vec<GameEvent>), RuleError> {
        Self::ensure_playing(state)?;
        let player = state.current_player;
        let decision = agent.decide_move(&state.board, player);
        let index = decision.index.ok_or(RuleError::NoAvailableMoves)?;
        let events = Self::play_move(state, MoveAction { player, index })?;
        Ok((decision, events))
    }
}
