use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::board::{Board, Player, WinPattern};
use crate::ai::AiDifficulty;

const DEFAULT_THINK_DELAY_MS: u32 = 300;

/// 人机模式下人类固定执 X 先手。
pub const HUMAN_PLAYER: Player = Player::X;
pub const AI_PLAYER: Player = Player::O;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    /// 玩家对玩家。
    #[default]
    Pvp,
    /// 玩家对 AI。
    Pve,
}

impl FromStr for GameMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pvp" => Ok(GameMode::Pvp),
            "pve" | "ai" => Ok(GameMode::Pve),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Playing,
    Win,
    Draw,
}

/// 比分，跨局保留。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scores {
    #[serde(rename = "X")]
    pub x: u32,
    #[serde(rename = "O")]
    pub o: u32,
}

impl Scores {
    pub fn get(&self, player: Player) -> u32 {
        match player {
            Player::X => self.x,
            Player::O => self.o,
        }
    }

    fn increment(&mut self, player: Player) {
        match player {
            Player::X => self.x += 1,
            Player::O => self.o += 1,
        }
    }
}

/// 游戏事件流。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum GameEvent {
    MovePlayed { player: Player, index: usize },
    TurnPassed { next: Player },
    GameWon { winner: Player, line: WinPattern },
    GameDrawn,
    GameReset,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum IntegrityError {
    MarkCountMismatch { x: usize, o: usize },
    StatusMismatch { expected: GameStatus, actual: GameStatus },
    WinnerMismatch {
        expected: Option<Player>,
        actual: Option<Player>,
    },
    LineMismatch {
        expected: Option<WinPattern>,
        actual: Option<WinPattern>,
    },
    TurnMismatch { expected: Player, actual: Player },
}

/// 可由前端以 JSON 传入的会话设置。
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GameSettings {
    pub mode: GameMode,
    pub difficulty: AiDifficulty,
    /// AI "思考" 延迟，由调用方在请求落子前等待。
    pub think_delay_ms: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            mode: GameMode::default(),
            difficulty: AiDifficulty::default(),
            think_delay_ms: DEFAULT_THINK_DELAY_MS,
        }
    }
}

/// 单局会话状态，由调用方显式持有。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameState {
    pub board: Board,
    pub current_player: Player,
    #[serde(default)]
    pub status: GameStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Player>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winning_line: Option<WinPattern>,
    #[serde(default)]
    pub settings: GameSettings,
    #[serde(default)]
    pub scores: Scores,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub event_log: Vec<GameEvent>,
}

impl GameState {
    pub fn new(settings: GameSettings) -> Self {
        Self {
            board: Board::new(),
            current_player: Player::X,
            status: GameStatus::Playing,
            winner: None,
            winning_line: None,
            settings,
            scores: Scores::default(),
            event_log: Vec::new(),
        }
    }

    pub fn record_event(&mut self, event: GameEvent) {
        self.event_log.push(event);
    }

    /// 开新局：保留模式、难度与比分。
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.current_player = Player::X;
        self.status = GameStatus::Playing;
        self.winner = None;
        self.winning_line = None;
        self.event_log.clear();
        self.record_event(GameEvent::GameReset);
    }

    /// 切换模式总会重开一局，人机模式下人类执 X 先手。
    pub fn set_mode(&mut self, mode: GameMode) {
        self.settings.mode = mode;
        self.reset();
    }

    pub fn set_difficulty(&mut self, difficulty: AiDifficulty) {
        self.settings.difficulty = difficulty;
    }

    pub fn is_finished(&self) -> bool {
        self.status != GameStatus::Playing
    }

    pub fn is_ai_turn(&self) -> bool {
        self.settings.mode == GameMode::Pve
            && !self.is_finished()
            && self.current_player == AI_PLAYER
    }

    /// 落子后的结算：胜 > 平 > 轮换玩家。
    pub fn settle(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let result = self.board.check_winner();

        if let (Some(winner), Some(line)) = (result.winner, result.line) {
            self.status = GameStatus::Win;
            self.winner = Some(winner);
            self.winning_line = Some(line);
            self.scores.increment(winner);
            events.push(GameEvent::GameWon { winner, line });
        } else if self.board.check_draw() {
            self.status = GameStatus::Draw;
            events.push(GameEvent::GameDrawn);
        } else {
            self.current_player = self.current_player.toggle();
            events.push(GameEvent::TurnPassed {
                next: self.current_player,
            });
        }

        for event in &events {
            self.record_event(event.clone());
        }
        events
    }

    pub fn integrity_check(&self) -> Result<(), IntegrityError> {
        check_mark_counts(&self.board)?;

        let result = self.board.check_winner();
        let expected_status = if result.winner.is_some() {
            GameStatus::Win
        } else if self.board.check_draw() {
            GameStatus::Draw
        } else {
            GameStatus::Playing
        };
        if self.status != expected_status {
            return Err(IntegrityError::StatusMismatch {
                expected: expected_status,
                actual: self.status,
            });
        }
        if self.winner != result.winner {
            return Err(IntegrityError::WinnerMismatch {
                expected: result.winner,
                actual: self.winner,
            });
        }
        if self.winning_line != result.line {
            return Err(IntegrityError::LineMismatch {
                expected: result.line,
                actual: self.winning_line,
            });
        }
        if self.status == GameStatus::Playing {
            let expected = next_player(&self.board);
            if self.current_player != expected {
                return Err(IntegrityError::TurnMismatch {
                    expected,
                    actual: self.current_player,
                });
            }
        }

        Ok(())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(GameSettings::default())
    }
}

/// 棋子数相等时轮到 X，否则轮到 O。
fn next_player(board: &Board) -> Player {
    if board.count(Player::X) > board.count(Player::O) {
        Player::O
    } else {
        Player::X
    }
}

/// X 先手，因此 X 的棋子数只能等于或比 O 多一。
pub fn check_mark_counts(board: &Board) -> Result<(), IntegrityError> {
    let x = board.count(Player::X);
    let o = board.count(Player::O);
    if x == o || x == o + 1 {
        Ok(())
    } else {
        Err(IntegrityError::MarkCountMismatch { x, o })
    }
}
