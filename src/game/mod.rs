//! 游戏核心逻辑模块（棋盘、会话状态、落子规则）。

pub mod board;
pub mod rules;
pub mod state;

pub use board::{
    Board, Cell, Player, WinPattern, WinResult, BOARD_SIZE, CENTER, CORNERS, WIN_PATTERNS,
};
pub use rules::{MoveAction, MoveResolution, Outcome, RuleEngine, RuleError};
pub use state::{
    check_mark_counts, GameEvent, GameMode, GameSettings, GameState, GameStatus, IntegrityError,
    Scores, AI_PLAYER, HUMAN_PLAYER,
};
