pub mod ai;
pub mod game;
pub mod utils;

use gloo_timers::future::TimeoutFuture;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};
use std::str::FromStr;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;
use web_sys::js_sys::Promise;

pub use ai::{
    get_ai_move, heuristic_move, minimax_root, random_move, AiAgent, AiConfig, AiDecision,
    AiDifficulty, AiStrategy, SearchOutcome,
};
pub use game::{
    check_mark_counts, Board, Cell, GameEvent, GameMode, GameSettings, GameState, GameStatus,
    IntegrityError, MoveAction, MoveResolution, Outcome, Player, RuleEngine, RuleError, Scores,
    WinPattern, WinResult, BOARD_SIZE, WIN_PATTERNS,
};

#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn start() {
    utils::set_panic_hook();
}

fn to_js_error(error: RuleError) -> JsValue {
    to_js(&error).unwrap_or_else(|serialize_err| serialize_err)
}

fn serde_to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// 空位序列化为 `null`（而非 `undefined`），与前端约定一致。
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&Serializer::json_compatible())
        .map_err(JsValue::from)
}

fn board_from_js(board: JsValue) -> Result<Board, JsValue> {
    from_value(board).map_err(JsValue::from)
}

fn player_from_js(value: &str) -> Result<Player, JsValue> {
    Player::from_str(value).map_err(|_| {
        to_js_error(RuleError::InvalidPlayer {
            value: value.to_string(),
        })
    })
}

/// 负数或越界索引返回 `None`。
fn index_from_js(index: i32) -> Option<usize> {
    RuleEngine::checked_index(i64::from(index)).ok()
}

fn make_agent(
    difficulty: Option<String>,
    strategy: Option<String>,
    seed: Option<u32>,
) -> AiAgent {
    let difficulty = difficulty
        .as_deref()
        .map(AiDifficulty::parse_or_default)
        .unwrap_or_default();
    let mut config = AiConfig::from_difficulty(difficulty);
    if let Some(strategy) = strategy
        .as_deref()
        .and_then(|value| AiStrategy::from_str(value).ok())
    {
        config = config.with_strategy(strategy);
    }
    match seed {
        Some(seed) => AiAgent::with_seed(config, u64::from(seed)),
        None => AiAgent::new(config),
    }
}

fn make_resolution_json(state: &GameState, events: Vec<GameEvent>) -> Result<String, JsValue> {
    serde_json::to_string(&MoveResolution::new(state.clone(), events)).map_err(serde_to_js_error)
}

#[derive(Serialize)]
struct AiMoveResponse {
    decision: AiDecision,
    applied: MoveResolution,
}

#[wasm_bindgen]
pub struct GameEngine {
    state: GameState,
}

#[wasm_bindgen]
impl GameEngine {
    #[wasm_bindgen(constructor)]
    pub fn new(settings_json: Option<String>) -> Result<GameEngine, JsValue> {
        let settings = match settings_json {
            Some(json) => serde_json::from_str(&json).map_err(serde_to_js_error)?,
            None => GameSettings::default(),
        };
        Ok(GameEngine {
            state: GameState::new(settings),
        })
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state).map_err(serde_to_js_error)
    }

    pub fn set_state_json(&mut self, json: &str) -> Result<(), JsValue> {
        let state: GameState = serde_json::from_str(json).map_err(serde_to_js_error)?;
        RuleEngine::ensure_integrity(&state).map_err(to_js_error)?;
        self.state = state;
        Ok(())
    }

    pub fn is_ai_turn(&self) -> bool {
        self.state.is_ai_turn()
    }

    /// 人类玩家落子；人机模式下轮到 AI 时拒绝。
    pub fn play_move(&mut self, index: i32) -> Result<String, JsValue> {
        if self.state.is_ai_turn() {
            let error = RuleError::NotPlayerTurn {
                expected: game::AI_PLAYER,
                actual: game::HUMAN_PLAYER,
            };
            utils::warn(&format!("忽略落子 {index}：AI 回合"));
            return Err(to_js_error(error));
        }
        let index = RuleEngine::checked_index(i64::from(index)).map_err(to_js_error)?;
        let action = MoveAction {
            player: self.state.current_player,
            index,
        };
        let events = RuleEngine::play_move(&mut self.state, action).map_err(|error| {
            utils::warn(&format!("非法落子 {index}: {error:?}"));
            to_js_error(error)
        })?;
        make_resolution_json(&self.state, events)
    }

    /// 仅在人机模式轮到 AI 时落子；需要提示时用 `think_ai` 或 `computeAiMove`。
    pub fn apply_ai_move(&mut self, seed: Option<u32>) -> Result<String, JsValue> {
        RuleEngine::ensure_ai_turn(&self.state).map_err(to_js_error)?;
        let difficulty = self.state.settings.difficulty;
        let mut agent = match seed {
            Some(seed) => AiAgent::with_seed(AiConfig::from_difficulty(difficulty), u64::from(seed)),
            None => AiAgent::new(AiConfig::from_difficulty(difficulty)),
        };
        let (decision, events) =
            RuleEngine::ai_move(&mut self.state, &mut agent).map_err(to_js_error)?;
        utils::log(&format!(
            "AI({:?}) 落子 {:?}，评分 {:?}，搜索节点 {}",
            decision.strategy, decision.index, decision.evaluation, decision.nodes
        ));

        let response = AiMoveResponse {
            decision,
            applied: MoveResolution::new(self.state.clone(), events),
        };
        serde_json::to_string(&response).map_err(serde_to_js_error)
    }

    /// 等待 "思考" 延迟后给出 AI 决策（不落子）。
    pub fn think_ai(&self, delay_ms: Option<u32>) -> Promise {
        let board = self.state.board;
        let player = self.state.current_player;
        let difficulty = self.state.settings.difficulty;
        let delay = delay_ms.unwrap_or(self.state.settings.think_delay_ms);

        future_to_promise(async move {
            if delay > 0 {
                TimeoutFuture::new(delay).await;
            }
            let mut agent = AiAgent::new(AiConfig::from_difficulty(difficulty));
            let decision = agent.decide_move(&board, player);
            let json = serde_json::to_string(&decision).map_err(serde_to_js_error)?;
            Ok(JsValue::from_str(&json))
        })
    }

    pub fn reset(&mut self) -> Result<String, JsValue> {
        self.state.reset();
        self.state_json()
    }

    pub fn set_mode(&mut self, mode: &str) -> Result<String, JsValue> {
        let mode = GameMode::from_str(mode)
            .map_err(|_| JsValue::from_str(&format!("unknown mode: {mode}")))?;
        self.state.set_mode(mode);
        self.state_json()
    }

    pub fn set_difficulty(&mut self, difficulty: &str) -> Result<String, JsValue> {
        self.state
            .set_difficulty(AiDifficulty::parse_or_default(difficulty));
        self.state_json()
    }
}

/// 按难度计算 AI 落子；无空位时返回 `undefined`。
#[wasm_bindgen(js_name = "getAIMove")]
pub fn get_ai_move_js(
    board: JsValue,
    ai_player: &str,
    difficulty: Option<String>,
    seed: Option<u32>,
) -> Result<Option<u32>, JsValue> {
    let board = board_from_js(board)?;
    let ai_player = player_from_js(ai_player)?;
    let mut agent = make_agent(difficulty, None, seed);
    let decision = agent.decide_move(&board, ai_player);
    Ok(decision.index.map(|index| index as u32))
}

/// 返回完整的 AI 决策（落子、评分、搜索节点数、耗时）。
#[wasm_bindgen(js_name = "computeAiMove")]
pub fn compute_ai_move(
    board: JsValue,
    ai_player: &str,
    difficulty: Option<String>,
    strategy: Option<String>,
    seed: Option<u32>,
) -> Result<JsValue, JsValue> {
    let board = board_from_js(board)?;
    let ai_player = player_from_js(ai_player)?;
    let mut agent = make_agent(difficulty, strategy, seed);
    to_js(&agent.decide_move(&board, ai_player))
}

#[wasm_bindgen(js_name = "applyMove")]
pub fn apply_move(board: JsValue, index: i32, player: &str) -> Result<JsValue, JsValue> {
    let board = board_from_js(board)?;
    let player = player_from_js(player)?;
    let next = match index_from_js(index) {
        Some(index) => board.apply_move(index, player),
        None => board,
    };
    to_js(&next)
}

#[wasm_bindgen(js_name = "checkWinner")]
pub fn check_winner(board: JsValue) -> Result<JsValue, JsValue> {
    to_js(&board_from_js(board)?.check_winner())
}

#[wasm_bindgen(js_name = "checkDraw")]
pub fn check_draw(board: JsValue) -> Result<bool, JsValue> {
    Ok(board_from_js(board)?.check_draw())
}

#[wasm_bindgen(js_name = "getAvailableMoves")]
pub fn get_available_moves(board: JsValue) -> Result<Vec<u32>, JsValue> {
    Ok(board_from_js(board)?
        .available_moves()
        .into_iter()
        .map(|index| index as u32)
        .collect())
}

#[wasm_bindgen(js_name = "togglePlayer")]
pub fn toggle_player(player: &str) -> Result<String, JsValue> {
    Ok(player_from_js(player)?.toggle().to_string())
}

#[wasm_bindgen(js_name = "isValidMove")]
pub fn is_valid_move(board: JsValue, index: i32) -> Result<bool, JsValue> {
    let board = board_from_js(board)?;
    Ok(index_from_js(index).is_some_and(|index| board.is_valid_move(index)))
}

/// 8 条获胜连线，供前端高亮。
#[wasm_bindgen(js_name = "winPatterns")]
pub fn win_patterns() -> Result<JsValue, JsValue> {
    to_js(&WIN_PATTERNS)
}

#[wasm_bindgen(js_name = "validateBoard")]
pub fn validate_board(board: JsValue) -> Result<(), JsValue> {
    let board = board_from_js(board)?;
    check_mark_counts(&board)
        .map_err(|error| to_js_error(RuleError::IntegrityViolation { error }))
}
