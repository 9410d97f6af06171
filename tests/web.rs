//! 浏览器边界测试：`wasm-pack test --headless --firefox`。

#![cfg(target_arch = "wasm32")]

use serde::Serialize;
use serde_wasm_bindgen::{from_value, Serializer};
use tictactoe_wasm::{
    apply_move, check_draw, check_winner, get_ai_move_js, get_available_moves, is_valid_move,
    toggle_player, validate_board, win_patterns, Board, GameEngine, Player, WinResult,
};
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn js_board(literal: &str) -> JsValue {
    let board: Board = literal.parse().expect("board literal should parse");
    board
        .serialize(&Serializer::json_compatible())
        .expect("board should serialize")
}

#[wasm_bindgen_test]
fn apply_move_returns_new_board_and_ignores_invalid_index() {
    let input = js_board("X........");
    let next: Board = from_value(apply_move(input.clone(), 4, "O").expect("apply should succeed"))
        .expect("board should deserialize");
    assert_eq!(next, "X...O....".parse::<Board>().expect("literal"));

    let unchanged: Board = from_value(apply_move(input.clone(), -1, "O").expect("apply"))
        .expect("board should deserialize");
    assert_eq!(unchanged, "X........".parse::<Board>().expect("literal"));
    assert!(apply_move(input, 0, "Z").is_err());
}

#[wasm_bindgen_test]
fn board_queries_match_core() {
    let board = js_board("XXXOO....");
    let result: WinResult =
        from_value(check_winner(board.clone()).expect("check winner")).expect("result");
    assert_eq!(result.winner, Some(Player::X));
    assert_eq!(result.line, Some([0, 1, 2]));
    assert!(!check_draw(board.clone()).expect("check draw"));
    assert_eq!(
        get_available_moves(board.clone()).expect("moves"),
        vec![5, 6, 7, 8]
    );
    assert!(is_valid_move(board.clone(), 5).expect("valid"));
    assert!(!is_valid_move(board.clone(), 0).expect("occupied"));
    assert!(!is_valid_move(board, 12).expect("out of range"));
    assert_eq!(toggle_player("X").expect("toggle"), "O");
    let patterns: Vec<[usize; 3]> = from_value(win_patterns().expect("patterns")).expect("vec");
    assert_eq!(patterns.len(), 8);
}

#[wasm_bindgen_test]
fn ai_move_respects_difficulty() {
    assert_eq!(
        get_ai_move_js(js_board("XX.OO...."), "X", Some("medium".into()), Some(1))
            .expect("medium move"),
        Some(2)
    );
    assert_eq!(
        get_ai_move_js(js_board("........."), "X", Some("hard".into()), None)
            .expect("hard move"),
        Some(0)
    );
    assert_eq!(
        get_ai_move_js(js_board("XOXXOOOXX"), "X", Some("hard".into()), None)
            .expect("full board"),
        None
    );
}

#[wasm_bindgen_test]
fn validate_board_rejects_impossible_counts() {
    assert!(validate_board(js_board("X...O....")).is_ok());
    assert!(validate_board(js_board("OO.......")).is_err());
}

#[wasm_bindgen_test]
fn engine_plays_pve_round() {
    let mut engine =
        GameEngine::new(Some(r#"{"mode":"pve","difficulty":"hard"}"#.into())).expect("engine");
    assert!(engine.apply_ai_move(None).is_err(), "AI cannot move on human turn");
    engine.play_move(4).expect("human move");
    assert!(engine.is_ai_turn());
    assert!(engine.play_move(0).is_err(), "human cannot move on AI turn");
    let response = engine.apply_ai_move(Some(3)).expect("ai move");
    assert!(response.contains(r#""index":0"#));
    assert!(!engine.is_ai_turn());
}
