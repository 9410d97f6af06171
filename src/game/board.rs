use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 棋盘格子数（3x3，按行优先编号 0-8）。
pub const BOARD_SIZE: usize = 9;
pub const CENTER: usize = 4;
pub const CORNERS: [usize; 4] = [0, 2, 6, 8];

/// 一条获胜连线的三个格子索引。
pub type WinPattern = [usize; 3];

/// 所有获胜组合：行、列、对角线（扫描顺序固定）。
pub const WIN_PATTERNS: [WinPattern; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // 行
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // 列
    [0, 4, 8],
    [2, 4, 6], // 对角线
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Player {
    X,
    O,
}

impl Player {
    pub fn toggle(self) -> Self {
        match self {
            Player::X => Player::O,
            Player::O => Player::X,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Player::X => 'X',
            Player::O => 'O',
        }
    }
}

impl FromStr for Player {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "X" | "x" => Ok(Player::X),
            "O" | "o" => Ok(Player::O),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// 单个格子：`None` 表示空位。
pub type Cell = Option<Player>;

/// 胜负检测结果。`line` 为扫描顺序中第一条成立的连线，无胜者时序列化为 `[]`。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WinResult {
    pub winner: Option<Player>,
    #[serde(default, with = "line_or_empty")]
    pub line: Option<WinPattern>,
}

mod line_or_empty {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::WinPattern;

    pub fn serialize<S: Serializer>(
        line: &Option<WinPattern>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match line {
            Some(pattern) => pattern.serialize(serializer),
            None => <[usize; 0]>::default().serialize(serializer),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<WinPattern>, D::Error> {
        match Option::<Vec<usize>>::deserialize(deserializer)?.as_deref() {
            None | Some([]) => Ok(None),
            Some(&[a, b, c]) => Ok(Some([a, b, c])),
            Some(other) => Err(D::Error::invalid_length(other.len(), &"0 or 3 indices")),
        }
    }
}

impl WinResult {
    pub fn none() -> Self {
        Self::default()
    }
}

/// 不可变棋盘：所有落子操作都返回新的棋盘值。
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Board {
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Cell; BOARD_SIZE]) -> Self {
        Self { cells }
    }

    pub fn cells(&self) -> &[Cell; BOARD_SIZE] {
        &self.cells
    }

    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    pub fn is_valid_move(&self, index: usize) -> bool {
        matches!(self.cells.get(index), Some(None))
    }

    /// 非法落子（越界或已占用）原样返回当前棋盘。
    pub fn apply_move(&self, index: usize, player: Player) -> Board {
        if !self.is_valid_move(index) {
            return *self;
        }
        let mut next = *self;
        next.cells[index] = Some(player);
        next
    }

    pub fn check_winner(&self) -> WinResult {
        for pattern in WIN_PATTERNS {
            let [a, b, c] = pattern;
            if let Some(player) = self.cells[a] {
                if self.cells[b] == Some(player) && self.cells[c] == Some(player) {
                    return WinResult {
                        winner: Some(player),
                        line: Some(pattern),
                    };
                }
            }
        }
        WinResult::none()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn check_draw(&self) -> bool {
        self.is_full() && self.check_winner().winner.is_none()
    }

    pub fn available_moves(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn count(&self, player: Player) -> usize {
        self.cells
            .iter()
            .filter(|cell| **cell == Some(player))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }
}

impl From<[Cell; BOARD_SIZE]> for Board {
    fn from(cells: [Cell; BOARD_SIZE]) -> Self {
        Self::from_cells(cells)
    }
}

/// 9 个字符：`X`/`O` 为落子，`.`、`-` 或空格为空位。
impl FromStr for Board {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut cells = [None; BOARD_SIZE];
        let mut chars = s.chars();
        for cell in cells.iter_mut() {
            *cell = match chars.next().ok_or(())? {
                'X' | 'x' => Some(Player::X),
                'O' | 'o' => Some(Player::O),
                '.' | '-' | ' ' => None,
                _ => return Err(()),
            };
        }
        if chars.next().is_some() {
            return Err(());
        }
        Ok(Self { cells })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, chunk) in self.cells.chunks(3).enumerate() {
            if row > 0 {
                writeln!(f)?;
            }
            for &cell in chunk {
                write!(f, "{}", cell.map(Player::symbol).unwrap_or('.'))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        s.parse().expect("board literal should parse")
    }

    #[test]
    fn apply_move_leaves_input_untouched() {
        let before = board("X...O....");
        let snapshot = before;
        let after = before.apply_move(2, Player::X);

        assert_eq!(before, snapshot, "input board must not change");
        assert_eq!(after.get(2), Some(Some(Player::X)));
        assert_eq!(after.count(Player::X), 2);
    }

    #[test]
    fn apply_move_on_occupied_or_out_of_range_is_noop() {
        let b = board("X...O....");
        assert_eq!(b.apply_move(0, Player::O), b);
        assert_eq!(b.apply_move(4, Player::X), b);
        assert_eq!(b.apply_move(9, Player::X), b);
        assert_eq!(b.apply_move(usize::MAX, Player::X), b);
    }

    #[test]
    fn is_valid_move_checks_range_and_emptiness() {
        let b = board("X........");
        assert!(!b.is_valid_move(0));
        assert!(b.is_valid_move(1));
        assert!(b.is_valid_move(8));
        assert!(!b.is_valid_move(9));
    }

    #[test]
    fn toggle_is_an_involution() {
        for player in [Player::X, Player::O] {
            assert_ne!(player.toggle(), player);
            assert_eq!(player.toggle().toggle(), player);
        }
    }

    #[test]
    fn every_pattern_is_detected_with_its_line() {
        for player in [Player::X, Player::O] {
            for pattern in WIN_PATTERNS {
                let b = pattern
                    .iter()
                    .fold(Board::new(), |b, &index| b.apply_move(index, player));
                let result = b.check_winner();
                assert_eq!(result.winner, Some(player), "pattern {pattern:?}");
                assert_eq!(result.line, Some(pattern), "pattern {pattern:?}");
            }
        }
    }

    #[test]
    fn first_pattern_in_scan_order_is_reported() {
        // 第一行与第一列同时成立，按扫描顺序只报告行。
        let b = board("XXXXOOXOO");
        let result = b.check_winner();
        assert_eq!(result.winner, Some(Player::X));
        assert_eq!(result.line, Some([0, 1, 2]));
    }

    #[test]
    fn full_board_without_line_is_a_draw() {
        let b = board("XOXXOOOXX");
        assert!(b.is_full());
        assert!(b.check_draw());
        assert_eq!(b.check_winner(), WinResult::none());
    }

    #[test]
    fn win_result_line_serializes_as_array() {
        let none = serde_json::to_string(&WinResult::none()).expect("serialize result");
        assert_eq!(none, r#"{"winner":null,"line":[]}"#);

        let won = board("XXXOO....").check_winner();
        let json = serde_json::to_string(&won).expect("serialize result");
        assert_eq!(json, r#"{"winner":"X","line":[0,1,2]}"#);

        let legacy = [r#"{"winner":null,"line":null}"#, r#"{"winner":null}"#];
        for text in [none.as_str(), json.as_str()].into_iter().chain(legacy) {
            let back: WinResult = serde_json::from_str(text).expect("deserialize result");
            assert_eq!(back.line.is_some(), back.winner.is_some(), "{text}");
        }
        assert!(serde_json::from_str::<WinResult>(r#"{"winner":"X","line":[0,1]}"#).is_err());
    }

    #[test]
    fn full_board_with_line_is_not_a_draw() {
        let b = board("XXXOOXOXO");
        assert!(b.is_full());
        assert!(!b.check_draw());
    }

    #[test]
    fn partial_board_is_not_a_draw() {
        assert!(!board("XO.......").check_draw());
        assert!(!Board::new().check_draw());
    }

    #[test]
    fn available_moves_are_ascending() {
        let b = board("X.O.X...O");
        assert_eq!(b.available_moves(), vec![1, 3, 5, 6, 7]);
        assert_eq!(Board::new().available_moves(), (0..9).collect::<Vec<_>>());
        assert!(board("XOXXOOOXX").available_moves().is_empty());
    }

    #[test]
    fn parse_rejects_bad_literals() {
        assert!("XO".parse::<Board>().is_err());
        assert!("XO.......X".parse::<Board>().is_err());
        assert!("XO.....Z.".parse::<Board>().is_err());
        assert_eq!(board("---------"), Board::new());
    }

    #[test]
    fn display_renders_three_rows() {
        assert_eq!(board("X.O.X...O").to_string(), "X.O\n.X.\n..O");
    }

    #[test]
    fn serializes_as_array_of_nullable_marks() {
        let json = serde_json::to_string(&board("X.......O")).expect("serialize board");
        assert_eq!(json, r#"["X",null,null,null,null,null,null,null,"O"]"#);
        let back: Board = serde_json::from_str(&json).expect("deserialize board");
        assert_eq!(back, board("X.......O"));
        assert!(serde_json::from_str::<Board>("[null,null]").is_err());
    }
}
