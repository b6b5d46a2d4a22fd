use antcode_core::{CellContent, GridCoord, Team};
use antcode_replay::{GameLog, ReplayError};

const SEPARATOR: &str = "==============================";
const BOARD_SEPARATOR: &str = "=========================";

fn sample_log() -> String {
    let boards = [
        ["#####", "#@.X#", "#####"],
        ["#####", "#@AX#", "#####"],
        ["#####", "#@a3#", "#####"],
    ];
    let mut text = String::from("SIZE 3 5\n");
    for (index, board) in boards.iter().enumerate() {
        text.push_str(SEPARATOR);
        text.push('\n');
        text.push_str(&format!("ROUND {}\n", index + 1));
        text.push_str(&format!("NORTH {}\n", index * 2));
        text.push_str(&format!("SOUTH {}\n", index * 3));
        text.push_str(BOARD_SEPARATOR);
        text.push('\n');
        for row in board {
            text.push_str(row);
            text.push('\n');
        }
    }
    text.push_str(SEPARATOR);
    text.push_str("\nWINNER South\n");
    text
}

#[test]
fn parses_every_round_in_order() {
    let log = GameLog::parse(&sample_log()).expect("sample log parses");

    assert_eq!(log.len(), 3);
    assert_eq!(log.board_rows(), 3);
    assert_eq!(log.board_columns(), 5);
    assert_eq!(log.winner(), "South");

    for (index, expected_number) in (0..3).zip(1..=3) {
        let round = log.state_at(index).expect("round exists");
        assert_eq!(round.number(), expected_number);
        assert_eq!(round.north_points(), index as u32 * 2);
        assert_eq!(round.south_points(), index as u32 * 3);
    }
}

#[test]
fn state_lookup_is_stable_across_repeated_calls() {
    let log = GameLog::parse(&sample_log()).expect("sample log parses");

    for index in 0..log.len() {
        let first = log.state_at(index).expect("round exists").clone();
        let second = log.state_at(index).expect("round exists").clone();
        assert_eq!(first, second);
    }
}

#[test]
fn out_of_range_lookup_returns_none() {
    let log = GameLog::parse(&sample_log()).expect("sample log parses");

    assert!(log.state_at(log.len()).is_none());
    assert!(log.state_at(usize::MAX).is_none());
}

#[test]
fn decodes_cell_contents_from_board_characters() {
    let log = GameLog::parse(&sample_log()).expect("sample log parses");
    let board = log.state_at(2).expect("round exists").board();

    assert_eq!(board.cell_at(GridCoord::new(0, 0)), Some(CellContent::Wall));
    assert_eq!(
        board.cell_at(GridCoord::new(1, 1)),
        Some(CellContent::Base(Team::North))
    );
    assert!(matches!(
        board.cell_at(GridCoord::new(2, 1)),
        Some(CellContent::Ant {
            carrying_food: true,
            ..
        })
    ));
    assert_eq!(
        board.cell_at(GridCoord::new(3, 1)),
        Some(CellContent::Food { amount: 3 })
    );
    assert!(board.cell_at(GridCoord::new(5, 0)).is_none());
    assert!(board.cell_at(GridCoord::new(0, 3)).is_none());
}

#[test]
fn accepts_logs_of_any_round_count() {
    let mut text = String::from("SIZE 1 2\n");
    text.push_str(SEPARATOR);
    text.push_str("\nROUND 1\nNORTH 0\nSOUTH 0\n");
    text.push_str(BOARD_SEPARATOR);
    text.push_str("\n##\n");
    text.push_str(SEPARATOR);
    text.push_str("\nWINNER North\n");

    let log = GameLog::parse(&text).expect("single-round log parses");
    assert_eq!(log.len(), 1);
    assert!(!log.is_empty());
}

#[test]
fn blank_sections_are_skipped() {
    let text = sample_log().replace(
        "WINNER South",
        &format!("\n{SEPARATOR}\n\n{SEPARATOR}\nWINNER South"),
    );

    let log = GameLog::parse(&text).expect("log with blank sections parses");
    assert_eq!(log.len(), 3);
}

#[test]
fn missing_size_header_is_rejected() {
    let text = sample_log().replace("SIZE 3 5", "DIMENSIONS 3 5");
    assert!(matches!(
        GameLog::parse(&text),
        Err(ReplayError::MissingSize)
    ));
}

#[test]
fn missing_winner_is_rejected() {
    let text = sample_log().replace("WINNER South", "VICTOR South");
    assert!(matches!(
        GameLog::parse(&text),
        Err(ReplayError::MissingWinner)
    ));
}

#[test]
fn invalid_board_characters_are_rejected() {
    let text = sample_log().replace("#@.X#", "#@?X#");
    assert!(matches!(
        GameLog::parse(&text),
        Err(ReplayError::InvalidBoardRow { round: 1, .. })
    ));
}

#[test]
fn wrong_board_width_is_rejected() {
    let text = sample_log().replace("#@AX#", "#@AX##");
    assert!(matches!(
        GameLog::parse(&text),
        Err(ReplayError::InvalidBoardRow { round: 2, .. })
    ));
}

#[test]
fn log_without_rounds_is_rejected() {
    let text = format!("SIZE 3 5\n{SEPARATOR}\nWINNER North\n");
    assert!(matches!(GameLog::parse(&text), Err(ReplayError::EmptyLog)));
}

#[test]
fn missing_team_points_are_rejected() {
    let text = sample_log().replace("NORTH 2", "NORDIC 2");
    assert!(matches!(
        GameLog::parse(&text),
        Err(ReplayError::MissingTeamPoints { round: 2 })
    ));
}
