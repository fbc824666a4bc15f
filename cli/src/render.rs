use core::fmt::Write;
use mineclear_core::*;

/// One character per cell view.
pub(crate) fn glyph(view: CellView) -> char {
    use CellView::*;
    match view {
        Hidden => '#',
        Flagged => 'F',
        Revealed(0) => '.',
        Revealed(count) => char::from(b'0' + count.min(8)),
        Mine => '*',
        FlaggedMine => '+',
        IncorrectFlag => 'X',
        Detonated => '@',
    }
}

/// Three character counter, like the seven-segment displays of the classic game.
pub(crate) fn format_for_counter(num: isize) -> String {
    match num {
        ..-99 => "-99".to_string(),
        -99..0 => format!("-{:02}", -num),
        0..1000 => format!("{:03}", num),
        1000.. => "999".to_string(),
    }
}

fn face(state: GameState) -> &'static str {
    use GameState::*;
    match state {
        NotStarted | InProgress => ":)",
        Won => "B)",
        Lost => "X(",
    }
}

pub(crate) fn render_status(session: &GameSession) -> String {
    format!(
        "[{}]  {}  [{}]",
        format_for_counter(session.remaining_flags()),
        face(session.state()),
        format_for_counter(session.elapsed_secs() as isize)
    )
}

/// Board as text, with column digits on top and row numbers on the left.
pub(crate) fn render_board(snapshot: &BoardSnapshot) -> String {
    let (_, cols) = snapshot.size();
    let mut out = String::from("    ");
    for col in 0..cols {
        out.push(char::from(b'0' + col % 10));
    }
    out.push('\n');

    for (row, views) in snapshot.rows().enumerate() {
        let _ = write!(out, "{:>3} ", row);
        out.extend(views.map(glyph));
        out.push('\n');
    }
    out
}

pub(crate) fn render_summary(summary: &GameSummary) -> String {
    let verdict = match summary.state {
        GameState::Won => "You won",
        GameState::Lost => "You lost",
        _ => "Game over",
    };
    let mut out = format!(
        "{} on {} in {}s",
        verdict, summary.difficulty, summary.elapsed_secs
    );
    if let Some((row, col)) = summary.detonated {
        let _ = write!(out, ", hit a mine at {} {}", row, col);
    }
    let wrong_flags = summary.board.count(CellView::IncorrectFlag);
    if wrong_flags > 0 {
        let _ = write!(out, ", {} wrong flags", wrong_flags);
    }
    out
}
