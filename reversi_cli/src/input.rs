/// 端末から受け付けるコマンド。
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Command {
    /// 盤面を再表示する。
    Help,
    /// (行, 列) に打つ。
    Place {
        /// 列。
        col: u8,
        /// 行。
        row: u8,
    },
    /// 終了する。
    Quit,
    /// 最初からやり直す。
    Restart,
}

/// 1行を解釈する。
///
/// `d3` のような棋譜表記（列 a〜h、行 1〜8）と、`2 3` のような 0 始まりの
/// 行・列の組の両方を受け付ける。盤外は呼び出し側で判定する。
#[must_use]
pub fn parse(line: &str) -> Option<Command> {
    let line = line.trim().to_ascii_lowercase();
    match line.as_str() {
        "q" | "quit" | "exit" => return Some(Command::Quit),
        "r" | "restart" => return Some(Command::Restart),
        "?" | "h" | "help" => return Some(Command::Help),
        _ => {}
    }

    parse_notation(&line).or_else(|| parse_pair(&line))
}

/// `d3` 形式。
fn parse_notation(line: &str) -> Option<Command> {
    let mut chars = line.chars();
    let file = chars.next()?;
    let rank = chars.next()?;
    if chars.next().is_some() || !file.is_ascii_lowercase() {
        return None;
    }

    let col = u8::try_from(u32::from(file).checked_sub(u32::from('a'))?).ok()?;
    let row = u8::try_from(rank.to_digit(10)?.checked_sub(1)?).ok()?;
    Some(Command::Place { col, row })
}

/// `2 3` / `2,3` 形式。
fn parse_pair(line: &str) -> Option<Command> {
    let mut parts = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty());
    let row = parts.next()?.parse().ok()?;
    let col = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Command::Place { col, row })
}

#[cfg(test)]
mod tests {
    use super::{Command, parse};

    #[test]
    fn notation_maps_file_to_column_and_rank_to_row() {
        assert_eq!(parse("d3"), Some(Command::Place { col: 3, row: 2 }));
        assert_eq!(parse(" A1 "), Some(Command::Place { col: 0, row: 0 }));
        assert_eq!(parse("h8"), Some(Command::Place { col: 7, row: 7 }));
    }

    #[test]
    fn numeric_pairs_are_zero_based_row_then_column() {
        assert_eq!(parse("2 3"), Some(Command::Place { col: 3, row: 2 }));
        assert_eq!(parse("4,5"), Some(Command::Place { col: 5, row: 4 }));
    }

    #[test]
    fn keywords_and_garbage() {
        assert_eq!(parse("q"), Some(Command::Quit));
        assert_eq!(parse("Restart"), Some(Command::Restart));
        assert_eq!(parse("?"), Some(Command::Help));
        assert_eq!(parse("d0"), None);
        assert_eq!(parse("1 2 3"), None);
        assert_eq!(parse(""), None);
    }
}
