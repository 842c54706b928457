use crate::error::ParseError;
use crate::grid::{parse_maze, Grid};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LineEnding {
    /// `\r\n`, as written by Windows editors
    Crlf,
    Lf,
}

/// Guesses the line ending of `text` by looking at its first newline. Text without any newline
/// counts as `Lf`.
pub fn line_ending(text: &str) -> LineEnding {
    match text.find('\n') {
        Some(i) if i > 0 && text.as_bytes()[i - 1] == b'\r' => LineEnding::Crlf,
        _ => LineEnding::Lf,
    }
}

pub fn split_lines(text: &str) -> Vec<&str> {
    match line_ending(text) {
        LineEnding::Crlf => text.split("\r\n").collect(),
        LineEnding::Lf => text.split('\n').collect(),
    }
}

/// Parses the full contents of a maze file
pub fn parse_maze_text(text: &str) -> Result<Grid, ParseError> {
    parse_maze(&split_lines(text))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::grid::Point;

    #[test]
    fn test_line_ending() {
        assert_eq!(line_ending("3 3\r\nS.C"), LineEnding::Crlf);
        assert_eq!(line_ending("3 3\nS.C"), LineEnding::Lf);
        assert_eq!(line_ending("\nS.C"), LineEnding::Lf);
        assert_eq!(line_ending("no newline"), LineEnding::Lf);
    }

    #[test]
    fn test_parse_text() {
        let lf = parse_maze_text("2 3\nS.#\n#.C\n").unwrap();
        let crlf = parse_maze_text("2 3\r\nS.#\r\n#.C\r\n").unwrap();

        assert_eq!(lf.to_string(), crlf.to_string());
        assert_eq!(crlf.end(), Point::new(1, 2));
    }
}
