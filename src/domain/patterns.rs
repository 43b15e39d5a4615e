//! Glyph-text patterns.
//!
//! One line per row. `.` is a dead cell, `O`, `1` and `*` are live cells,
//! any other character leaves its cell untouched but still takes up a
//! column. Leading and trailing blank lines are ignored; blank lines in
//! between are empty rows.

use super::simulation::GridSimulation;

/// Meaning of one character of pattern text
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Glyph {
    Alive,
    Dead,
    Skip,
}

impl Glyph {
    pub const fn from_char(ch: char) -> Self {
        match ch {
            'O' | '1' | '*' => Glyph::Alive,
            '.' => Glyph::Dead,
            _ => Glyph::Skip,
        }
    }
}

/// Iterate `(column, row, glyph)` over pattern text
pub fn glyphs(text: &str) -> impl Iterator<Item = (usize, usize, Glyph)> + '_ {
    let lines: Vec<&str> = text.lines().collect();
    let first = lines.iter().position(|l| !l.trim().is_empty()).unwrap_or(lines.len());
    let last = lines.iter().rposition(|l| !l.trim().is_empty()).map_or(first, |i| i + 1);

    lines
        .into_iter()
        .skip(first)
        .take(last.saturating_sub(first))
        .enumerate()
        .flat_map(|(row, line)| {
            line.chars()
                .enumerate()
                .map(move |(column, ch)| (column, row, Glyph::from_char(ch)))
        })
}

/// A named pattern that can be stamped onto a grid
#[derive(Clone, Debug)]
pub struct Pattern {
    pub name: &'static str,
    pub description: &'static str,
    pub text: &'static str,
    pub width: usize,
    pub height: usize,
    /// Live cells relative to the top-left corner
    pub cells: Vec<(usize, usize)>,
}

impl Pattern {
    /// Parse glyph text; the bounding box covers every live cell
    pub fn parse(name: &'static str, description: &'static str, text: &'static str) -> Self {
        let cells: Vec<(usize, usize)> = glyphs(text)
            .filter(|&(_, _, glyph)| glyph == Glyph::Alive)
            .map(|(x, y, _)| (x, y))
            .collect();
        let width = cells.iter().map(|&(x, _)| x + 1).max().unwrap_or(0);
        let height = cells.iter().map(|&(_, y)| y + 1).max().unwrap_or(0);
        Self { name, description, text, width, height, cells }
    }

    /// Stamp onto `grid` with the top-left corner at (x, y)
    pub fn place_on<G: GridSimulation + ?Sized>(&self, grid: &mut G, x: i64, y: i64) {
        grid.load_pattern(self.text, x, y);
    }

    /// Place centered on (x, y)
    pub fn place_centered<G: GridSimulation + ?Sized>(&self, grid: &mut G, x: i64, y: i64) {
        self.place_on(grid, x - self.width as i64 / 2, y - self.height as i64 / 2);
    }
}

/// Classic Game of Life patterns
pub mod presets {
    use super::Pattern;

    pub const GLIDER: &str = "
.O.
..O
OOO
";

    pub const BLINKER: &str = "
OOO
";

    pub const TOAD: &str = "
.OOO
OOO.
";

    pub const BEACON: &str = "
OO..
O...
...O
..OO
";

    pub const PULSAR: &str = "
..OOO...OOO..

O....O.O....O
O....O.O....O
O....O.O....O
..OOO...OOO..

..OOO...OOO..
O....O.O....O
O....O.O....O
O....O.O....O

..OOO...OOO..
";

    pub const LWSS: &str = "
.O..O
O....
O...O
OOOO.
";

    pub const GLIDER_GUN: &str = "
........................O...........
......................O.O...........
............OO......OO............OO
...........O...O....OO............OO
OO........O.....O...OO..............
OO........O...O.OO....O.O...........
..........O.....O.......O...........
...........O...O....................
............OO......................
";

    pub const R_PENTOMINO: &str = "
.OO
OO.
.O.
";

    pub const ACORN: &str = "
.O.....
...O...
OO..OOO
";

    pub const BLOCK: &str = "
OO
OO
";

    pub fn glider() -> Pattern {
        Pattern::parse("Glider", "Moves diagonally (period 4)", GLIDER)
    }

    pub fn blinker() -> Pattern {
        Pattern::parse("Blinker", "Oscillator (period 2)", BLINKER)
    }

    pub fn toad() -> Pattern {
        Pattern::parse("Toad", "Oscillator (period 2)", TOAD)
    }

    pub fn beacon() -> Pattern {
        Pattern::parse("Beacon", "Oscillator (period 2)", BEACON)
    }

    pub fn pulsar() -> Pattern {
        Pattern::parse("Pulsar", "Oscillator (period 3)", PULSAR)
    }

    pub fn lwss() -> Pattern {
        Pattern::parse("LWSS", "Lightweight spaceship (period 4)", LWSS)
    }

    pub fn glider_gun() -> Pattern {
        Pattern::parse("Gosper Glider Gun", "Produces gliders (period 30)", GLIDER_GUN)
    }

    pub fn r_pentomino() -> Pattern {
        Pattern::parse("R-pentomino", "Methuselah, stabilizes at gen 1103", R_PENTOMINO)
    }

    pub fn acorn() -> Pattern {
        Pattern::parse("Acorn", "Methuselah, stabilizes at gen 5206", ACORN)
    }

    pub fn block() -> Pattern {
        Pattern::parse("Block", "Still life", BLOCK)
    }

    pub fn all_patterns() -> Vec<Pattern> {
        vec![
            glider(),
            blinker(),
            toad(),
            beacon(),
            pulsar(),
            lwss(),
            glider_gun(),
            r_pentomino(),
            acorn(),
            block(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_mapping() {
        assert_eq!(Glyph::from_char('O'), Glyph::Alive);
        assert_eq!(Glyph::from_char('1'), Glyph::Alive);
        assert_eq!(Glyph::from_char('*'), Glyph::Alive);
        assert_eq!(Glyph::from_char('.'), Glyph::Dead);
        assert_eq!(Glyph::from_char(' '), Glyph::Skip);
        assert_eq!(Glyph::from_char('x'), Glyph::Skip);
    }

    #[test]
    fn test_outer_blank_lines_are_trimmed() {
        let parsed: Vec<_> = glyphs("\n\n  \nO.\n\n*\n   \n").collect();
        assert_eq!(
            parsed,
            vec![
                (0, 0, Glyph::Alive),
                (1, 0, Glyph::Dead),
                (0, 2, Glyph::Alive),
            ]
        );
    }

    #[test]
    fn test_skipped_glyphs_keep_their_column() {
        let parsed: Vec<_> = glyphs("x O").collect();
        assert_eq!(
            parsed,
            vec![(0, 0, Glyph::Skip), (1, 0, Glyph::Skip), (2, 0, Glyph::Alive)]
        );
    }

    #[test]
    fn test_empty_text_has_no_glyphs() {
        assert_eq!(glyphs("").count(), 0);
        assert_eq!(glyphs("\n \n").count(), 0);
    }

    #[test]
    fn test_glider_shape() {
        let glider = presets::glider();
        assert_eq!((glider.width, glider.height), (3, 3));
        assert_eq!(glider.cells, vec![(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)]);
    }

    #[test]
    fn test_preset_populations() {
        let expected = [
            ("Glider", 5),
            ("Blinker", 3),
            ("Toad", 6),
            ("Beacon", 6),
            ("Pulsar", 48),
            ("LWSS", 9),
            ("Gosper Glider Gun", 36),
            ("R-pentomino", 5),
            ("Acorn", 7),
            ("Block", 4),
        ];
        let all = presets::all_patterns();
        assert_eq!(all.len(), expected.len());
        for (pattern, (name, population)) in all.iter().zip(expected) {
            assert_eq!(pattern.name, name);
            assert_eq!(pattern.cells.len(), population, "{}", name);
        }
    }

    #[test]
    fn test_pulsar_bounding_box() {
        let pulsar = presets::pulsar();
        assert_eq!((pulsar.width, pulsar.height), (13, 13));
    }
}
