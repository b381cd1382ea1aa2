use std::str::FromStr;

use geo::coordinate_position::CoordPos;
use geo::dimensions::Dimensions;
use geo::relate::IntersectionMatrix;

const POSITIONS: [CoordPos; 3] = [CoordPos::Inside, CoordPos::OnBoundary, CoordPos::Outside];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cell {
    NonEmpty,
    Empty,
    Any,
    Exactly(Dimensions),
}

impl Cell {
    fn matches(&self, value: Dimensions) -> bool {
        match self {
            Cell::NonEmpty => value != Dimensions::Empty,
            Cell::Empty => value == Dimensions::Empty,
            Cell::Any => true,
            Cell::Exactly(dimensions) => value == *dimensions,
        }
    }
}

/// DE-9IM pattern, e.g. `T*F**F***` for "within".
///
/// The nine cells are interior, boundary and exterior of the first geometry against interior,
/// boundary and exterior of the second one, row by row. Each cell is one of `T` (non-empty),
/// `F` (empty), `*` (anything), `0`, `1` or `2` (exact dimension). Letters are case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelatePattern([Cell; 9]);

impl RelatePattern {
    /// Returns true if the intersection matrix matches the pattern.
    pub fn matches(&self, matrix: &IntersectionMatrix) -> bool {
        POSITIONS
            .iter()
            .flat_map(|a| POSITIONS.iter().map(move |b| (*a, *b)))
            .zip(self.0.iter())
            .all(|((a, b), cell)| cell.matches(matrix.get(a, b)))
    }
}

impl FromStr for RelatePattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cells = s
            .chars()
            .map(|c| match c {
                'T' | 't' => Ok(Cell::NonEmpty),
                'F' | 'f' => Ok(Cell::Empty),
                '*' => Ok(Cell::Any),
                '0' => Ok(Cell::Exactly(Dimensions::ZeroDimensional)),
                '1' => Ok(Cell::Exactly(Dimensions::OneDimensional)),
                '2' => Ok(Cell::Exactly(Dimensions::TwoDimensional)),
                other => Err(format!("invalid character '{other}' in DE-9IM pattern '{s}'")),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let cells: [Cell; 9] = cells
            .try_into()
            .map_err(|_| format!("DE-9IM pattern '{s}' must have exactly 9 characters"))?;

        Ok(Self(cells))
    }
}
