use super::types::LineKey;

const LINE_LENGTH: usize = 3;

/// Every 3-cell line on a `grid_size` x `grid_size` board, head to tail.
///
/// Order: rows, columns, down-right diagonals, down-left diagonals. Within
/// each group lines are listed by their head cell in reading order, so the
/// result is stable for a given size. Boards smaller than 3 have no lines.
pub fn generate_lines(grid_size: usize) -> Vec<LineKey> {
    if grid_size < LINE_LENGTH {
        return Vec::new();
    }

    let mut lines = Vec::with_capacity(line_count(grid_size));
    lines.extend(row_lines(grid_size));
    lines.extend(column_lines(grid_size));
    lines.extend(down_right_lines(grid_size));
    lines.extend(down_left_lines(grid_size));
    lines
}

pub fn line_count(grid_size: usize) -> usize {
    if grid_size < LINE_LENGTH {
        return 0;
    }
    let span = grid_size - (LINE_LENGTH - 1);
    2 * grid_size * span + 2 * span * span
}

fn index(grid_size: usize, row: usize, col: usize) -> usize {
    row * grid_size + col
}

fn row_lines(n: usize) -> impl Iterator<Item = LineKey> {
    (0..n).flat_map(move |row| {
        (0..=n - LINE_LENGTH).map(move |col| {
            [index(n, row, col), index(n, row, col + 1), index(n, row, col + 2)]
        })
    })
}

fn column_lines(n: usize) -> impl Iterator<Item = LineKey> {
    (0..n).flat_map(move |col| {
        (0..=n - LINE_LENGTH).map(move |row| {
            [index(n, row, col), index(n, row + 1, col), index(n, row + 2, col)]
        })
    })
}

fn down_right_lines(n: usize) -> impl Iterator<Item = LineKey> {
    (0..=n - LINE_LENGTH).flat_map(move |row| {
        (0..=n - LINE_LENGTH).map(move |col| {
            [index(n, row, col), index(n, row + 1, col + 1), index(n, row + 2, col + 2)]
        })
    })
}

fn down_left_lines(n: usize) -> impl Iterator<Item = LineKey> {
    (0..=n - LINE_LENGTH).flat_map(move |row| {
        (LINE_LENGTH - 1..n).map(move |col| {
            [index(n, row, col), index(n, row + 1, col - 1), index(n, row + 2, col - 2)]
        })
    })
}
