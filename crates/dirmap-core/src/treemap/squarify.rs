/// Squarified treemap layout (Bruls, Huizing, van Wijk).
///
/// Weights are consumed in input order and packed greedily into rows along
/// the shorter side of the remaining rectangle. A candidate joins the
/// current row as long as it does not make the row's worst aspect ratio
/// larger; otherwise the row is committed as a strip and a new row starts.
/// Callers should pre-sort weights descending for the best packing; the
/// algorithm itself never reorders.
///
/// The last item of each row and the last row overall are stretched to the
/// exact edge, so the cells tile the target with no floating-point gaps.
///
/// Strips run along the shorter side: a vertical strip on the left when the
/// free rectangle is at least as wide as tall. Layouts that instead cut a
/// horizontal slice of height `sum / w` off wide rectangles place rows
/// differently.
use serde::Serialize;

/// Axis-aligned rectangle, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Area shared with `other` (zero when they only touch).
    pub fn overlap_area(&self, other: &Rect) -> f64 {
        let w = self.right().min(other.right()) - self.x.max(other.x);
        let h = self.bottom().min(other.bottom()) - self.y.max(other.y);
        if w > 0.0 && h > 0.0 {
            w * h
        } else {
            0.0
        }
    }

    /// Shrink by `pad` on every side, never below zero size.
    pub fn inset(&self, pad: f64) -> Rect {
        Rect::new(
            self.x + pad,
            self.y + pad,
            (self.w - 2.0 * pad).max(0.0),
            (self.h - 2.0 * pad).max(0.0),
        )
    }
}

/// One laid-out rectangle and the position of its weight in the input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutCell {
    pub index: usize,
    pub rect: Rect,
}

/// Lay out `weights` inside `bounds`.
///
/// Non-finite and non-positive weights produce no cell. A degenerate target
/// (zero width or height) yields a zero-area cell at the origin for every
/// positive weight.
pub fn squarify(weights: &[f64], bounds: Rect) -> Vec<LayoutCell> {
    let positive: Vec<(usize, f64)> = weights
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, w)| w.is_finite() && w > 0.0)
        .collect();
    if positive.is_empty() {
        return Vec::new();
    }

    let area = bounds.area();
    if !is_positive(area) {
        return positive
            .into_iter()
            .map(|(index, _)| LayoutCell {
                index,
                rect: Rect::new(bounds.x, bounds.y, 0.0, 0.0),
            })
            .collect();
    }

    // Normalize so the weights sum to the target area.
    let sum: f64 = positive.iter().map(|&(_, w)| w).sum();
    let scale = area / sum;

    let mut cells = Vec::with_capacity(positive.len());
    let mut remaining = bounds;
    let mut row_index: Vec<usize> = Vec::new();
    let mut row_area: Vec<f64> = Vec::new();

    for (index, weight) in positive {
        let scaled = weight * scale;
        if row_area.is_empty() {
            row_index.push(index);
            row_area.push(scaled);
            continue;
        }

        let side = remaining.w.min(remaining.h);
        let current = worst_ratio(&row_area, side);
        row_area.push(scaled);
        let with_candidate = worst_ratio(&row_area, side);

        if with_candidate > current {
            row_area.pop();
            remaining = layout_row(&row_index, &row_area, remaining, false, &mut cells);
            row_index.clear();
            row_area.clear();
            row_area.push(scaled);
        }
        row_index.push(index);
    }

    if !row_area.is_empty() {
        layout_row(&row_index, &row_area, remaining, true, &mut cells);
    }

    cells
}

/// `false` for zero, negatives and NaN.
#[inline]
fn is_positive(v: f64) -> bool {
    v > 0.0
}

/// Worst aspect ratio of a row of areas laid along a side of length `side`:
/// `max(side² · max / sum², sum² / (side² · min))`.
///
/// Any degenerate input (empty row, non-positive side or area) yields
/// `f64::INFINITY`, which keeps the accept/commit decision well-defined.
pub fn worst_ratio(areas: &[f64], side: f64) -> f64 {
    if areas.is_empty() || !is_positive(side) {
        return f64::INFINITY;
    }
    let (mut sum, mut max, mut min) = (0.0_f64, f64::MIN, f64::MAX);
    for &a in areas {
        sum += a;
        max = max.max(a);
        min = min.min(a);
    }
    if !is_positive(min) {
        return f64::INFINITY;
    }
    let side2 = side * side;
    let sum2 = sum * sum;
    (side2 * max / sum2).max(sum2 / (side2 * min))
}

/// Commit one row as a strip along the shorter side of `remaining` and
/// return what is left.
///
/// Wide rectangles get a vertical strip on the left; tall ones a horizontal
/// strip on top. Items are stacked along the strip in row order.
fn layout_row(
    indices: &[usize],
    areas: &[f64],
    remaining: Rect,
    is_last_row: bool,
    cells: &mut Vec<LayoutCell>,
) -> Rect {
    let sum: f64 = areas.iter().sum();
    let last = indices.len().saturating_sub(1);

    if remaining.w >= remaining.h {
        let strip_w = if is_last_row || !is_positive(remaining.h) {
            remaining.w
        } else {
            (sum / remaining.h).min(remaining.w)
        };
        let mut y = remaining.y;
        for (k, (&index, &a)) in indices.iter().zip(areas).enumerate() {
            let h = if k == last {
                remaining.bottom() - y
            } else {
                remaining.h * a / sum
            };
            cells.push(LayoutCell {
                index,
                rect: Rect::new(remaining.x, y, strip_w, h.max(0.0)),
            });
            y += h;
        }
        Rect::new(
            remaining.x + strip_w,
            remaining.y,
            (remaining.w - strip_w).max(0.0),
            remaining.h,
        )
    } else {
        let strip_h = if is_last_row || !is_positive(remaining.w) {
            remaining.h
        } else {
            (sum / remaining.w).min(remaining.h)
        };
        let mut x = remaining.x;
        for (k, (&index, &a)) in indices.iter().zip(areas).enumerate() {
            let w = if k == last {
                remaining.right() - x
            } else {
                remaining.w * a / sum
            };
            cells.push(LayoutCell {
                index,
                rect: Rect::new(x, remaining.y, w.max(0.0), strip_h),
            });
            x += w;
        }
        Rect::new(
            remaining.x,
            remaining.y + strip_h,
            remaining.w,
            (remaining.h - strip_h).max(0.0),
        )
    }
}
