//! Binary morphology on foreground masks: Erode, Dilate, Open, Close, Fill Holes.
//!
//! All operators use the full 3x3 (8-connected) structuring element.
//! Pixels outside the mask are treated as background, so erosion always
//! clears the outermost ring of a mask that touches the raster edge.
//!
//! Every operator returns a new mask; the input is never modified.

use std::collections::VecDeque;

use ndarray::{Array2, ArrayView2};

/// Offsets of the 3x3 structuring element, centre included.
#[rustfmt::skip]
const STRUCTURE_3X3: [(isize, isize); 9] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1), (0, 0), (0, 1),
    (1, -1), (1, 0), (1, 1),
];

// ============================================================================
// Erode / Dilate
// ============================================================================

/// Erode a binary mask.
///
/// A pixel stays foreground only if every pixel under the structuring
/// element is foreground. Out-of-bounds neighbors count as background.
pub fn erode_mask(input: ArrayView2<bool>) -> Array2<bool> {
    let (height, width) = input.dim();
    let mut output = Array2::<bool>::from_elem((height, width), false);

    for y in 0..height {
        for x in 0..width {
            if !input[[y, x]] {
                continue;
            }

            let mut keep = true;
            for &(dy, dx) in STRUCTURE_3X3.iter() {
                let sy = y as isize + dy;
                let sx = x as isize + dx;
                if sy < 0 || sy >= height as isize || sx < 0 || sx >= width as isize {
                    keep = false; // Treat out-of-bounds as background
                    break;
                }
                if !input[[sy as usize, sx as usize]] {
                    keep = false;
                    break;
                }
            }

            output[[y, x]] = keep;
        }
    }

    output
}

/// Dilate a binary mask.
///
/// A pixel becomes foreground if any pixel under the structuring element
/// is foreground.
pub fn dilate_mask(input: ArrayView2<bool>) -> Array2<bool> {
    let (height, width) = input.dim();
    let mut output = Array2::<bool>::from_elem((height, width), false);

    for y in 0..height {
        for x in 0..width {
            if !input[[y, x]] {
                continue;
            }

            for &(dy, dx) in STRUCTURE_3X3.iter() {
                let sy = y as isize + dy;
                let sx = x as isize + dx;
                if sy < 0 || sy >= height as isize || sx < 0 || sx >= width as isize {
                    continue;
                }
                output[[sy as usize, sx as usize]] = true;
            }
        }
    }

    output
}

// ============================================================================
// Open / Close
// ============================================================================

/// Morphological opening: erode then dilate.
///
/// Removes foreground specks narrower than the structuring element. The
/// result is always a subset of the input foreground.
pub fn open_mask(input: ArrayView2<bool>) -> Array2<bool> {
    let eroded = erode_mask(input);
    dilate_mask(eroded.view())
}

/// Morphological closing: dilate then erode.
///
/// Fills pinholes and narrow gaps inside foreground blobs.
pub fn close_mask(input: ArrayView2<bool>) -> Array2<bool> {
    let dilated = dilate_mask(input);
    erode_mask(dilated.view())
}

// ============================================================================
// Fill Holes
// ============================================================================

/// Fill background regions that cannot be reached from the raster border.
///
/// Background is flooded from every border pixel through 4-connected
/// background paths; anything left unreached is enclosed by foreground and
/// becomes foreground. Hole size is unbounded.
pub fn fill_holes(input: ArrayView2<bool>) -> Array2<bool> {
    let (height, width) = input.dim();
    let mut reached = vec![false; width * height];
    let mut queue = VecDeque::new();

    let mut seed = |x: usize, y: usize, queue: &mut VecDeque<(usize, usize)>| {
        let idx = y * width + x;
        if !input[[y, x]] && !reached[idx] {
            reached[idx] = true;
            queue.push_back((x, y));
        }
    };

    for x in 0..width {
        seed(x, 0, &mut queue);
        if height > 1 {
            seed(x, height - 1, &mut queue);
        }
    }
    for y in 0..height {
        seed(0, y, &mut queue);
        if width > 1 {
            seed(width - 1, y, &mut queue);
        }
    }

    while let Some((x, y)) = queue.pop_front() {
        for (dx, dy) in &[(-1i32, 0i32), (1, 0), (0, -1), (0, 1)] {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;

            if nx >= 0 && nx < width as i32 && ny >= 0 && ny < height as i32 {
                let nx = nx as usize;
                let ny = ny as usize;
                let nidx = ny * width + nx;
                if !reached[nidx] && !input[[ny, nx]] {
                    reached[nidx] = true;
                    queue.push_back((nx, ny));
                }
            }
        }
    }

    Array2::from_shape_fn((height, width), |(y, x)| !reached[y * width + x])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_from(rows: &[&str]) -> Array2<bool> {
        let height = rows.len();
        let width = rows[0].len();
        Array2::from_shape_fn((height, width), |(y, x)| rows[y].as_bytes()[x] == b'#')
    }

    fn count(mask: &Array2<bool>) -> usize {
        mask.iter().filter(|&&v| v).count()
    }

    #[test]
    fn test_erode_removes_single_pixel() {
        let mask = mask_from(&[
            ".....",
            ".....",
            "..#..",
            ".....",
            ".....",
        ]);

        let result = erode_mask(mask.view());

        assert_eq!(count(&result), 0);
    }

    #[test]
    fn test_erode_keeps_centre_of_block() {
        let mask = mask_from(&[
            ".....",
            ".###.",
            ".###.",
            ".###.",
            ".....",
        ]);

        let result = erode_mask(mask.view());

        assert_eq!(count(&result), 1);
        assert!(result[[2, 2]]);
    }

    #[test]
    fn test_erode_treats_outside_as_background() {
        let mask = Array2::<bool>::from_elem((4, 4), true);

        let result = erode_mask(mask.view());

        assert_eq!(count(&result), 4);
        assert!(!result[[0, 0]]);
        assert!(result[[1, 1]]);
        assert!(result[[2, 2]]);
    }

    #[test]
    fn test_dilate_grows_to_3x3() {
        let mask = mask_from(&[
            ".....",
            ".....",
            "..#..",
            ".....",
            ".....",
        ]);

        let result = dilate_mask(mask.view());

        assert_eq!(count(&result), 9);
        assert!(result[[1, 1]]);
        assert!(result[[3, 3]]);
        assert!(!result[[0, 2]]);
    }

    #[test]
    fn test_open_removes_speckle_keeps_block() {
        let mask = mask_from(&[
            "#.......",
            "........",
            "...###..",
            "...###..",
            "...###..",
            "........",
            "......#.",
        ]);

        let result = open_mask(mask.view());

        assert!(!result[[0, 0]]);
        assert!(!result[[6, 6]]);
        assert_eq!(count(&result), 9);
        assert!(result[[2, 3]] && result[[4, 5]]);
    }

    #[test]
    fn test_open_never_adds_foreground() {
        let mask = mask_from(&[
            "##..#####.",
            "##..#####.",
            "....##.##.",
            "#...#####.",
            ".#..#####.",
            "..#.......",
            "...####...",
            "...####...",
            "...####..#",
        ]);

        let result = open_mask(mask.view());

        for ((y, x), &v) in result.indexed_iter() {
            if v {
                assert!(mask[[y, x]], "opening added ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_close_fills_pinhole() {
        let mask = mask_from(&[
            ".......",
            ".#####.",
            ".#####.",
            ".##.##.",
            ".#####.",
            ".#####.",
            ".......",
        ]);

        let result = close_mask(mask.view());

        assert!(result[[3, 3]]);
        assert_eq!(result, {
            let mut expected = mask.clone();
            expected[[3, 3]] = true;
            expected
        });
    }

    #[test]
    fn test_fill_holes_ring() {
        let mask = mask_from(&[
            "...........",
            ".#########.",
            ".#########.",
            ".##.....##.",
            ".##.....##.",
            ".##.....##.",
            ".#########.",
            ".#########.",
            "...........",
        ]);

        let result = fill_holes(mask.view());

        for y in 3..6 {
            for x in 3..8 {
                assert!(result[[y, x]], "hole pixel ({}, {}) not filled", x, y);
            }
        }
        for x in 0..11 {
            assert!(!result[[0, x]]);
            assert!(!result[[8, x]]);
        }
        for y in 0..9 {
            assert!(!result[[y, 0]]);
            assert!(!result[[y, 10]]);
        }
        assert_eq!(count(&result), 7 * 9);
    }

    #[test]
    fn test_fill_holes_leaves_open_bay() {
        let mask = mask_from(&[
            "#####",
            "#...#",
            "#...#",
            "#...#",
            "##.##",
        ]);

        let result = fill_holes(mask.view());

        assert_eq!(result, mask);
    }

    #[test]
    fn test_fill_holes_diagonal_gap_is_sealed() {
        // Background can only leak through edges, not corners
        let mask = mask_from(&[
            ".....",
            "..#..",
            ".#.#.",
            "..#..",
            ".....",
        ]);

        let result = fill_holes(mask.view());

        assert!(result[[2, 2]]);
        assert_eq!(count(&result), 5);
    }
}
