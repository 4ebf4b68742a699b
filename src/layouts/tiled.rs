use tracing::debug;

use crate::types::Geometry;

/// Splits `area` into master-stack tiles for `n` windows.
///
/// The first window gets the left half, the rest share the right half
/// top to bottom with equal heights. Pixels left over by the integer
/// division stay unused at the bottom. Every returned geometry has
/// the border subtracted from both axes, so the outer extents of the
/// windows tile `area`.
pub(super) fn master_stack(n: usize, area: Geometry, border: i32) -> Vec<Geometry> {
    let inset = border * 2;

    match n {
        0 => Vec::new(),
        1 => {
            debug!("Only master exists, tiling to full area");
            vec![Geometry::new(
                area.x,
                area.y,
                (area.width - inset).max(1),
                (area.height - inset).max(1),
            )]
        }
        n => {
            debug!("{} windows tiled, recalculating", n);

            let half = area.width / 2;
            let stack = (n - 1) as i32;
            let height = area.height / stack;

            let mut ret = Vec::with_capacity(n);
            ret.push(Geometry::new(
                area.x,
                area.y,
                (half - inset).max(1),
                (area.height - inset).max(1),
            ));

            for i in 0..stack {
                ret.push(Geometry::new(
                    area.x + half,
                    area.y + i * height,
                    (half - inset).max(1),
                    (height - inset).max(1),
                ));
            }

            ret
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1280x800 screen below a 20px bar
    const AREA: Geometry = Geometry { x: 0, y: 20, width: 1280, height: 780 };

    #[test]
    fn test_no_windows() {
        assert!(master_stack(0, AREA, 3).is_empty());
    }

    #[test]
    fn test_single_window_fills_area() {
        assert_eq!(master_stack(1, AREA, 3), vec![Geometry::new(0, 20, 1274, 774)]);
    }

    #[test]
    fn test_three_windows() {
        let geoms = master_stack(3, AREA, 3);
        assert_eq!(geoms.len(), 3);

        // master: left half minus borders
        assert_eq!(geoms[0], Geometry::new(0, 20, 1280 / 2 - 6, 780 - 6));
        assert_eq!(geoms[0], Geometry::new(0, 20, 634, 774));

        // stack: right half, height split evenly
        let height = 780 / 2;
        for (k, g) in geoms[1..].iter().enumerate() {
            assert_eq!(g.x, 640);
            assert_eq!(g.y, 20 + k as i32 * height);
            assert_eq!(g.width, 634);
            assert_eq!(g.height, height - 6);
            assert_eq!(g.height, 384);
        }
    }

    #[test]
    fn test_remainder_is_left_unused() {
        // 780 / 7 leaves 3 pixels over
        let geoms = master_stack(8, AREA, 3);
        let last = geoms.last().unwrap();

        assert_eq!(last.y, 20 + 6 * 111);
        assert_eq!(last.y + last.height + 6, 20 + 7 * 111);
        assert!(last.y + last.height + 6 < AREA.y + AREA.height);
    }
}
