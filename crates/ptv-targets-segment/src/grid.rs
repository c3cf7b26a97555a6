//! Scan window and the mutable working copy of the image.

use ptv_targets_core::GrayImageView;

use crate::params::Roi;

/// ROI clamped into the image with a one-pixel safety margin.
///
/// Every pixel inside the window has all eight neighbours inside the image,
/// so seed and ridge tests never read out of bounds. Bounds are inclusive;
/// a blob whose bounding box reaches any of them is treated as truncated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ScanWindow {
    pub xmin: usize,
    pub xmax: usize,
    pub ymin: usize,
    pub ymax: usize,
}

impl ScanWindow {
    /// `None` when the clamped window is empty (including images under 3x3).
    pub fn clamp(roi: Option<Roi>, width: usize, height: usize) -> Option<Self> {
        if width < 3 || height < 3 {
            return None;
        }
        let roi = roi.unwrap_or_else(|| Roi::full(width, height));
        let window = Self {
            xmin: roi.xmin.max(1),
            xmax: roi.xmax.min(width - 2),
            ymin: roi.ymin.max(1),
            ymax: roi.ymax.min(height - 2),
        };
        (window.xmin <= window.xmax && window.ymin <= window.ymax).then_some(window)
    }

    #[inline]
    pub fn contains(&self, x: usize, y: usize) -> bool {
        (self.xmin..=self.xmax).contains(&x) && (self.ymin..=self.ymax).contains(&y)
    }

    #[inline]
    pub fn touches_edge(&self, bbox: &BoundingBox) -> bool {
        bbox.xmin == self.xmin
            || bbox.xmax == self.xmax
            || bbox.ymin == self.ymin
            || bbox.ymax == self.ymax
    }
}

/// Inclusive pixel bounding box of a growing blob.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BoundingBox {
    pub xmin: usize,
    pub xmax: usize,
    pub ymin: usize,
    pub ymax: usize,
}

impl BoundingBox {
    pub fn at(x: usize, y: usize) -> Self {
        Self {
            xmin: x,
            xmax: x,
            ymin: y,
            ymax: y,
        }
    }

    #[inline]
    pub fn include(&mut self, x: usize, y: usize) {
        self.xmin = self.xmin.min(x);
        self.xmax = self.xmax.max(x);
        self.ymin = self.ymin.min(y);
        self.ymax = self.ymax.max(y);
    }

    pub fn width(&self) -> u32 {
        (self.xmax - self.xmin + 1) as u32
    }

    pub fn height(&self) -> u32 {
        (self.ymax - self.ymin + 1) as u32
    }
}

/// Private copy of the input image; claimed pixels are set to zero.
pub(crate) struct WorkingGrid {
    width: usize,
    data: Vec<u8>,
}

impl WorkingGrid {
    pub fn copy_of(image: &GrayImageView<'_>) -> Self {
        Self {
            width: image.width,
            data: image.data.to_vec(),
        }
    }

    #[inline]
    pub fn at(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn claim(&mut self, x: usize, y: usize) {
        self.data[y * self.width + x] = 0;
    }

    /// `gv >= ` all eight neighbours. Caller guarantees `(x, y)` is inside a
    /// [`ScanWindow`].
    #[inline]
    pub fn is_local_max(&self, x: usize, y: usize) -> bool {
        let gv = self.at(x, y);
        [
            (x - 1, y),
            (x + 1, y),
            (x, y - 1),
            (x, y + 1),
            (x - 1, y - 1),
            (x - 1, y + 1),
            (x + 1, y - 1),
            (x + 1, y + 1),
        ]
        .into_iter()
        .all(|(nx, ny)| gv >= self.at(nx, ny))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ptv_targets_core::GrayImage;

    #[test]
    fn window_keeps_one_pixel_margin() {
        let w = ScanWindow::clamp(None, 10, 8).expect("non-empty");
        assert_eq!(
            w,
            ScanWindow {
                xmin: 1,
                xmax: 8,
                ymin: 1,
                ymax: 6
            }
        );
        let w = ScanWindow::clamp(Some(Roi::new(0, 100, 3, 4)), 10, 8).expect("non-empty");
        assert_eq!((w.xmin, w.xmax, w.ymin, w.ymax), (1, 8, 3, 4));
    }

    #[test]
    fn window_empty_for_tiny_or_outside_roi() {
        assert!(ScanWindow::clamp(None, 2, 10).is_none());
        assert!(ScanWindow::clamp(Some(Roi::new(20, 30, 1, 5)), 10, 10).is_none());
    }

    #[test]
    fn claim_does_not_touch_source() {
        let img = GrayImage::from_raw(3, 3, vec![1, 2, 3, 4, 9, 6, 7, 8, 9]).expect("image");
        let view = img.view();
        let mut grid = WorkingGrid::copy_of(&view);
        assert!(grid.is_local_max(1, 1));
        grid.claim(1, 1);
        assert_eq!(grid.at(1, 1), 0);
        assert_eq!(view.at(1, 1), 9);
    }

    #[test]
    fn bounding_box_extends() {
        let mut bbox = BoundingBox::at(5, 5);
        bbox.include(3, 7);
        bbox.include(6, 4);
        assert_eq!((bbox.width(), bbox.height()), (4, 4));
    }
}
