/// A point in 2D space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Affine transformation matrix `[a b c d e f]`.
///
/// Maps `(x, y)` to `(a*x + c*y + e, b*x + d*y + f)`. Used for the current
/// transformation matrix, the text matrix and the text rendering matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ctm {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Ctm {
    fn default() -> Self {
        Self::identity()
    }
}

impl Ctm {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Build from the six operands of a `cm`/`Tm` operator.
    pub fn from_array(arr: [f64; 6]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3], arr[4], arr[5])
    }

    pub fn to_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// `self x other`: apply `self` first, then `other`.
    pub fn concat(&self, other: &Ctm) -> Ctm {
        Ctm {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn transform_point(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }
}

/// Bounding box with top-left origin coordinate system.
///
/// - `x0`: left edge
/// - `top`: top edge (distance from top of page)
/// - `x1`: right edge
/// - `bottom`: bottom edge (distance from top of page)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl BBox {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn center_x(&self) -> f64 {
        (self.x0 + self.x1) / 2.0
    }

    pub fn center_y(&self) -> f64 {
        (self.top + self.bottom) / 2.0
    }

    /// Compute the union of two bounding boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            top: self.top.min(other.top),
            x1: self.x1.max(other.x1),
            bottom: self.bottom.max(other.bottom),
        }
    }

    /// Whether the point lies inside the box grown by `tolerance` on every side.
    pub fn contains_point(&self, x: f64, y: f64, tolerance: f64) -> bool {
        x >= self.x0 - tolerance
            && x <= self.x1 + tolerance
            && y >= self.top - tolerance
            && y <= self.bottom + tolerance
    }

    /// Union of all boxes, `None` for an empty iterator.
    pub fn union_all<'a>(boxes: impl IntoIterator<Item = &'a BBox>) -> Option<BBox> {
        boxes
            .into_iter()
            .fold(None, |acc: Option<BBox>, b| match acc {
                Some(u) => Some(u.union(b)),
                None => Some(*b),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_dimensions() {
        let bbox = BBox::new(10.0, 20.0, 50.0, 60.0);
        assert_eq!(bbox.width(), 40.0);
        assert_eq!(bbox.height(), 40.0);
        assert_eq!(bbox.center_x(), 30.0);
        assert_eq!(bbox.center_y(), 40.0);
    }

    #[test]
    fn test_bbox_union() {
        let a = BBox::new(10.0, 20.0, 30.0, 40.0);
        let b = BBox::new(5.0, 25.0, 35.0, 45.0);
        assert_eq!(a.union(&b), BBox::new(5.0, 20.0, 35.0, 45.0));
    }

    #[test]
    fn test_bbox_union_all() {
        let boxes = [
            BBox::new(10.0, 20.0, 30.0, 40.0),
            BBox::new(0.0, 30.0, 15.0, 50.0),
        ];
        assert_eq!(
            BBox::union_all(&boxes),
            Some(BBox::new(0.0, 20.0, 30.0, 50.0))
        );
        assert_eq!(BBox::union_all(std::iter::empty()), None);
    }

    #[test]
    fn test_contains_point_with_tolerance() {
        let bbox = BBox::new(10.0, 10.0, 20.0, 20.0);
        assert!(bbox.contains_point(15.0, 15.0, 0.0));
        assert!(!bbox.contains_point(21.0, 15.0, 0.0));
        assert!(bbox.contains_point(21.0, 15.0, 2.0));
    }

    #[test]
    fn test_ctm_concat_translation_then_scale() {
        let translate = Ctm::new(1.0, 0.0, 0.0, 1.0, 10.0, 20.0);
        let scale = Ctm::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        let m = translate.concat(&scale);
        let p = m.transform_point(Point::new(1.0, 1.0));
        assert_eq!(p, Point::new(22.0, 42.0));
    }

    #[test]
    fn test_ctm_identity_roundtrip_array() {
        let m = Ctm::from_array([1.0, 0.0, 0.0, 1.0, 5.0, 6.0]);
        assert_eq!(m.to_array(), [1.0, 0.0, 0.0, 1.0, 5.0, 6.0]);
        assert_eq!(Ctm::default(), Ctm::identity());
    }
}
