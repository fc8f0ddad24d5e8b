//! Window placement rules

use crate::{
    config::DesktopConfig,
    types::{Point, Size, Viewport},
};

/// Where a new window lands
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub size: Size,
    pub origin: Point,
    /// Placed with the narrow (mobile) rules
    pub narrow: bool,
}

pub fn is_narrow(viewport: Viewport, config: &DesktopConfig) -> bool {
    viewport.width <= config.narrow_breakpoint
}

/// Clamp a requested size to the viewport and center it.
///
/// Narrow viewports get a fixed-width window pinned near the top; wide ones
/// keep the requested size as long as it fits inside the margins.
pub fn place(requested: Size, viewport: Viewport, config: &DesktopConfig) -> Placement {
    if is_narrow(viewport, config) {
        let width = viewport.width * config.narrow_width_ratio;
        let height = requested.height.min(viewport.height * config.narrow_height_ratio);
        let top = config.min_offset.max(viewport.height * config.narrow_top_ratio);
        let left = (viewport.width - width) / 2.0;

        Placement {
            size: Size::new(width, height),
            origin: Point::new(left, top),
            narrow: true,
        }
    } else {
        let width = requested.width.min(viewport.width - config.horizontal_margin).max(0.0);
        let height = requested.height.min(viewport.height - config.vertical_margin).max(0.0);
        let left = config.min_offset.max((viewport.width - width) / 2.0);
        let top = config.min_offset.max((viewport.height - height) / 2.0);

        Placement {
            size: Size::new(width, height),
            origin: Point::new(left, top),
            narrow: false,
        }
    }
}

/// Keep a window of `size` inside `surface`.
///
/// Left and top are clamped to `[0, surface - size]`; a window larger than
/// the surface is pinned to 0 on that axis.
pub fn clamp_origin(origin: Point, size: Size, surface: Viewport) -> Point {
    let max_x = (surface.width - size.width).max(0.0);
    let max_y = (surface.height - size.height).max(0.0);
    Point::new(origin.x.clamp(0.0, max_x), origin.y.clamp(0.0, max_y))
}

/// Shrink `size` so it fits inside `surface`
pub fn clamp_size(size: Size, surface: Viewport) -> Size {
    Size::new(size.width.min(surface.width), size.height.min(surface.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_layout_keeps_requested_size() {
        let placement = place(Size::new(800.0, 600.0), Viewport::DESKTOP_1080P, &DesktopConfig::default());
        assert!(!placement.narrow);
        assert_eq!(placement.size, Size::new(800.0, 600.0));
        assert_eq!(placement.origin, Point::new(560.0, 240.0));
    }

    #[test]
    fn test_wide_layout_clamps_oversized_request() {
        let viewport = Viewport::new(1024.0, 700.0);
        let placement = place(Size::new(4000.0, 3000.0), viewport, &DesktopConfig::default());
        assert_eq!(placement.size, Size::new(984.0, 600.0));
        assert_eq!(placement.origin, Point::new(20.0, 50.0));
    }

    #[test]
    fn test_narrow_layout() {
        let placement = place(Size::new(400.0, 600.0), Viewport::new(400.0, 800.0), &DesktopConfig::default());
        assert!(placement.narrow);
        assert_eq!(placement.size, Size::new(360.0, 600.0));
        assert_eq!(placement.origin, Point::new(20.0, 80.0));

        let short = place(Size::new(400.0, 600.0), Viewport::new(400.0, 500.0), &DesktopConfig::default());
        assert_eq!(short.size.height, 400.0);
        assert_eq!(short.origin.y, 50.0);
    }

    #[test]
    fn test_clamp_origin() {
        let surface = Viewport::new(1000.0, 800.0);
        let size = Size::new(400.0, 300.0);
        assert_eq!(clamp_origin(Point::new(-50.0, 900.0), size, surface), Point::new(0.0, 500.0));
        assert_eq!(clamp_origin(Point::new(700.0, 10.0), size, surface), Point::new(600.0, 10.0));

        let huge = Size::new(2000.0, 2000.0);
        assert_eq!(clamp_origin(Point::new(30.0, 30.0), huge, surface), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_clamp_size() {
        let surface = Viewport::new(600.0, 400.0);
        assert_eq!(clamp_size(Size::new(800.0, 300.0), surface), Size::new(600.0, 300.0));
        assert_eq!(clamp_size(Size::new(250.0, 160.0), surface), Size::new(250.0, 160.0));
    }
}
