//! Shape generation for 2D primitives
//!
//! Everything here emits triangle lists in canvas space (y down).

use glam::Vec2;

use super::vertex::Vertex;
use crate::sim::Aabb;

/// Two triangles covering an axis-aligned rectangle
pub fn rect(pos: Vec2, size: Vec2, color: [f32; 4]) -> [Vertex; 6] {
    gradient_rect(pos, size, color, color)
}

/// Rectangle blending from `top` to `bottom`
pub fn gradient_rect(pos: Vec2, size: Vec2, top: [f32; 4], bottom: [f32; 4]) -> [Vertex; 6] {
    let (x0, y0) = (pos.x, pos.y);
    let (x1, y1) = (pos.x + size.x, pos.y + size.y);
    [
        Vertex::new(x0, y0, top),
        Vertex::new(x1, y0, top),
        Vertex::new(x0, y1, bottom),
        Vertex::new(x0, y1, bottom),
        Vertex::new(x1, y0, top),
        Vertex::new(x1, y1, bottom),
    ]
}

/// Filled box
pub fn aabb(b: &Aabb, color: [f32; 4]) -> [Vertex; 6] {
    rect(b.pos, b.size, color)
}

/// Horizontal stroke centered on `y`
pub fn hline(x0: f32, x1: f32, y: f32, width: f32, color: [f32; 4]) -> [Vertex; 6] {
    rect(
        Vec2::new(x0, y - width / 2.0),
        Vec2::new(x1 - x0, width),
        color,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_corners() {
        let verts = rect(Vec2::new(10.0, 20.0), Vec2::new(5.0, 2.0), [1.0; 4]);
        let xs: Vec<f32> = verts.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = verts.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 15.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 22.0);
    }

    #[test]
    fn test_gradient_colors_follow_rows() {
        let top = [1.0, 0.0, 0.0, 1.0];
        let bottom = [0.0, 0.0, 1.0, 1.0];
        for v in gradient_rect(Vec2::ZERO, Vec2::new(4.0, 4.0), top, bottom) {
            let expected = if v.position[1] == 0.0 { top } else { bottom };
            assert_eq!(v.color, expected);
        }
    }

    #[test]
    fn test_hline_thickness() {
        let verts = hline(0.0, 800.0, 287.0, 2.0, [1.0; 4]);
        assert!(verts.iter().all(|v| (286.0..=288.0).contains(&v.position[1])));
    }
}
