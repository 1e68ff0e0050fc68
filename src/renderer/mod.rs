//! CPU-side geometry for a frame view
//!
//! Turns a `FrameView` into one triangle list in normalized device
//! coordinates, shake offset applied. Text is left to the presentation layer.

pub mod shapes;
pub mod vertex;

pub use vertex::Vertex;

use glam::Vec2;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::frame::FrameView;
use crate::sim::Rect;

/// Build the triangle list for a frame: clear quad, sprites, then fragments.
/// Shapes are laid out in screen pixels and mapped to NDC at the end.
pub fn frame_vertices(view: &FrameView) -> Vec<Vertex> {
    let offset = Vec2::new(view.shake.0 as f32, view.shake.1 as f32);
    let mut vertices = Vec::with_capacity(6 * (view.sprites.len() + 1) + 36 * view.fragments.len());

    let screen = Rect::new(0.0, 0.0, SCREEN_WIDTH, SCREEN_HEIGHT);
    vertices.extend(shapes::rect(&screen, offset, view.background.to_f32(1.0)));

    for sprite in &view.sprites {
        vertices.extend(shapes::rect(&sprite.rect, offset, sprite.color.to_f32(1.0)));
    }

    for dot in view.fragments.iter().filter(|d| d.radius > 0.0) {
        vertices.extend(shapes::circle(
            dot.pos + offset,
            dot.radius,
            dot.color.to_f32(1.0),
            shapes::circle_segments(dot.radius),
        ));
    }

    for v in &mut vertices {
        v.position = to_ndc(v.position);
    }
    vertices
}

/// Map a screen-pixel position to normalized device coordinates
pub fn to_ndc(position: [f32; 2]) -> [f32; 2] {
    [
        position[0] / SCREEN_WIDTH * 2.0 - 1.0,
        1.0 - position[1] / SCREEN_HEIGHT * 2.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScore;
    use crate::platform::{InputEvent, Key};
    use crate::screen::Game;
    use crate::settings::Settings;

    #[test]
    fn test_frame_vertices_cover_sprites() {
        let mut game = Game::new(Settings::default(), HighScore::new(), 3);
        game.handle_event(InputEvent::KeyPressed(Key::Other), 0);
        let view = game.frame(0);
        let vertices = frame_vertices(&view);
        assert_eq!(vertices.len(), 6 * (view.sprites.len() + 1));
        assert_eq!(vertices[0].color, view.background.to_f32(1.0));
    }

    #[test]
    fn test_frame_vertices_are_in_ndc() {
        let mut game = Game::new(Settings::default(), HighScore::new(), 3);
        game.handle_event(InputEvent::KeyPressed(Key::Other), 0);
        let view = game.frame(0);
        let vertices = frame_vertices(&view);

        // Clear quad spans the whole viewport
        assert_eq!(vertices[0].position, [-1.0, 1.0]);
        assert_eq!(vertices[5].position, [1.0, -1.0]);

        // Player is the last sprite: 50px square centered at (300, 200)
        let player = &vertices[vertices.len() - 6..];
        let top_left = to_ndc([275.0, 175.0]);
        assert_eq!(player[0].position, top_left);
        assert!((top_left[0] - (-0.083_333)).abs() < 1e-4);
        assert!((top_left[1] - 0.5625).abs() < 1e-6);
        assert!(
            vertices
                .iter()
                .all(|v| v.position.iter().all(|c| (-1.1..=1.1).contains(c)))
        );
    }

    #[test]
    fn test_ndc_corners() {
        assert_eq!(to_ndc([0.0, 0.0]), [-1.0, 1.0]);
        assert_eq!(to_ndc([SCREEN_WIDTH, SCREEN_HEIGHT]), [1.0, -1.0]);
    }
}
