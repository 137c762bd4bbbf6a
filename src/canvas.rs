//! Canvas widget drawing the cube and forwarding pointer input.

use iced::widget::canvas::{self, Frame, Geometry, Path};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme, mouse};

use crate::Message;
use crate::input::{MouseButton, MouseEvent};
use crate::player::Player;
use crate::scene::RenderMode;
use crate::surface::SoftwareSurface;

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PointerKind {
    Pressed,
    Moved,
    Released,
}

/// Pointer event in canvas coordinates, with the canvas size at the time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Pointer {
    pub(crate) kind: PointerKind,
    pub(crate) event: MouseEvent,
    pub(crate) size: Size,
}

pub(crate) struct CubeCanvas<'a> {
    player: &'a Player<SoftwareSurface>,
    render_mode: RenderMode,
}

impl<'a> CubeCanvas<'a> {
    pub(crate) fn new(player: &'a Player<SoftwareSurface>, render_mode: RenderMode) -> Self {
        Self { player, render_mode }
    }
}

fn convert_button(button: mouse::Button) -> MouseButton {
    match button {
        mouse::Button::Left => MouseButton::Left,
        mouse::Button::Right => MouseButton::Right,
        mouse::Button::Middle => MouseButton::Middle,
        _ => MouseButton::Other,
    }
}

impl canvas::Program<Message> for CubeCanvas<'_> {
    type State = ();

    fn update(
        &self,
        _state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: mouse::Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        let canvas::Event::Mouse(mouse_event) = event else {
            return (canvas::event::Status::Ignored, None);
        };
        // relative to the canvas even when the drag leaves it
        let Some(position) = cursor.position().map(|p| Point::new(p.x - bounds.x, p.y - bounds.y)) else {
            return (canvas::event::Status::Ignored, None);
        };

        let (kind, button) = match mouse_event {
            mouse::Event::ButtonPressed(button) => {
                if cursor.position_in(bounds).is_none() {
                    return (canvas::event::Status::Ignored, None);
                }
                (PointerKind::Pressed, convert_button(button))
            }
            mouse::Event::ButtonReleased(button) => (PointerKind::Released, convert_button(button)),
            mouse::Event::CursorMoved { .. } => (PointerKind::Moved, MouseButton::Left),
            _ => return (canvas::event::Status::Ignored, None),
        };

        let pointer = Pointer {
            kind,
            event: MouseEvent::new(position.x, position.y, button),
            size: bounds.size(),
        };
        (canvas::event::Status::Captured, Some(Message::Pointer(pointer)))
    }

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        frame.fill_rectangle(Point::ORIGIN, bounds.size(), Color::WHITE);

        for quad in self
            .player
            .screen_quads(self.render_mode, (bounds.width, bounds.height))
        {
            let [first, rest @ ..] = quad.corners;
            let path = Path::new(|builder| {
                builder.move_to(Point::new(first[0], first[1]));
                for [x, y] in rest {
                    builder.line_to(Point::new(x, y));
                }
                builder.close();
            });
            let c = quad.color;
            frame.fill(&path, Color::from_rgba(c.x, c.y, c.z, c.w));
        }

        vec![frame.into_geometry()]
    }
}
