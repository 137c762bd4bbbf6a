//! Interactive 3x3x3 cube player with iced UI.
//!
//! Drag a layer to turn it, drag the background to reorient the cube, type
//! an algorithm to watch it played, or scramble and reset the puzzle. Keys
//! `space a d e q s w` switch between fixed views.

use std::time::Instant;

use clap::Parser;
use iced::widget::{Canvas, Column, PickList, Row, button, container, text, text_input};
use iced::{Element, Length, Settings, Subscription, Task, keyboard};

mod camera;
mod canvas;
mod centers;
mod cli;
mod config;
mod cube;
mod error;
mod gesture;
mod input;
mod math;
mod mesh;
mod normals;
mod notation;
mod pattern;
mod picking;
mod player;
mod puzzle;
mod ray_casting;
mod scene;
mod scramble;
mod surface;

use crate::canvas::{CubeCanvas, Pointer, PointerKind};
use crate::config::PlayerConfig;
use crate::input::InputHandler;
use crate::notation::{Face, Move};
use crate::player::Player;
use crate::puzzle::PlaybackEvent;
use crate::scene::RenderMode;
use crate::surface::SoftwareSurface;

/// Initial drawing area size, until the canvas reports its bounds
const INITIAL_SIZE: (u32, u32) = (800, 600);

/// Main application state
pub(crate) struct CubeApp {
    player: Player<SoftwareSurface>,
    algorithm: String,
    render_mode: RenderMode,
    status: String,
}

/// Messages that the application can receive
#[derive(Debug, Clone)]
pub(crate) enum Message {
    Tick(Instant),
    Pointer(Pointer),
    Key(char),
    AlgorithmChanged(String),
    Play,
    Scramble,
    Reset,
    StepForward,
    Move(Move),
    RenderMode(RenderMode),
}

impl CubeApp {
    pub(crate) fn new(config: PlayerConfig) -> Self {
        let algorithm = config.alg.clone();
        let mut player = Player::new(config, INITIAL_SIZE.0, INITIAL_SIZE.1);
        let status = match player.start(SoftwareSurface::new()) {
            Ok(()) => String::new(),
            Err(err) => format!("Picking disabled: {err}"),
        };
        Self {
            player,
            algorithm,
            render_mode: RenderMode::Standard,
            status,
        }
    }

    pub(crate) fn title(&self) -> &'static str {
        "Cube Player"
    }

    pub(crate) fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Tick(now) => {
                for event in self.player.tick(now) {
                    match event {
                        PlaybackEvent::AlgorithmDone => {
                            if let Some(done) = self.status.strip_suffix("...") {
                                self.status = done.to_string();
                            }
                        }
                    }
                }
            }
            Message::Pointer(pointer) => {
                self.player
                    .resize(pointer.size.width as u32, pointer.size.height as u32);
                let now = Instant::now();
                match pointer.kind {
                    PointerKind::Pressed => self.player.start_rotate(&pointer.event, now),
                    PointerKind::Moved => self.player.rotate(&pointer.event, now),
                    PointerKind::Released => self.player.end_rotate(&pointer.event, now),
                };
            }
            Message::Key(key) => {
                self.player.toggle_perspective(key);
            }
            Message::AlgorithmChanged(value) => {
                self.algorithm = value;
            }
            Message::Play => {
                let alg = Player::<SoftwareSurface>::parse_algorithm(&self.algorithm);
                if self.player.do_algorithm(alg.clone()) {
                    self.status = format!("Playing {alg}...");
                }
            }
            Message::Scramble => {
                if self.player.scramble(None).is_some() {
                    self.status = "Scrambling...".to_string();
                }
            }
            Message::Reset => {
                self.player.reset();
                self.status.clear();
            }
            Message::StepForward => self.player.step_forward(),
            Message::Move(mv) => {
                self.player.do_algorithm(vec![mv]);
            }
            Message::RenderMode(mode) => {
                self.render_mode = mode;
            }
        }

        Task::none()
    }

    pub(crate) fn subscription(&self) -> Subscription<Message> {
        let keys = keyboard::on_key_press(|key, _modifiers| match key.as_ref() {
            keyboard::Key::Named(keyboard::key::Named::Space) => Some(Message::Key(' ')),
            keyboard::Key::Character(c) => c.chars().next().map(Message::Key),
            _ => None,
        });
        Subscription::batch([iced::window::frames().map(Message::Tick), keys])
    }

    fn move_buttons(&self) -> Column<'_, Message> {
        let idle = !self.player.cube().is_animating();
        let rows = [(false, 1), (true, 1), (false, 2)].map(|(inverse, count)| {
            Face::OUTER.iter().fold(Row::new().spacing(5), |row, &face| {
                let mv = Move::new(face, inverse, count);
                row.push(button(text(mv.to_string()))
                    .width(36)
                    .on_press_maybe(idle.then_some(Message::Move(mv))))
            })
        });
        rows.into_iter()
            .fold(Column::new().spacing(5), |column, row| column.push(row))
    }

    pub(crate) fn view(&self) -> Element<'_, Message> {
        let idle = !self.player.cube().is_animating();
        let turning = match self.player.cube().current_move() {
            Some(mv) => format!("Turning {mv}"),
            None => String::new(),
        };

        // Left pane with controls
        let controls = Column::new()
            .spacing(20)
            .width(250)
            .push(
                Column::new()
                    .spacing(5)
                    .push(text("Render Mode"))
                    .push(
                        PickList::new(&RenderMode::ALL[..], Some(self.render_mode), Message::RenderMode).width(250),
                    ),
            )
            .push(
                Column::new()
                    .spacing(5)
                    .push(text("Algorithm"))
                    .push(
                        text_input("R U R' U'", &self.algorithm)
                            .on_input(Message::AlgorithmChanged)
                            .on_submit(Message::Play),
                    )
                    .push(
                        Row::new()
                            .spacing(5)
                            .push(button("Play").on_press_maybe(idle.then_some(Message::Play)))
                            .push(button("Step").on_press(Message::StepForward))
                            .push(button("Scramble").on_press_maybe(idle.then_some(Message::Scramble)))
                            .push(button("Reset").on_press(Message::Reset)),
                    ),
            )
            .push(self.move_buttons())
            .push_maybe(
                self.player
                    .last_scramble()
                    .map(|scramble| text(format!("Last scramble: {scramble}"))),
            )
            .push(text(&self.status))
            .push(text(turning));

        // Right pane with the cube
        let viewport = Canvas::new(CubeCanvas::new(&self.player, self.render_mode))
            .width(Length::Fill)
            .height(Length::Fill);

        Row::new()
            .spacing(10)
            .padding(10)
            .push(container(controls).width(Length::Shrink).height(Length::Fill))
            .push(viewport)
            .into()
    }
}

/// Entry point for the cube player
fn main() -> iced::Result {
    env_logger::builder().format_timestamp(None).init();

    let config = PlayerConfig::from(cli::Args::parse());
    log::debug!("{config:?}");

    let app = CubeApp::new(config);
    iced::application(app.title(), CubeApp::update, CubeApp::view)
        .subscription(CubeApp::subscription)
        .settings(Settings {
            antialiasing: true,
            ..Settings::default()
        })
        .run_with(move || (app, Task::none()))
}
