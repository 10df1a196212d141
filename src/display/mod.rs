mod frame;

pub use frame::{Frame, Rgba};

use crate::error::StormError;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::Color;
use sdl2::rect::{Point, Rect};
use sdl2::render::{BlendMode, Canvas};
use sdl2::video::Window;
use sdl2::EventPump;

pub const DEFAULT_WIDTH: u32 = 960;
pub const DEFAULT_HEIGHT: u32 = 540;

pub struct Display {
    canvas: Canvas<Window>,
    event_pump: EventPump,
    width: u32,
    height: u32,
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Quit,
    KeyDown(Keycode),
    /// Relative motion while the left button is held
    Drag { dx: i32, dy: i32 },
    /// Wheel notches, positive away from the user
    Wheel(i32),
}

fn display_err(e: impl ToString) -> StormError {
    StormError::Display(e.to_string())
}

impl Display {
    /// Create display with custom resolution and VSync settings
    /// vsync=true: locked to monitor refresh (typically 60fps)
    /// vsync=false: uncapped framerate for performance testing
    pub fn with_options(
        title: &str,
        width: u32,
        height: u32,
        vsync: bool,
    ) -> Result<Self, StormError> {
        let sdl_context = sdl2::init().map_err(display_err)?;
        let video_subsystem = sdl_context.video().map_err(display_err)?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(display_err)?;

        let mut canvas_builder = window.into_canvas().accelerated();
        if vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let mut canvas = canvas_builder.build().map_err(display_err)?;
        canvas.set_blend_mode(BlendMode::Blend);

        let event_pump = sdl_context.event_pump().map_err(display_err)?;

        tracing::info!(width, height, vsync, "display opened");

        Ok(Self {
            canvas,
            event_pump,
            width,
            height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Replay a frame's draw list and flip
    pub fn present(&mut self, frame: &Frame) -> Result<(), StormError> {
        let bg = frame.background;
        self.canvas.set_draw_color(Color::RGB(bg.r, bg.g, bg.b));
        self.canvas.clear();

        for dot in &frame.dots {
            let c = dot.color;
            self.canvas.set_draw_color(Color::RGBA(c.r, c.g, c.b, c.a));
            let size = dot.size.max(1.0) as u32;
            self.canvas
                .fill_rect(Rect::new(dot.x as i32, dot.y as i32, size, size))
                .map_err(display_err)?;
        }

        for line in &frame.lines {
            let c = line.color;
            self.canvas.set_draw_color(Color::RGBA(c.r, c.g, c.b, c.a));
            self.canvas
                .draw_line(
                    Point::new(line.x0 as i32, line.y0 as i32),
                    Point::new(line.x1 as i32, line.y1 as i32),
                )
                .map_err(display_err)?;
        }

        self.canvas.present();
        Ok(())
    }

    pub fn poll_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => events.push(InputEvent::Quit),
                Event::KeyDown {
                    keycode: Some(k), ..
                } => events.push(InputEvent::KeyDown(k)),
                Event::MouseMotion {
                    mousestate,
                    xrel,
                    yrel,
                    ..
                } if mousestate.left() => events.push(InputEvent::Drag { dx: xrel, dy: yrel }),
                Event::MouseWheel { y, .. } if y != 0 => events.push(InputEvent::Wheel(y)),
                _ => {},
            }
        }

        events
    }
}
