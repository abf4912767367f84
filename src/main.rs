use anyhow::Context as _;
use clap::Parser;
use log::{error, info, warn};
use winit::{
    dpi::{LogicalSize, PhysicalPosition, PhysicalSize},
    event::{
        ElementState, Event, KeyboardInput, MouseButton, MouseScrollDelta, VirtualKeyCode,
        WindowEvent,
    },
    event_loop::EventLoop,
    window::WindowBuilder,
};

use wgpu_julia::{
    config::Config,
    navigation::Navigator,
    renderer::Renderer,
    snapshot, Error,
};

const MIN_WINDOW_SIZE: f64 = 500.0;

/// Trackpads report pixels; the zoom step is tuned for wheel lines.
const PIXELS_PER_LINE: f32 = 20.0;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = Config::parse();

    if let Some(path) = &config.snapshot {
        let navigator = Navigator::new(config.width, config.height, config.sensitivity());
        return snapshot::write_png(navigator.control(), path)
            .with_context(|| format!("write snapshot '{}'", path.display()));
    }

    run(config)
}

#[derive(Default)]
struct Pointer {
    position: Option<PhysicalPosition<f64>>,
    panning: bool,
    altering: bool,
}

fn run(config: Config) -> anyhow::Result<()> {
    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("Julia")
        .with_inner_size(LogicalSize::new(config.width, config.height))
        .with_min_inner_size(LogicalSize::new(MIN_WINDOW_SIZE, MIN_WINDOW_SIZE))
        .build(&event_loop)
        .context("create window")?;

    let size = window.inner_size();
    let mut navigator = Navigator::new(size.width, size.height, config.sensitivity());
    let mut renderer = Renderer::new(&window, navigator.control()).context("initialise GPU")?;

    info!("left drag: pan, right drag: alter equation, scroll: zoom, R: reset, Esc: quit");

    let mut pointer = Pointer::default();

    event_loop.run(move |event, _, control_flow| {
        control_flow.set_wait();

        match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested
                | WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(VirtualKeyCode::Escape),
                            ..
                        },
                    ..
                } => control_flow.set_exit(),
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state: ElementState::Pressed,
                            virtual_keycode: Some(VirtualKeyCode::R),
                            ..
                        },
                    ..
                } => navigator.reset(),
                WindowEvent::Resized(size) => resize(&mut renderer, &mut navigator, size),
                WindowEvent::ScaleFactorChanged { new_inner_size, .. } => {
                    resize(&mut renderer, &mut navigator, *new_inner_size)
                }
                WindowEvent::MouseInput { state, button, .. } => {
                    let pressed = state == ElementState::Pressed;
                    match button {
                        MouseButton::Left => pointer.panning = pressed,
                        MouseButton::Right => pointer.altering = pressed,
                        _ => {}
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    if let Some(previous) = pointer.position {
                        let dx = (position.x - previous.x) as f32;
                        let dy = (position.y - previous.y) as f32;
                        if pointer.panning {
                            navigator.pan(dx, dy);
                        } else if pointer.altering {
                            navigator.alter_equation(dx, dy);
                        }
                    }
                    pointer.position = Some(position);
                }
                WindowEvent::CursorLeft { .. } => pointer.position = None,
                WindowEvent::MouseWheel { delta, .. } => {
                    let lines = match delta {
                        MouseScrollDelta::LineDelta(_, y) => y,
                        MouseScrollDelta::PixelDelta(position) => {
                            position.y as f32 / PIXELS_PER_LINE
                        }
                    };
                    navigator.zoom(lines);
                }
                _ => {}
            },
            Event::MainEventsCleared => {
                if navigator.is_dirty() {
                    window.request_redraw();
                }
            }
            Event::RedrawRequested(window_id) if window_id == window.id() => {
                // Redraws the platform asks for repaint the current view without scrolling colours.
                let control = navigator
                    .take_frame()
                    .unwrap_or_else(|| *navigator.control());

                match renderer.render(&control) {
                    Ok(()) => {}
                    Err(Error::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                        let (width, height) = renderer.size();
                        renderer.resize(width, height);
                        navigator.invalidate();
                    }
                    Err(Error::Surface(wgpu::SurfaceError::Timeout)) => {
                        warn!("surface timed out, retrying");
                        navigator.invalidate();
                    }
                    Err(error) => {
                        error!("{}", error);
                        control_flow.set_exit_with_code(1);
                    }
                }
            }
            _ => {}
        }
    })
}

fn resize(renderer: &mut Renderer, navigator: &mut Navigator, size: PhysicalSize<u32>) {
    renderer.resize(size.width, size.height);
    navigator.resize(size.width, size.height);
}
