// Window and event-loop glue

use anyhow::{Context, Result};
use log::{debug, error, info};
use std::sync::Arc;
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::{Window, WindowBuilder},
};

use crate::config::GameConfig;
use crate::engine::game_loop::FrameClock;
use crate::engine::input::{Action, InputManager};
use crate::engine::renderer::Renderer;
use crate::game::characters::Intent;
use crate::game::GameWorld;

/// How often the measured frame rate is logged
const FPS_LOG_INTERVAL: u64 = 600;

/// Everything the event loop drives
pub struct App {
    window: Arc<Window>,
    renderer: Renderer,
    input: InputManager,
    clock: FrameClock,
    world: GameWorld,
    target_fps: u32,
}

impl App {
    /// Set up rendering and load the world for an existing window
    pub fn new(config: &GameConfig, window: Arc<Window>) -> Result<Self> {
        let size = window.inner_size();
        let renderer = pollster::block_on(Renderer::new(window.clone()))
            .context("Failed to initialize renderer")?;
        let world = GameWorld::from_config(config, (size.width, size.height))?;

        Ok(Self {
            window,
            renderer,
            input: InputManager::default(),
            clock: FrameClock::new(),
            world,
            target_fps: config.window.target_fps,
        })
    }

    /// Handle one window event; returns false when the app should exit
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down...");
                return false;
            }
            WindowEvent::Resized(physical_size) => {
                self.renderer.resize(*physical_size);
                if physical_size.width > 0 && physical_size.height > 0 {
                    self.world
                        .resize(physical_size.width, physical_size.height);
                }
            }
            WindowEvent::Focused(false) => {
                // Releases are not delivered while unfocused
                self.input.reset();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.input.process_keyboard_event(event);
                if self.input.is_pressed(Action::Quit) {
                    info!("Quit pressed, shutting down...");
                    return false;
                }
            }
            WindowEvent::RedrawRequested => return self.frame(),
            _ => {}
        }
        true
    }

    fn frame(&mut self) -> bool {
        let dt_ms = self.clock.tick(self.target_fps);
        let intent = Intent::from_input(&self.input);
        self.world.update(dt_ms, &intent);

        if let Err(e) = self.world.render(&mut self.renderer) {
            error!("Render failed: {:#}", e);
            return false;
        }

        if self.clock.frame_count() % FPS_LOG_INTERVAL == 0 {
            debug!(
                "{:.1} fps, {} textures",
                self.clock.fps(),
                self.renderer.texture_count()
            );
        }
        true
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn frame_count(&self) -> u64 {
        self.clock.frame_count()
    }
}

/// Open the window and run until the player quits
pub fn run(config: GameConfig) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(&config.window.title)
            .with_inner_size(winit::dpi::PhysicalSize::new(
                config.window.width,
                config.window.height,
            ))
            .with_resizable(true)
            .build(&event_loop)?,
    );

    info!("Window created successfully");

    let mut app = App::new(&config, window)?;

    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent { event, .. } => {
                if !app.handle_window_event(&event) {
                    info!("Ran {} frames", app.frame_count());
                    elwt.exit();
                }
            }
            Event::AboutToWait => {
                // Request redraw on next frame
                app.window().request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
