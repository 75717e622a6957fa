use std::sync::Arc;

use anyhow::Context;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    config::SceneConfig,
    gfx::{rendering::RenderEngine, scene::Scene},
    house::build_house,
};

/// Windowed viewer for the house scene
pub struct ThatchApp {
    config: SceneConfig,
}

struct AppState {
    config: SceneConfig,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    scene: Scene,
    fatal_error: Option<anyhow::Error>,
}

impl ThatchApp {
    pub fn new(config: SceneConfig) -> Self {
        Self { config }
    }

    /// Builds the scene, opens the window and runs until it is closed
    ///
    /// Returns an error if the scene is invalid, the GPU cannot be set up, or
    /// a frame fails fatally.
    pub fn run(self) -> anyhow::Result<()> {
        let scene = build_house(&self.config).context("failed to build the house scene")?;

        let event_loop = EventLoop::new().context("failed to create the event loop")?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app_state = AppState {
            config: self.config,
            window: None,
            render_engine: None,
            scene,
            fatal_error: None,
        };

        event_loop
            .run_app(&mut app_state)
            .context("event loop terminated abnormally")?;

        match app_state.fatal_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{:#}", err);
        self.fatal_error = Some(err);
        event_loop.exit();
    }

    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_config = &self.config.window;
        let window = event_loop
            .create_window(
                WindowAttributes::default()
                    .with_title(window_config.title.clone())
                    .with_inner_size(winit::dpi::LogicalSize::new(
                        window_config.width,
                        window_config.height,
                    )),
            )
            .context("failed to create the window")?;
        let window_handle = Arc::new(window);

        let (width, height) = window_handle.inner_size().into();
        let renderer = pollster::block_on(RenderEngine::new(
            window_handle.clone(),
            width,
            height,
            self.config.window.sample_count,
        ))
        .context("failed to initialize the renderer")?;

        renderer.init_scene(&mut self.scene);
        self.scene
            .camera_manager
            .camera
            .resize_projection(width, height);

        self.window = Some(window_handle);
        self.render_engine = Some(renderer);
        Ok(())
    }

    /// Controls, then scene update, then draw
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_engine) = self.render_engine.as_mut() else {
            return;
        };

        self.scene.update();
        render_engine.update(self.scene.camera_manager.camera.uniform, &self.scene.lighting);

        if let Err(err) = render_engine.render_frame(&self.scene) {
            self.fail(event_loop, anyhow::Error::new(err).context("rendering failed"));
        }
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(err) = self.init_graphics(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            }
            | WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.scene
                    .camera_manager
                    .camera
                    .resize_projection(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
            }
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            other => {
                self.scene.camera_manager.process_window_event(&other);
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if self.window.is_none() {
            return;
        }
        self.scene.camera_manager.process_device_event(&event);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }
}
