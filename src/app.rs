//! Application event loop.
//!
//! Wires a scene, its viewport controller and the wgpu rasterizer into a
//! winit window. Each redraw runs one [`RenderLoop`] iteration and requests
//! the next one, so the loop continues at the display-refresh cadence until
//! the window closes (or an opt-in frame limit stops it).

use std::sync::Arc;

use cgmath::EuclideanSpace;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    camera::ViewportController,
    context::Context,
    data_structures::scene_graph::{NodeId, SceneGraph},
    render::{LoopControl, Rasterizer, RenderLoop},
    renderer::Renderer,
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[derive(Debug, Clone)]
pub struct AppOptions {
    pub title: String,
    /// Stop after this many frames. `None` runs until the window closes.
    pub frame_limit: Option<u64>,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            title: "gloam".to_string(),
            frame_limit: None,
        }
    }
}

/// Everything alive once GPU initialization finishes.
struct AppState {
    scene: SceneGraph,
    viewport: ViewportController,
    renderer: Renderer,
    render_loop: RenderLoop,
}

enum AppEvent {
    // constructed by the wasm init path only
    #[allow(dead_code)]
    Initialized(Box<AppState>),
}

struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[cfg(target_arch = "wasm32")]
    proxy: winit::event_loop::EventLoopProxy<AppEvent>,
    // Moved into the init future on resume, handed back inside AppState.
    pending: Option<(SceneGraph, NodeId)>,
    options: AppOptions,
    state: Option<AppState>,
    mouse_pressed: bool,
}

impl App {
    fn new(
        #[allow(unused_variables)] event_loop: &EventLoop<AppEvent>,
        scene: SceneGraph,
        camera: NodeId,
        options: AppOptions,
    ) -> anyhow::Result<Self> {
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            #[cfg(target_arch = "wasm32")]
            proxy: event_loop.create_proxy(),
            pending: Some((scene, camera)),
            options,
            state: None,
            mouse_pressed: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        let Some(state) = &mut self.state else { return };
        state.viewport.on_resize(width, height);
        state
            .renderer
            .resize(width, height, state.viewport.state.applied_pixel_ratio());
    }
}

async fn init_state(
    window: Arc<Window>,
    scene: SceneGraph,
    camera: NodeId,
    frame_limit: Option<u64>,
) -> anyhow::Result<AppState> {
    let context = Context::new(window.clone()).await?;
    let mut renderer = Renderer::new(context);
    renderer.upload_scene(&scene).await?;

    let size = window.inner_size();
    let eye = cgmath::Point3::from_vec(scene.node(camera).local.position);
    let viewport = ViewportController::new(
        camera,
        eye,
        cgmath::Point3::new(0.0, 0.0, 0.0),
        size.width.max(1),
        size.height.max(1),
        window.scale_factor() as f32,
    );

    let render_loop = match frame_limit {
        Some(limit) => RenderLoop::with_frame_limit(limit),
        None => RenderLoop::new(),
    };

    Ok(AppState {
        scene,
        viewport,
        renderer,
        render_loop,
    })
}

impl ApplicationHandler<AppEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        #[allow(unused_mut)]
        let mut window_attributes =
            Window::default_attributes().with_title(self.options.title.clone());

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let window = wgpu::web_sys::window().unwrap_throw();
            let document = window.document().unwrap_throw();
            let canvas = document.get_element_by_id(CANVAS_ID).unwrap_throw();
            let html_canvas_element = canvas.unchecked_into();
            window_attributes = window_attributes.with_canvas(Some(html_canvas_element));
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("failed to create a window: {e}");
                event_loop.exit();
                return;
            }
        };

        let Some((scene, camera)) = self.pending.take() else {
            // resumed again after initialization (mobile lifecycles)
            return;
        };
        let frame_limit = self.options.frame_limit;
        let init_future = init_state(window, scene, camera, frame_limit);

        #[cfg(not(target_arch = "wasm32"))]
        {
            match self.async_runtime.block_on(init_future) {
                Ok(state) => {
                    state.renderer.context.window.request_redraw();
                    self.state = Some(state);
                }
                Err(e) => {
                    log::error!("initialization failed: {e:#}");
                    event_loop.exit();
                }
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let state = init_future.await.expect("initialization failed");
                assert!(
                    proxy
                        .send_event(AppEvent::Initialized(Box::new(state)))
                        .is_ok()
                );
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::Initialized(state) => {
                // This is the message from our wasm `spawn_local`
                self.state = Some(*state);
                let state = self.state.as_ref().unwrap();
                let size = state.renderer.context.window.inner_size();
                let window = state.renderer.context.window.clone();
                self.resize(size.width, size.height);
                window.request_redraw();
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let Some(state) = &mut self.state else { return };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if self.mouse_pressed {
                state.viewport.controller.handle_mouse(dx, dy);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        if self.state.is_none() {
            return;
        }

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let state = self.state.as_mut().unwrap();
                state.viewport.set_pixel_ratio(scale_factor as f32);
                let size = state.renderer.context.window.inner_size();
                self.resize(size.width, size.height);
            }
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } => {
                self.mouse_pressed = button_state == ElementState::Pressed;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let state = self.state.as_mut().unwrap();
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.05,
                };
                state.viewport.controller.handle_scroll(scroll);
            }
            WindowEvent::RedrawRequested => {
                let state = self.state.as_mut().unwrap();
                state.renderer.context.window.request_redraw();

                let result = state.render_loop.advance(
                    &mut state.scene,
                    &mut state.viewport,
                    &mut state.renderer,
                );
                match result {
                    Ok(LoopControl::Continue) => {}
                    Ok(LoopControl::Stop) => event_loop.exit(),
                    Err(e) => match e.downcast_ref::<wgpu::SurfaceError>() {
                        // Reconfigure the surface if it's lost or outdated
                        Some(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            let size = state.renderer.context.window.inner_size();
                            self.resize(size.width, size.height);
                        }
                        _ => log::error!("unable to render: {e:#}"),
                    },
                }
            }
            _ => {}
        }
    }
}

/// Open a window and run `scene` until the window closes.
///
/// `camera` is the scene node the viewport controller drives; its starting
/// position seeds the orbit rig.
pub fn run(scene: SceneGraph, camera: NodeId, options: AppOptions) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).unwrap_throw();
    }

    let event_loop: EventLoop<AppEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, scene, camera, options)?;
    event_loop.run_app(&mut app)?;

    Ok(())
}
