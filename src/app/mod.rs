use crate::animator;
use crate::camera3d::{viewport_to_ndc, OrbitCamera};
use crate::config::{AppConfig, AppConfigOverrides, CameraConfig};
use crate::content::{ContentStore, PanelContent};
use crate::input::{Input, InputEvent};
use crate::island::default_archipelago;
use crate::renderer::{InstanceData, Renderer};
use crate::time::Time;
use crate::world::World;

use anyhow::{Context, Result};
use glam::{Mat4, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};

const ORBIT_SENSITIVITY: f32 = 0.005;
const ZOOM_PER_WHEEL_STEP: f32 = 0.92;
const HOVER_BRIGHTEN: f32 = 1.35;
const MOTE_RADIUS: f32 = 0.45;

/// The overlay UI collaborator. The engine only commands show/hide;
/// presentation and the dismiss affordance live behind this seam (the
/// dismiss routes back as `World::close_overlay`).
pub trait OverlayPresenter {
    fn show(&mut self, panel: &PanelContent);
    fn hide(&mut self);
}

/// Stock presenter that prints the panel to the terminal.
pub struct ConsoleOverlay;

impl OverlayPresenter for ConsoleOverlay {
    fn show(&mut self, panel: &PanelContent) {
        eprintln!("[overlay] == {} ==", panel.title);
        eprintln!("[overlay] {}", panel.body_markup);
        eprintln!("[overlay] (press Escape to dismiss)");
    }

    fn hide(&mut self) {
        eprintln!("[overlay] dismissed");
    }
}

pub fn run() -> Result<()> {
    run_with_overrides(AppConfigOverrides::default())
}

pub fn run_with_overrides(overrides: AppConfigOverrides) -> Result<()> {
    let mut config = AppConfig::load_or_default("config/app.json");
    config.apply_overrides(&overrides);
    let event_loop = EventLoop::new().context("Failed to create winit event loop")?;
    let mut app = App::new(config)?;
    event_loop.run_app(&mut app).context("Event loop execution failed")?;
    Ok(())
}

pub struct App {
    renderer: Renderer,
    world: World,
    time: Time,
    input: Input,
    orbit: OrbitCamera,
    camera_cfg: CameraConfig,
    motes_per_island: u32,
    overlay: Box<dyn OverlayPresenter>,
    should_close: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let content = match &config.scene.content_path {
            Some(path) => ContentStore::load(path)?,
            None => ContentStore::default(),
        };
        let mut rng = match config.scene.motion_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let world = World::new(default_archipelago(), content, &mut rng)?;

        let mut orbit = OrbitCamera::new(
            Vec3::new(0.0, config.camera.target_height, 0.0),
            config.camera.orbit_radius,
        );
        orbit.yaw_radians = std::f32::consts::FRAC_PI_2;

        Ok(Self {
            renderer: Renderer::new(
                config.window.title.clone(),
                PhysicalSize::new(config.window.width, config.window.height),
                config.window.vsync,
            ),
            world,
            time: Time::new(),
            input: Input::new(),
            orbit,
            camera_cfg: config.camera,
            motes_per_island: config.scene.motes_per_island,
            overlay: Box::new(ConsoleOverlay),
            should_close: false,
        })
    }

    pub fn set_overlay(&mut self, overlay: Box<dyn OverlayPresenter>) {
        self.overlay = overlay;
    }

    /// One loop iteration: consume latched input, step the world, draw.
    /// Indivisible; event handlers only ever run between frames.
    fn frame(&mut self) {
        if self.renderer.window().is_none() {
            return;
        }
        self.time.tick();
        let elapsed = self.time.elapsed_seconds();

        // Camera control: right-drag orbits, middle-drag pans, wheel zooms.
        let (dx, dy) = self.input.mouse_delta;
        if self.input.right_held() {
            self.orbit.orbit(Vec2::new(dx * ORBIT_SENSITIVITY, dy * ORBIT_SENSITIVITY));
        } else if self.input.middle_held() {
            self.orbit.pan(
                Vec2::new(dx, dy),
                self.camera_cfg.fov_degrees.to_radians(),
                self.camera_cfg.near,
                self.camera_cfg.far,
            );
        }
        if let Some(wheel) = self.input.consume_wheel_delta() {
            self.orbit.zoom(ZOOM_PER_WHEEL_STEP.powf(wheel));
        }
        let camera = self.orbit.to_camera(
            self.camera_cfg.fov_degrees.to_radians(),
            self.camera_cfg.near,
            self.camera_cfg.far,
        );
        let aspect = self.renderer.aspect_ratio();

        if let Some((x, y)) = self.input.cursor_position() {
            self.world.pointer_moved(viewport_to_ndc(Vec2::new(x, y), self.renderer.size()));
        }

        for token in self.input.drain_key_tokens() {
            self.world.key(token);
        }
        if self.input.take_escape() && self.world.close_overlay() {
            self.overlay.hide();
        }
        if self.input.take_left_click() {
            match self.world.click(&camera, aspect) {
                Ok(Some(panel)) => self.overlay.show(panel),
                Ok(None) => {}
                Err(err) => {
                    // Internal-consistency fault; a stalled loop is the
                    // only worse outcome, so shut down cleanly.
                    eprintln!("[app] fatal interaction error: {err:?}");
                    self.should_close = true;
                    return;
                }
            }
        }

        self.world.frame(elapsed, &camera, aspect);

        let instances = self.build_instances(elapsed);
        let view_proj = camera.view_projection(aspect);
        match self.renderer.render_batch(&instances, view_proj, self.world.aurora()) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.renderer.resize(self.renderer.size());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                eprintln!("[render] out of GPU memory, shutting down");
                self.should_close = true;
            }
            Err(err) => eprintln!("[render] dropped frame: {err:?}"),
        }

        self.input.clear_frame();
    }

    fn build_instances(&self, elapsed: f32) -> Vec<InstanceData> {
        let registry = self.world.registry();
        let mut instances =
            Vec::with_capacity(registry.len() * (1 + self.motes_per_island as usize));
        for island in registry.iter() {
            let brighten = if island.hovered { HOVER_BRIGHTEN } else { 1.0 };
            let color = [
                (island.color[0] * brighten).min(1.0),
                (island.color[1] * brighten).min(1.0),
                (island.color[2] * brighten).min(1.0),
                1.0,
            ];
            instances.push(InstanceData { model: island.model_matrix().to_cols_array_2d(), color });

            for mote in animator::mote_positions(island, elapsed, self.motes_per_island) {
                let model = Mat4::from_scale_rotation_translation(
                    Vec3::splat(MOTE_RADIUS),
                    glam::Quat::IDENTITY,
                    mote,
                );
                instances.push(InstanceData {
                    model: model.to_cols_array_2d(),
                    color: [0.85, 0.88, 0.95, 0.9],
                });
            }
        }
        instances
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.renderer.ensure_window(event_loop);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match &event {
            WindowEvent::CloseRequested => {
                self.should_close = true;
                event_loop.exit();
                return;
            }
            WindowEvent::Resized(size) => self.renderer.resize(*size),
            _ => {}
        }
        self.input.push(InputEvent::from_window_event(&event));
    }

    fn device_event(
        &mut self,
        _el: &ActiveEventLoop,
        _dev: winit::event::DeviceId,
        ev: DeviceEvent,
    ) {
        self.input.push(InputEvent::from_device_event(&ev));
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.should_close {
            event_loop.exit();
            return;
        }
        self.frame();
        if self.should_close {
            event_loop.exit();
            return;
        }
        if let Some(window) = self.renderer.window() {
            window.request_redraw();
        }
    }
}
