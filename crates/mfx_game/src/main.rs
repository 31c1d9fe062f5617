//! Super Mario FX Beta -- main loop and application entry point.
//!
//! Architecture: winit drives the event loop via `ApplicationHandler`. All
//! simulation runs inside `RedrawRequested` using a **fixed-timestep** model
//! (see `TimeState`):
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed accumulator
//!   2. `while should_step()` -- consume fixed-dt slices for deterministic simulation
//!   3. Rebuild the quad mesh from the active scene
//!   4. Upload the camera uniform, issue draw calls, composite the debug overlay
//!
//! Exactly one scene mode is active per step (`Menu`, `Credits`, `Playing`);
//! the menu's confirmed action and the Escape edge are the only transitions.
//! Edge-triggered input is cleared at the end of each fixed step, so a press
//! landing on a frame that runs zero steps survives to the next frame, and a
//! frame that runs several steps fires each press exactly once.

mod cast;
mod level;
#[cfg(test)]
mod replay;
mod sheet;
mod world;

use std::collections::HashMap;
use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use cast::Cast;
use level::LevelSpec;
use mfx_core::input::{InputState, Key};
use mfx_core::menu::{MenuAction, MenuItem, MenuSelection};
use mfx_core::mode::{transition_for, ModeTransition, SceneMode};
use mfx_core::time::TimeState;
use mfx_devtools::{DebugOverlay, OverlayStats};
use mfx_platform::window::PlatformConfig;
use mfx_render::{GpuContext, ScreenCamera, SpritePipeline, SpriteVertex, Texture};
use sheet::{SHEET_PATH, SPRITE_SCALE};
use world::{PlayWorld, PlayerIntent, WorldInput, GROUND_LINE, SCREEN_HEIGHT, SCREEN_WIDTH, TILE_SIZE};

const WHITE_ASSET: &str = "__white";

const MENU_CLEAR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.157,
    a: 1.0,
};

/// Menu backdrop dot color and the dot grid pitch.
const MENU_DOT_COLOR: [f32; 4] = [0.0, 0.0, 0.39, 1.0];
const MENU_TILE: f32 = 40.0;

const CREDITS_LINES: &[&str] = &[
    "Super Mario FX Beta",
    "A Fan Recreation",
    "",
    "Programming:",
    "FTRender Engine Team",
    "",
    "Original Concept:",
    "Nintendo & Silicon Graphics",
    "",
    "Press ESC to return",
];

/// A contiguous run of indices that share the same texture binding.
/// Draw calls are merged when consecutive quads use the same texture,
/// minimizing GPU bind-group switches during the render pass.
#[derive(Debug, Clone)]
struct DrawCall {
    texture_key: Arc<str>,
    index_start: u32,
    index_count: u32,
}

struct QuadSpec<'a> {
    texture_key: &'a str,
    center_x: f32,
    center_y: f32,
    width: f32,
    height: f32,
    rotation_deg: f32,
    uv: [f32; 4],
    color: [f32; 4],
}

impl Default for QuadSpec<'_> {
    fn default() -> Self {
        Self {
            texture_key: WHITE_ASSET,
            center_x: 0.0,
            center_y: 0.0,
            width: 0.0,
            height: 0.0,
            rotation_deg: 0.0,
            uv: [0.0, 0.0, 1.0, 1.0],
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

struct GpuSpriteTexture {
    bind_group: wgpu::BindGroup,
}

/// The menu's rotating dot-grid backdrop.
struct MenuFx {
    angle_deg: f32,
}

impl MenuFx {
    fn new() -> Self {
        Self { angle_deg: 0.0 }
    }

    fn tick(&mut self) {
        self.angle_deg += 0.5;
    }
}

/// All mutable engine state. Constructed lazily in
/// `ApplicationHandler::resumed` once the window and GPU surface exist.
///
/// Ownership splits into three groups:
///  - **Core systems** (time, input, camera, overlay) -- updated every frame
///  - **Scene state** (mode, menu, world, backdrop phases) -- what the step loop mutates
///  - **GPU resources** (vertex/index/camera buffers, draw calls) -- rebuilt per frame
struct EngineState {
    window: Arc<Window>,
    gpu: GpuContext,
    time: TimeState,
    input: InputState,
    camera: ScreenCamera,
    sprite_pipeline: SpritePipeline,
    debug_overlay: DebugOverlay,

    mode: SceneMode,
    menu: MenuSelection,
    menu_fx: MenuFx,
    cast: Cast,
    levels: Vec<LevelSpec>,
    world: Option<PlayWorld>,
    paused: bool,
    single_step_requested: bool,

    textures: HashMap<Arc<str>, GpuSpriteTexture>,

    // The quad mesh is rebuilt on the CPU each simulated frame, then streamed
    // into these GPU buffers. Buffers grow (power-of-two) but never shrink.
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_vertex_capacity: usize,
    mesh_index_capacity: usize,
    draw_calls: Vec<DrawCall>,
    sprite_count: usize,
}

impl EngineState {
    fn new(window: Arc<Window>) -> Self {
        let gpu = GpuContext::new(window.clone());
        let time = TimeState::new(60);
        let input = InputState::new();
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let debug_overlay = DebugOverlay::new(&gpu.device, gpu.surface_format, &window);

        let cast = Cast::build().unwrap_or_else(|err| {
            panic!("Character content tables failed validation: {err}");
        });

        // The sprite sheet is the one external asset. Any failure here is
        // fatal: no retry, no placeholder art.
        let sheet_bytes = std::fs::read(SHEET_PATH).unwrap_or_else(|err| {
            panic!("Failed to read sprite sheet '{SHEET_PATH}': {err}");
        });
        let sheet_texture =
            Texture::from_bytes(&gpu.device, &gpu.queue, &sheet_bytes, SHEET_PATH)
                .unwrap_or_else(|err| panic!("{err}"));
        sheet::verify_sheet_dimensions(sheet_texture.size).unwrap_or_else(|err| {
            panic!("{err}");
        });

        let mut textures = HashMap::new();
        textures.insert(
            Arc::from(SHEET_PATH),
            GpuSpriteTexture {
                bind_group: sprite_pipeline.create_texture_bind_group(&gpu.device, &sheet_texture),
            },
        );
        let white = Texture::from_rgba8(
            &gpu.device,
            &gpu.queue,
            &[255, 255, 255, 255],
            1,
            1,
            "white",
        );
        textures.insert(
            Arc::from(WHITE_ASSET),
            GpuSpriteTexture {
                bind_group: sprite_pipeline.create_texture_bind_group(&gpu.device, &white),
            },
        );

        let menu = MenuSelection::new(vec![
            MenuItem::new("Start Game", MenuAction::StartGame),
            MenuItem::new("Credits", MenuAction::ShowCredits),
            MenuItem::new("Exit", MenuAction::Quit),
        ])
        .unwrap_or_else(|err| panic!("Menu definition invalid: {err}"));

        let camera = ScreenCamera::new(gpu.size.0, gpu.size.1);
        let camera_uniform = camera.build_uniform();
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            sprite_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 1);
        let index_buffer = create_index_buffer(&gpu.device, 1);

        let mut state = Self {
            window,
            gpu,
            time,
            input,
            camera,
            sprite_pipeline,
            debug_overlay,
            mode: SceneMode::default(),
            menu,
            menu_fx: MenuFx::new(),
            cast,
            levels: level::builtin_levels(),
            world: None,
            paused: false,
            single_step_requested: false,
            textures,
            vertex_buffer,
            index_buffer,
            camera_buffer,
            camera_bind_group,
            mesh_vertex_capacity: 0,
            mesh_index_capacity: 0,
            draw_calls: Vec::new(),
            sprite_count: 0,
        };

        state.ensure_mesh_capacity(4, 6);
        state.rebuild_scene_mesh();
        state
    }

    fn enter_mode(&mut self, mode: SceneMode) {
        if mode == SceneMode::Playing {
            // Re-entering Playing always restarts: the world is rebuilt from
            // the first level, discarding any prior run.
            let first = &self.levels[0];
            log::info!("Starting level: {}", first.theme);
            self.world = Some(PlayWorld::spawn(first, &self.cast));
        } else {
            self.world = None;
        }
        log::info!("Scene mode: {} -> {}", self.mode, mode);
        self.mode = mode;
    }

    /// One fixed simulation step for the active scene. Returns false when the
    /// step requested process exit.
    fn step_scene(&mut self, event_loop: &ActiveEventLoop) -> bool {
        let dt_us = self.time.fixed_dt_us();

        if self.input.is_just_pressed(Key::Escape) {
            if let Some(target) = self.mode.escape_target() {
                self.enter_mode(target);
                return true;
            }
        }

        match self.mode {
            SceneMode::Menu => {
                self.menu_fx.tick();
                self.menu.tick_hover(dt_us);

                if self.input.is_just_pressed(Key::Up) {
                    self.menu.move_up();
                } else if self.input.is_just_pressed(Key::Down) {
                    self.menu.move_down();
                } else if self.input.is_just_pressed(Key::Enter) {
                    let action = self.menu.confirm();
                    log::info!(
                        "Menu confirm: {}",
                        self.menu.items()[self.menu.selected_index()].label
                    );
                    match transition_for(action) {
                        ModeTransition::Enter(next) => self.enter_mode(next),
                        ModeTransition::Quit => {
                            log::info!("Exit selected from menu, quitting.");
                            event_loop.exit();
                            return false;
                        }
                    }
                }
            }

            // Static screen; Escape handling above is its only interaction.
            SceneMode::Credits => {}

            SceneMode::Playing => {
                let input = self.build_world_input();
                if let Some(world) = self.world.as_mut() {
                    world.update(&input, dt_us, &self.cast);
                }
            }
        }

        true
    }

    fn build_world_input(&self) -> WorldInput {
        let axis = |neg: Key, pos: Key| -> f32 {
            let mut dir = 0.0;
            if self.input.is_held(neg) {
                dir -= 1.0;
            }
            if self.input.is_held(pos) {
                dir += 1.0;
            }
            dir
        };

        WorldInput {
            mario: PlayerIntent {
                move_x: axis(Key::Left, Key::Right),
                jump_pressed: self.input.is_just_pressed(Key::Space),
            },
            luigi: PlayerIntent {
                move_x: axis(Key::A, Key::D),
                jump_pressed: self.input.is_just_pressed(Key::W),
            },
        }
    }

    fn clear_color(&self) -> wgpu::Color {
        match (&self.mode, &self.world) {
            (SceneMode::Playing, Some(world)) => wgpu::Color {
                r: world.sky[0],
                g: world.sky[1],
                b: world.sky[2],
                a: 1.0,
            },
            _ => MENU_CLEAR,
        }
    }

    fn rebuild_scene_mesh(&mut self) {
        let (vertices, indices, draw_calls) = self.build_mesh();
        self.ensure_mesh_capacity(vertices.len(), indices.len());
        self.sprite_count = vertices.len() / 4;
        self.draw_calls = draw_calls;

        if !vertices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&vertices));
        }
        if !indices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&indices));
        }
    }

    fn build_mesh(&self) -> (Vec<SpriteVertex>, Vec<u32>, Vec<DrawCall>) {
        let mut vertices = Vec::with_capacity(1024);
        let mut indices = Vec::with_capacity(1536);
        let mut draw_calls = Vec::with_capacity(8);

        match self.mode {
            SceneMode::Menu => {
                self.build_menu_mesh(&mut vertices, &mut indices, &mut draw_calls)
            }
            SceneMode::Credits => {
                self.build_credits_mesh(&mut vertices, &mut indices, &mut draw_calls)
            }
            SceneMode::Playing => {
                self.build_playing_mesh(&mut vertices, &mut indices, &mut draw_calls)
            }
        }

        (vertices, indices, draw_calls)
    }

    fn build_menu_mesh(
        &self,
        vertices: &mut Vec<SpriteVertex>,
        indices: &mut Vec<u32>,
        draw_calls: &mut Vec<DrawCall>,
    ) {
        // Rotating dot grid: fixed tile anchors, each rotated about the
        // screen center by the current backdrop angle.
        let (cx, cy) = (SCREEN_WIDTH / 2.0, SCREEN_HEIGHT / 2.0);
        let radians = self.menu_fx.angle_deg.to_radians();
        let (sin_r, cos_r) = radians.sin_cos();

        let mut x = -MENU_TILE;
        while x <= SCREEN_WIDTH + MENU_TILE {
            let mut y = -MENU_TILE;
            while y <= SCREEN_HEIGHT + MENU_TILE {
                let px = x - cx;
                let py = y - cy;
                let rot_x = px * cos_r - py * sin_r + cx;
                let rot_y = px * sin_r + py * cos_r + cy;
                add_quad(
                    vertices,
                    indices,
                    draw_calls,
                    QuadSpec {
                        center_x: rot_x,
                        center_y: rot_y,
                        width: 2.0,
                        height: 2.0,
                        color: MENU_DOT_COLOR,
                        ..QuadSpec::default()
                    },
                );
                y += MENU_TILE;
            }
            x += MENU_TILE;
        }

        // Title banner. Text rendering is out of scope, so the title and the
        // menu rows are plain bars sized to their labels.
        add_quad(
            vertices,
            indices,
            draw_calls,
            QuadSpec {
                center_x: cx,
                center_y: 115.0,
                width: 420.0,
                height: 52.0,
                color: [0.95, 0.95, 0.95, 0.92],
                ..QuadSpec::default()
            },
        );

        for (i, item) in self.menu.items().iter().enumerate() {
            let selected = i == self.menu.selected_index();
            let color = if selected {
                [1.0, 1.0, 0.2, 1.0]
            } else {
                [1.0, 1.0, 1.0, 0.85]
            };
            add_quad(
                vertices,
                indices,
                draw_calls,
                QuadSpec {
                    center_x: cx,
                    center_y: 250.0 + i as f32 * 60.0 + self.menu.hover_offset(i),
                    width: item.label.len() as f32 * 18.0,
                    height: 34.0,
                    color,
                    ..QuadSpec::default()
                },
            );
        }
    }

    fn build_credits_mesh(
        &self,
        vertices: &mut Vec<SpriteVertex>,
        indices: &mut Vec<u32>,
        draw_calls: &mut Vec<DrawCall>,
    ) {
        for (i, line) in CREDITS_LINES.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            add_quad(
                vertices,
                indices,
                draw_calls,
                QuadSpec {
                    center_x: SCREEN_WIDTH / 2.0,
                    center_y: 110.0 + i as f32 * 40.0,
                    width: line.len() as f32 * 12.0,
                    height: 22.0,
                    color: [1.0, 1.0, 1.0, 0.9],
                    ..QuadSpec::default()
                },
            );
        }
    }

    fn build_playing_mesh(
        &self,
        vertices: &mut Vec<SpriteVertex>,
        indices: &mut Vec<u32>,
        draw_calls: &mut Vec<DrawCall>,
    ) {
        let Some(world) = &self.world else {
            return;
        };

        // Rotating, breathing backdrop behind the stage.
        add_quad(
            vertices,
            indices,
            draw_calls,
            QuadSpec {
                center_x: SCREEN_WIDTH / 2.0,
                center_y: SCREEN_HEIGHT / 2.0,
                width: SCREEN_WIDTH * world.backdrop.scale,
                height: SCREEN_HEIGHT * world.backdrop.scale,
                rotation_deg: world.backdrop.angle_deg,
                color: [1.0, 1.0, 1.0, 0.22],
                ..QuadSpec::default()
            },
        );

        // Ground strip.
        add_quad(
            vertices,
            indices,
            draw_calls,
            QuadSpec {
                center_x: SCREEN_WIDTH / 2.0,
                center_y: GROUND_LINE + TILE_SIZE / 2.0,
                width: SCREEN_WIDTH,
                height: TILE_SIZE,
                color: [0.0, 0.78, 0.0, 1.0],
                ..QuadSpec::default()
            },
        );

        self.build_castle_mesh(vertices, indices, draw_calls);

        // Actors: textured quads from the sheet, mirrored via swapped U
        // coordinates when facing left.
        for actor in world.actors() {
            let frame_id = actor
                .animator
                .current_frame(self.cast.clip(actor.character, actor.animator.state()));
            let Some(region) = self.cast.sheet.resolve(frame_id) else {
                log::warn!("Skipping actor '{}': unresolved frame", actor.character);
                continue;
            };
            let [u0, v0, u1, v1] = region.uv;
            let uv = if actor.body.facing_right {
                [u0, v0, u1, v1]
            } else {
                [u1, v0, u0, v1]
            };
            let w = region.size_px.0 as f32 * SPRITE_SCALE;
            let h = region.size_px.1 as f32 * SPRITE_SCALE;
            add_quad(
                vertices,
                indices,
                draw_calls,
                QuadSpec {
                    texture_key: SHEET_PATH,
                    center_x: actor.body.position.x + w / 2.0,
                    center_y: actor.body.position.y + h / 2.0,
                    width: w,
                    height: h,
                    uv,
                    ..QuadSpec::default()
                },
            );
        }
    }

    fn build_castle_mesh(
        &self,
        vertices: &mut Vec<SpriteVertex>,
        indices: &mut Vec<u32>,
        draw_calls: &mut Vec<DrawCall>,
    ) {
        const BRICK: [f32; 4] = [0.78, 0.39, 0.39, 1.0];
        const DARK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
        let castle_w = 200.0;
        let castle_h = 300.0;
        let castle_x = (SCREEN_WIDTH - castle_w) / 2.0;
        let castle_y = GROUND_LINE - castle_h;

        add_quad(
            vertices,
            indices,
            draw_calls,
            QuadSpec {
                center_x: castle_x + castle_w / 2.0,
                center_y: castle_y + castle_h / 2.0,
                width: castle_w,
                height: castle_h,
                color: BRICK,
                ..QuadSpec::default()
            },
        );

        // Three windows down the middle.
        let window_w = 30.0;
        let window_h = 40.0;
        for i in 0..3 {
            add_quad(
                vertices,
                indices,
                draw_calls,
                QuadSpec {
                    center_x: castle_x + castle_w / 2.0,
                    center_y: castle_y + 50.0 + i as f32 * 80.0 + window_h / 2.0,
                    width: window_w,
                    height: window_h,
                    color: DARK,
                    ..QuadSpec::default()
                },
            );
        }

        // Door at the base.
        let door_w = 60.0;
        let door_h = 100.0;
        add_quad(
            vertices,
            indices,
            draw_calls,
            QuadSpec {
                center_x: castle_x + castle_w / 2.0,
                center_y: castle_y + castle_h - door_h / 2.0,
                width: door_w,
                height: door_h,
                color: DARK,
                ..QuadSpec::default()
            },
        );
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.mesh_vertex_capacity {
            self.mesh_vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.mesh_vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.mesh_index_capacity {
            self.mesh_index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.mesh_index_capacity);
        }
    }
}

struct App {
    config: PlatformConfig,
    state: Option<EngineState>,
}

impl App {
    fn new() -> Self {
        Self {
            config: PlatformConfig::default(),
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let window = mfx_platform::window::create_window(event_loop, &self.config);
        log::info!(
            "Window created: {}x{}",
            self.config.width,
            self.config.height
        );
        self.state = Some(EngineState::new(window));
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state
            .debug_overlay
            .handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    state.camera.viewport = (w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(engine_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(engine_key),
                            ElementState::Released => state.input.key_up(engine_key),
                        }
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                // Fixed-step simulation phase.
                state.time.begin_frame();
                while state.time.should_step() {
                    if state.input.is_just_pressed(Key::F3) {
                        state.debug_overlay.toggle();
                    }

                    let advance = !state.paused || state.single_step_requested;
                    state.single_step_requested = false;
                    if advance && !state.step_scene(event_loop) {
                        return;
                    }

                    // Clearing edges per step (not per frame) keeps a press
                    // alive across zero-step frames while firing it exactly
                    // once on multi-step frames.
                    state.input.end_frame();
                }
                state.time.end_frame();

                if state.time.steps_this_frame > 0 {
                    state.rebuild_scene_mesh();
                }

                // Render phase reads finalized simulation state for the frame.
                let camera_uniform = state.camera.build_uniform();
                state.gpu.queue.write_buffer(
                    &state.camera_buffer,
                    0,
                    bytemuck::cast_slice(&[camera_uniform]),
                );

                let Some((output, view)) = state.gpu.begin_frame() else {
                    return;
                };

                let actor_count = state
                    .world
                    .as_ref()
                    .map(|w| w.actor_count() as u32)
                    .unwrap_or(0);
                let mode_label = match &state.world {
                    Some(world) => format!("{} ({})", state.mode, world.theme),
                    None => state.mode.label().to_string(),
                };
                let (egui_primitives, egui_textures_delta, overlay_actions) =
                    state.debug_overlay.prepare(
                        &state.window,
                        &state.time,
                        Some(OverlayStats {
                            draw_calls: state.draw_calls.len() as u32,
                            sprite_count: state.sprite_count as u32,
                            mode_label,
                            actor_count,
                            active_animations: actor_count,
                            paused: state.paused,
                        }),
                    );

                if overlay_actions.toggle_pause {
                    state.paused = !state.paused;
                    log::info!(
                        "Simulation {}",
                        if state.paused { "PAUSED" } else { "RESUMED" }
                    );
                }
                if overlay_actions.single_step {
                    state.single_step_requested = true;
                }
                let screen_descriptor = egui_wgpu::ScreenDescriptor {
                    size_in_pixels: [state.gpu.size.0, state.gpu.size.1],
                    pixels_per_point: state.window.scale_factor() as f32,
                };

                let mut encoder =
                    state
                        .gpu
                        .device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("Render Encoder"),
                        });

                {
                    let mut last_bound_texture_key: Option<&Arc<str>> = None;
                    let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("Scene Render Pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(state.clear_color()),
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        ..Default::default()
                    });

                    render_pass.set_pipeline(&state.sprite_pipeline.render_pipeline);
                    render_pass.set_bind_group(0, &state.camera_bind_group, &[]);
                    render_pass.set_vertex_buffer(0, state.vertex_buffer.slice(..));
                    render_pass
                        .set_index_buffer(state.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

                    for draw in &state.draw_calls {
                        if let Some(texture) = state.textures.get(&draw.texture_key) {
                            let need_rebind = match last_bound_texture_key {
                                Some(last) => **last != *draw.texture_key,
                                None => true,
                            };
                            if need_rebind {
                                render_pass.set_bind_group(1, &texture.bind_group, &[]);
                                last_bound_texture_key = Some(&draw.texture_key);
                            }
                            render_pass.draw_indexed(
                                draw.index_start..(draw.index_start + draw.index_count),
                                0,
                                0..1,
                            );
                        }
                    }
                }

                state.debug_overlay.upload(
                    &state.gpu.device,
                    &state.gpu.queue,
                    &mut encoder,
                    &egui_primitives,
                    &egui_textures_delta,
                    &screen_descriptor,
                );

                {
                    let mut egui_pass = encoder
                        .begin_render_pass(&wgpu::RenderPassDescriptor {
                            label: Some("egui Render Pass"),
                            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                                view: &view,
                                resolve_target: None,
                                ops: wgpu::Operations {
                                    load: wgpu::LoadOp::Load,
                                    store: wgpu::StoreOp::Store,
                                },
                            })],
                            depth_stencil_attachment: None,
                            ..Default::default()
                        })
                        .forget_lifetime();

                    state
                        .debug_overlay
                        .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
                }

                state.debug_overlay.cleanup(&egui_textures_delta);

                state.gpu.queue.submit(std::iter::once(encoder.finish()));
                output.present();
            }

            _ => {}
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn add_quad(
    vertices: &mut Vec<SpriteVertex>,
    indices: &mut Vec<u32>,
    draw_calls: &mut Vec<DrawCall>,
    spec: QuadSpec<'_>,
) {
    let half_w = spec.width * 0.5;
    let half_h = spec.height * 0.5;
    let base_index = vertices.len() as u32;

    // Screen space, y-down: the first two corners are the top edge.
    let mut corners = [
        [-half_w, -half_h],
        [half_w, -half_h],
        [half_w, half_h],
        [-half_w, half_h],
    ];
    let radians = spec.rotation_deg.to_radians();
    if radians != 0.0 {
        let (sin_r, cos_r) = radians.sin_cos();
        for c in &mut corners {
            let x = c[0];
            let y = c[1];
            c[0] = x * cos_r - y * sin_r;
            c[1] = x * sin_r + y * cos_r;
        }
    }

    let [u0, v0, u1, v1] = spec.uv;
    let tex = [[u0, v0], [u1, v0], [u1, v1], [u0, v1]];
    for (corner, uv) in corners.iter().zip(tex.iter()) {
        vertices.push(SpriteVertex {
            position: [spec.center_x + corner[0], spec.center_y + corner[1]],
            tex_coords: *uv,
            color: spec.color,
        });
    }

    let draw_start = indices.len() as u32;
    indices.extend_from_slice(&[
        base_index,
        base_index + 1,
        base_index + 2,
        base_index,
        base_index + 2,
        base_index + 3,
    ]);

    push_draw_call(draw_calls, Arc::from(spec.texture_key), draw_start, 6);
}

/// Append a draw call, merging with the previous one when the texture matches
/// and indices are contiguous. Scene quads are emitted in paint order, so runs
/// that share a texture collapse into a single `draw_indexed` call.
fn push_draw_call(
    draw_calls: &mut Vec<DrawCall>,
    texture_key: Arc<str>,
    index_start: u32,
    index_count: u32,
) {
    if let Some(last) = draw_calls.last_mut() {
        let contiguous = last.index_start + last.index_count == index_start;
        if *last.texture_key == *texture_key && contiguous {
            last.index_count += index_count;
            return;
        }
    }
    draw_calls.push(DrawCall {
        texture_key,
        index_start,
        index_count,
    });
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::Space => Some(Key::Space),
        KeyCode::F3 => Some(Key::F3),
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyD => Some(Key::D),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Super Mario FX Beta starting...");

    // A build with no levels has nothing to play; say so and stop cleanly
    // instead of failing later inside the menu's StartGame path.
    if level::builtin_levels().is_empty() {
        log::error!("No levels defined. Exiting.");
        return;
    }

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app).expect("Event loop error");
}
