//! Solar-system particle demo.
//!
//! Planets and particles live in storage buffers and are advanced by two
//! compute passes each frame; three render passes draw orbit lines, planets
//! and particles over a shared depth buffer. The CPU keeps its own orbit
//! mirror (`SolarSim`) for the two things the GPU cannot feed back: the
//! Saturn position uniform the ring follows, and the satellite particles
//! that re-parent to their moving planet.

use std::cell::RefCell;
use std::rc::Rc;

use instant::Instant;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;
use wgpu::util::DeviceExt;

use demo_core::camera::OrbitCamera;
use demo_core::constants::{
    ORBIT_SEGMENTS, PARTICLE_WORKGROUP_SIZE, PLANET_WORKGROUP_SIZE, TIME_SPEED_DIVISOR,
};
use demo_core::solar::{
    initial_orbits, initial_planet_instances, orbit_line_instances, seed_particles,
    CameraUniforms, Particle, ParticleParams, SolarSim, TimeUniforms, PLANETS,
    PLANET_INSTANCE_COUNT,
};

use crate::{dom, events, gpu};

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.02,
    g: 0.02,
    b: 0.05,
    a: 1.0,
};

const UI_HTML: &str = "\
<div style=\"display: flex; flex-direction: column; gap: 0.75rem;\">\
  <div style=\"display: flex; gap: 1.5rem; align-items: center; background: #1a1a1a; \
       padding: 0.75rem 1rem; border-radius: 6px;\">\
    <div style=\"display: flex; gap: 0.5rem; align-items: center;\">\
      <span style=\"font-size: 0.75rem; color: #888;\">Time speed</span>\
      <input type=\"range\" id=\"speed-slider\" min=\"0\" max=\"200\" value=\"50\" \
             style=\"width: 120px; cursor: pointer;\">\
      <span id=\"speed-value\" style=\"font-size: 0.75rem; color: #888;\">1.0x</span>\
    </div>\
    <button id=\"reset-btn\" style=\"padding: 0.4rem 0.8rem; background: #2a2a2a; \
            color: #e0e0e0; border: 1px solid #444; border-radius: 4px; cursor: pointer; \
            font-size: 0.75rem;\">Reset view</button>\
    <span style=\"font-size: 0.7rem; color: #555;\">\
      drag: rotate / right-drag or shift-drag: pan / wheel: zoom / double-click: reset\
    </span>\
  </div>\
  <canvas id=\"demo-canvas\" style=\"width: 100%; height: 70vh; border-radius: 6px; \
          background: #000;\"></canvas>\
</div>";

pub async fn run(document: &web::Document, app: &web::Element) -> anyhow::Result<()> {
    app.set_inner_html(UI_HTML);
    let canvas = dom::canvas_by_id(document, "demo-canvas")?;
    dom::sync_canvas_backing_size(&canvas);
    dom::wire_resize_sync(&canvas);

    let mut gpu = gpu::GpuContext::new(&canvas).await?;
    let device = gpu.device.clone();

    // Seed the scene.
    let mut rng = rand::thread_rng();
    let planet_instances = initial_planet_instances();
    let orbits = initial_orbits(&mut rng);
    let orbit_lines = orbit_line_instances();
    let mut particle_set = seed_particles(&mut rng);
    let total_particles = particle_set.particles.len() as u32;
    log::info!(
        "solar scene: {} planets, {} particles",
        PLANETS.len(),
        total_particles
    );

    let mut sim = SolarSim::new(&orbits);

    // Buffers.
    let camera_buf = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("camera_uniforms"),
        size: std::mem::size_of::<CameraUniforms>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let time_buf = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("time_uniforms"),
        size: std::mem::size_of::<TimeUniforms>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let particle_params_buf = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("particle_params"),
        size: std::mem::size_of::<ParticleParams>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let planet_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("planet_instances"),
        contents: bytemuck::cast_slice(&planet_instances),
        usage: wgpu::BufferUsages::STORAGE,
    });
    let orbit_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("planet_orbits"),
        contents: bytemuck::cast_slice(&orbits),
        usage: wgpu::BufferUsages::STORAGE,
    });
    let particle_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("particles"),
        contents: bytemuck::cast_slice(&particle_set.particles),
        usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
    });
    let orbit_line_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("orbit_lines"),
        contents: bytemuck::cast_slice(&orbit_lines),
        usage: wgpu::BufferUsages::STORAGE,
    });

    // Compute: planet orbit update.
    let planet_update_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("planet_update_shader"),
        source: wgpu::ShaderSource::Wgsl(demo_core::PLANET_UPDATE_WGSL.into()),
    });
    let planet_update_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("planet_update_bgl"),
        entries: &[
            uniform_entry(0, wgpu::ShaderStages::COMPUTE),
            storage_entry(1, wgpu::ShaderStages::COMPUTE, false),
            storage_entry(2, wgpu::ShaderStages::COMPUTE, false),
        ],
    });
    let planet_update_pipeline =
        device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("planet_update_pipeline"),
            layout: Some(
                &device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("planet_update_pl"),
                    bind_group_layouts: &[&planet_update_bgl],
                    push_constant_ranges: &[],
                }),
            ),
            module: &planet_update_shader,
            entry_point: Some("main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            cache: None,
        });
    let planet_update_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("planet_update_bg"),
        layout: &planet_update_bgl,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: time_buf.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: planet_buf.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: orbit_buf.as_entire_binding(),
            },
        ],
    });

    // Compute: particle update.
    let particle_update_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("particle_update_shader"),
        source: wgpu::ShaderSource::Wgsl(demo_core::PARTICLE_UPDATE_WGSL.into()),
    });
    let particle_update_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("particle_update_bgl"),
        entries: &[
            uniform_entry(0, wgpu::ShaderStages::COMPUTE),
            storage_entry(1, wgpu::ShaderStages::COMPUTE, false),
            uniform_entry(2, wgpu::ShaderStages::COMPUTE),
        ],
    });
    let particle_update_pipeline =
        device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("particle_update_pipeline"),
            layout: Some(
                &device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("particle_update_pl"),
                    bind_group_layouts: &[&particle_update_bgl],
                    push_constant_ranges: &[],
                }),
            ),
            module: &particle_update_shader,
            entry_point: Some("main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            cache: None,
        });
    let particle_update_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("particle_update_bg"),
        layout: &particle_update_bgl,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: time_buf.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: particle_buf.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: particle_params_buf.as_entire_binding(),
            },
        ],
    });

    // Render: all three passes share the camera + one read-only storage
    // buffer layout.
    let scene_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("scene_bgl"),
        entries: &[
            uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
            storage_entry(1, wgpu::ShaderStages::VERTEX, true),
        ],
    });
    let scene_pl = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("scene_pl"),
        bind_group_layouts: &[&scene_bgl],
        push_constant_ranges: &[],
    });

    let format = gpu.config.format;
    let orbit_pipeline = scene_pipeline(
        &device,
        &scene_pl,
        "orbit_line_pipeline",
        demo_core::ORBIT_LINES_WGSL,
        format,
        true,
        false,
    );
    let planet_pipeline = scene_pipeline(
        &device,
        &scene_pl,
        "planet_pipeline",
        demo_core::PLANETS_WGSL,
        format,
        false,
        true,
    );
    let particle_pipeline = scene_pipeline(
        &device,
        &scene_pl,
        "particle_pipeline",
        demo_core::PARTICLES_WGSL,
        format,
        true,
        false,
    );

    let orbit_bg = scene_bind_group(&device, &scene_bgl, "orbit_bg", &camera_buf, &orbit_line_buf);
    let planet_bg = scene_bind_group(&device, &scene_bgl, "planet_bg", &camera_buf, &planet_buf);
    let particle_bg =
        scene_bind_group(&device, &scene_bgl, "particle_bg", &camera_buf, &particle_buf);

    let mut depth_view = gpu::create_depth_view(&device, gpu.config.width, gpu.config.height);

    // Shared mutable state between event handlers and the frame loop.
    let camera = Rc::new(RefCell::new(OrbitCamera::new()));
    let time_speed = Rc::new(RefCell::new(1.0f32));

    events::wire_camera_controls(&canvas, camera.clone())?;

    let speed_slider = dom::input_by_id(document, "speed-slider")?;
    {
        let time_speed = time_speed.clone();
        let slider = speed_slider.clone();
        let document = document.clone();
        dom::add_input_listener(&document.clone(), "speed-slider", "input", move || {
            let raw: f32 = slider.value().parse().unwrap_or(50.0);
            let speed = raw / TIME_SPEED_DIVISOR;
            *time_speed.borrow_mut() = speed;
            dom::set_text(&document, "speed-value", &format!("{speed:.1}x"));
        });
    }
    {
        let camera = camera.clone();
        let time_speed = time_speed.clone();
        let document = document.clone();
        dom::add_click_listener(&document.clone(), "reset-btn", move || {
            camera.borrow_mut().reset();
            speed_slider.set_value("50");
            *time_speed.borrow_mut() = 1.0;
            dom::set_text(&document, "speed-value", "1.0x");
        });
    }

    // Frame loop.
    let sat_range = particle_set.satellite_range();
    let sat_offset = (sat_range.start * std::mem::size_of::<Particle>()) as u64;
    let mut last_instant = Instant::now();
    let mut sim_time = 0.0f32;

    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let now = Instant::now();
        let dt = (now - last_instant).as_secs_f32() * *time_speed.borrow();
        last_instant = now;
        sim_time += dt;

        // CPU mirror: planets, then the ring-follow uniform and satellites.
        sim.step(dt);
        let saturn = sim.saturn_position();
        gpu.queue.write_buffer(
            &particle_params_buf,
            0,
            bytemuck::bytes_of(&ParticleParams {
                saturn_ring_start: particle_set.saturn_ring_start,
                saturn_ring_end: particle_set.saturn_ring_end,
                _pad0: [0; 2],
                saturn_position: saturn.to_array(),
                _pad1: 0.0,
            }),
        );
        sim.update_satellites(
            &mut particle_set.satellites,
            &mut particle_set.particles,
            dt,
        );
        if !particle_set.satellites.is_empty() {
            let range = particle_set.satellite_range();
            gpu.queue.write_buffer(
                &particle_buf,
                sat_offset,
                bytemuck::cast_slice(&particle_set.particles[range]),
            );
        }

        // Live canvas size for aspect ratio and the depth buffer.
        let (w, h) = (canvas.width(), canvas.height());
        if gpu.resize_if_needed(w, h) {
            depth_view = gpu::create_depth_view(&gpu.device, w, h);
        }
        let matrices = camera.borrow().matrices(gpu.aspect());
        gpu.queue.write_buffer(
            &camera_buf,
            0,
            bytemuck::bytes_of(&CameraUniforms {
                view_projection: matrices.view_projection.to_cols_array_2d(),
                camera_position: matrices.position.to_array(),
                _pad: 0.0,
            }),
        );
        gpu.queue.write_buffer(
            &time_buf,
            0,
            bytemuck::bytes_of(&TimeUniforms {
                time: sim_time,
                delta_time: dt,
            }),
        );

        let frame = match gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("surface frame unavailable: {e:?}");
                gpu.surface.configure(&gpu.device, &gpu.config);
                schedule_next(&tick_clone);
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("solar_encoder"),
            });

        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("solar_compute"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&planet_update_pipeline);
            pass.set_bind_group(0, &planet_update_bg, &[]);
            pass.dispatch_workgroups(
                (PLANET_INSTANCE_COUNT as u32).div_ceil(PLANET_WORKGROUP_SIZE),
                1,
                1,
            );
            pass.set_pipeline(&particle_update_pipeline);
            pass.set_bind_group(0, &particle_update_bg, &[]);
            pass.dispatch_workgroups(total_particles.div_ceil(PARTICLE_WORKGROUP_SIZE), 1, 1);
        }

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("solar_render"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            // Orbit lines behind the planets, particles last.
            pass.set_pipeline(&orbit_pipeline);
            pass.set_bind_group(0, &orbit_bg, &[]);
            pass.draw(0..ORBIT_SEGMENTS * 6, 0..PLANETS.len() as u32);

            pass.set_pipeline(&planet_pipeline);
            pass.set_bind_group(0, &planet_bg, &[]);
            pass.draw(0..6, 0..PLANET_INSTANCE_COUNT as u32);

            pass.set_pipeline(&particle_pipeline);
            pass.set_bind_group(0, &particle_bg, &[]);
            pass.draw(0..6, 0..total_particles);
        }

        gpu.queue.submit(Some(encoder.finish()));
        frame.present();

        schedule_next(&tick_clone);
    }) as Box<dyn FnMut()>));

    schedule_next(&tick);
    Ok(())
}

fn schedule_next(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(closure)) = (web::window(), tick.borrow().as_ref()) {
        let _ = w.request_animation_frame(closure.as_ref().unchecked_ref());
    }
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn storage_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
    read_only: bool,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn scene_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    label: &str,
    camera_buf: &wgpu::Buffer,
    instance_buf: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buf.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: instance_buf.as_entire_binding(),
            },
        ],
    })
}

/// Build one of the three scene pipelines. The transparent passes (orbit
/// lines, particles) alpha-blend and read the depth buffer without writing
/// it, so they sort against the opaque planets but not against each other.
fn scene_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    label: &str,
    wgsl: &str,
    format: wgpu::TextureFormat,
    blended: bool,
    depth_write: bool,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(wgsl.into()),
    });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers: &[],
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: blended.then_some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: Some(wgpu::DepthStencilState {
            format: wgpu::TextureFormat::Depth24Plus,
            depth_write_enabled: depth_write,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
