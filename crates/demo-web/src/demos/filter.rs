//! Image-filter demo.
//!
//! The source image is generated on the CPU and shown in a plain 2D canvas;
//! the filtered copy is computed by `filter.wgsl` over packed RGBA u32s and
//! presented straight from the output storage buffer by a fullscreen
//! triangle, so no pixel readback is needed. The filter re-runs whenever a
//! control changes.

use std::rc::Rc;

use wasm_bindgen::{Clamped, JsCast};
use web_sys as web;
use wgpu::util::DeviceExt;

use demo_core::constants::{FILTER_IMAGE_HEIGHT, FILTER_IMAGE_WIDTH, FILTER_WORKGROUP_SIZE};
use demo_core::filter::{pack_pixels, sample_image, FilterKind, FilterParams};

use crate::{dom, gpu};

const UI_HTML: &str = "\
<div style=\"display: flex; flex-direction: column; gap: 1rem;\">\
  <div style=\"display: grid; grid-template-columns: 1fr 2fr; gap: 1rem; align-items: end; \
       background: #1a1a1a; padding: 1rem; border-radius: 6px;\">\
    <div style=\"display: flex; flex-direction: column; gap: 0.5rem;\">\
      <span style=\"font-size: 0.75rem; color: #888;\">Filter</span>\
      <select id=\"filter-select\" style=\"padding: 0.5rem 0.75rem; background: #2a2a2a; \
              color: #e0e0e0; border: 1px solid #444; border-radius: 4px; cursor: pointer; \
              height: 36px;\">\
        <option value=\"none\">None</option>\
        <option value=\"grayscale\">Grayscale</option>\
        <option value=\"sepia\">Sepia</option>\
        <option value=\"invert\">Invert</option>\
        <option value=\"blur\">Blur</option>\
      </select>\
    </div>\
    <div style=\"display: flex; flex-direction: column; gap: 0.5rem;\">\
      <div style=\"display: flex; justify-content: space-between; align-items: center;\">\
        <span style=\"font-size: 0.75rem; color: #888;\">Intensity</span>\
        <span id=\"intensity-value\" style=\"font-size: 0.75rem; color: #888;\">100%</span>\
      </div>\
      <input type=\"range\" id=\"intensity-slider\" min=\"0\" max=\"100\" value=\"100\" \
             style=\"width: 100%; cursor: pointer; height: 36px;\">\
    </div>\
  </div>\
  <div style=\"display: grid; grid-template-columns: 1fr 1fr; gap: 1rem;\">\
    <div>\
      <p style=\"margin: 0 0 0.25rem 0; color: #666; font-size: 0.75rem;\">Source</p>\
      <canvas id=\"source-canvas\" width=\"512\" height=\"384\" style=\"width: 100%; \
              height: auto; border: 1px solid #333; border-radius: 6px;\"></canvas>\
    </div>\
    <div>\
      <p style=\"margin: 0 0 0.25rem 0; color: #666; font-size: 0.75rem;\">Filtered</p>\
      <canvas id=\"result-canvas\" width=\"512\" height=\"384\" style=\"width: 100%; \
              height: auto; border: 1px solid #333; border-radius: 6px;\"></canvas>\
    </div>\
  </div>\
</div>";

struct FilterDemo {
    gpu: gpu::GpuContext,
    params_buf: wgpu::Buffer,
    compute_pipeline: wgpu::ComputePipeline,
    compute_bg: wgpu::BindGroup,
    present_pipeline: wgpu::RenderPipeline,
    present_bg: wgpu::BindGroup,
    select: web::HtmlSelectElement,
    slider: web::HtmlInputElement,
}

pub async fn run(document: &web::Document, app: &web::Element) -> anyhow::Result<()> {
    app.set_inner_html(UI_HTML);

    let width = FILTER_IMAGE_WIDTH;
    let height = FILTER_IMAGE_HEIGHT;
    let rgba = sample_image(width, height);

    // Source preview via the 2D canvas.
    let source_canvas = dom::canvas_by_id(document, "source-canvas")?;
    let ctx = source_canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|c| c.dyn_into::<web::CanvasRenderingContext2d>().ok())
        .ok_or_else(|| anyhow::anyhow!("no 2d context on #source-canvas"))?;
    let image = web::ImageData::new_with_u8_clamped_array_and_sh(Clamped(&rgba), width, height)
        .map_err(|e| anyhow::anyhow!(format!("{e:?}")))?;
    ctx.put_image_data(&image, 0.0, 0.0)
        .map_err(|e| anyhow::anyhow!(format!("{e:?}")))?;

    // The result canvas backing store is the image size exactly; the present
    // shader indexes the pixel buffer by fragment position.
    let result_canvas = dom::canvas_by_id(document, "result-canvas")?;
    result_canvas.set_width(width);
    result_canvas.set_height(height);

    let gpu = gpu::GpuContext::new(&result_canvas).await?;
    let device = &gpu.device;

    let params_buf = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("filter_params"),
        size: std::mem::size_of::<FilterParams>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let input_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("filter_input"),
        contents: bytemuck::cast_slice(&pack_pixels(&rgba)),
        usage: wgpu::BufferUsages::STORAGE,
    });
    let output_buf = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("filter_output"),
        size: (width * height * 4) as u64,
        usage: wgpu::BufferUsages::STORAGE,
        mapped_at_creation: false,
    });

    let compute_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("filter_shader"),
        source: wgpu::ShaderSource::Wgsl(demo_core::FILTER_WGSL.into()),
    });
    let compute_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("filter_bgl"),
        entries: &[
            buffer_entry(0, wgpu::ShaderStages::COMPUTE, wgpu::BufferBindingType::Uniform),
            buffer_entry(
                1,
                wgpu::ShaderStages::COMPUTE,
                wgpu::BufferBindingType::Storage { read_only: true },
            ),
            buffer_entry(
                2,
                wgpu::ShaderStages::COMPUTE,
                wgpu::BufferBindingType::Storage { read_only: false },
            ),
        ],
    });
    let compute_pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some("filter_pipeline"),
        layout: Some(
            &device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("filter_pl"),
                bind_group_layouts: &[&compute_bgl],
                push_constant_ranges: &[],
            }),
        ),
        module: &compute_shader,
        entry_point: Some("main"),
        compilation_options: wgpu::PipelineCompilationOptions::default(),
        cache: None,
    });
    let compute_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("filter_bg"),
        layout: &compute_bgl,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: params_buf.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: input_buf.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: output_buf.as_entire_binding(),
            },
        ],
    });

    let present_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("filter_present_shader"),
        source: wgpu::ShaderSource::Wgsl(demo_core::FILTER_PRESENT_WGSL.into()),
    });
    let present_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("filter_present_bgl"),
        entries: &[
            buffer_entry(
                0,
                wgpu::ShaderStages::FRAGMENT,
                wgpu::BufferBindingType::Uniform,
            ),
            buffer_entry(
                1,
                wgpu::ShaderStages::FRAGMENT,
                wgpu::BufferBindingType::Storage { read_only: true },
            ),
        ],
    });
    let present_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("filter_present_pipeline"),
        layout: Some(
            &device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("filter_present_pl"),
                bind_group_layouts: &[&present_bgl],
                push_constant_ranges: &[],
            }),
        ),
        vertex: wgpu::VertexState {
            module: &present_shader,
            entry_point: Some("vs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers: &[],
        },
        fragment: Some(wgpu::FragmentState {
            module: &present_shader,
            entry_point: Some("fs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: gpu.config.format,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });
    let present_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("filter_present_bg"),
        layout: &present_bgl,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: params_buf.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: output_buf.as_entire_binding(),
            },
        ],
    });

    let demo = Rc::new(FilterDemo {
        gpu,
        params_buf,
        compute_pipeline,
        compute_bg,
        present_pipeline,
        present_bg,
        select: dom::select_by_id(document, "filter-select")?,
        slider: dom::input_by_id(document, "intensity-slider")?,
    });

    {
        let demo = demo.clone();
        dom::add_input_listener(document, "filter-select", "change", move || demo.apply());
    }
    {
        let demo = demo.clone();
        let document = document.clone();
        dom::add_input_listener(&document.clone(), "intensity-slider", "input", move || {
            let raw: f32 = demo.slider.value().parse().unwrap_or(100.0);
            dom::set_text(&document, "intensity-value", &format!("{raw:.0}%"));
            demo.apply();
        });
    }

    demo.apply();
    Ok(())
}

impl FilterDemo {
    /// Run the filter over the source image and present the result.
    fn apply(&self) {
        let kind = match FilterKind::from_name(&self.select.value()) {
            Ok(kind) => kind,
            Err(e) => {
                log::warn!("{e}; falling back to no filter");
                FilterKind::None
            }
        };
        let intensity = self.slider.value().parse::<f32>().unwrap_or(100.0) / 100.0;

        let width = FILTER_IMAGE_WIDTH;
        let height = FILTER_IMAGE_HEIGHT;
        self.gpu.queue.write_buffer(
            &self.params_buf,
            0,
            bytemuck::bytes_of(&FilterParams {
                filter: kind.as_u32(),
                intensity,
                width,
                height,
            }),
        );

        let frame = match self.gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(e) => {
                log::warn!("surface frame unavailable: {e:?}");
                return;
            }
        };
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder =
            self.gpu
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("filter_encoder"),
                });
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("filter_compute"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.compute_pipeline);
            pass.set_bind_group(0, &self.compute_bg, &[]);
            pass.dispatch_workgroups((width * height).div_ceil(FILTER_WORKGROUP_SIZE), 1, 1);
        }
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("filter_present"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.present_pipeline);
            pass.set_bind_group(0, &self.present_bg, &[]);
            pass.draw(0..3, 0..1);
        }

        self.gpu.queue.submit(Some(encoder.finish()));
        frame.present();
    }
}

fn buffer_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
    ty: wgpu::BufferBindingType,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}
