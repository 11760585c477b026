//! Compute-shader sandbox: double a small f32 array on the GPU.
//!
//! The readback never blocks the UI thread: the staging buffer is mapped
//! with `map_async` and an atomic completion flag, then polled from an
//! animation-frame loop until the data is ready.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use rand::Rng;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;
use wgpu::util::DeviceExt;

use crate::{dom, gpu};

const ARRAY_SIZE: usize = 4;

/// Mirrors `NumberArray` in doubler.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Pod, Zeroable)]
struct NumberArray {
    size: f32,
    numbers: [f32; ARRAY_SIZE],
}

const UI_HTML: &str = "\
<p>Compute-shader sandbox. A small array is doubled on the GPU; the result \
is read back without blocking the page.</p>\
<pre id=\"playground-output\" style=\"background: #1a1a1a; padding: 1rem; \
     border-radius: 6px; color: #e0e0e0;\">running...</pre>";

pub async fn run(document: &web::Document, app: &web::Element) -> anyhow::Result<()> {
    app.set_inner_html(UI_HTML);

    let (device, queue) = gpu::GpuContext::new_headless().await?;

    let mut rng = rand::thread_rng();
    let input = NumberArray {
        size: ARRAY_SIZE as f32,
        numbers: std::array::from_fn(|_| (rng.gen::<f32>() * 10.0).floor()),
    };
    log::info!("playground input: {:?}", input.numbers);

    let input_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("doubler_input"),
        contents: bytemuck::bytes_of(&input),
        usage: wgpu::BufferUsages::STORAGE,
    });
    let result_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("doubler_result"),
        contents: bytemuck::bytes_of(&NumberArray::default()),
        usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
    });
    let staging_buf = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("doubler_staging"),
        size: std::mem::size_of::<NumberArray>() as u64,
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("doubler_shader"),
        source: wgpu::ShaderSource::Wgsl(demo_core::DOUBLER_WGSL.into()),
    });
    let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("doubler_bgl"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::COMPUTE,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: true },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::COMPUTE,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: false },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
    });
    let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some("doubler_pipeline"),
        layout: Some(
            &device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("doubler_pl"),
                bind_group_layouts: &[&bgl],
                push_constant_ranges: &[],
            }),
        ),
        module: &shader,
        entry_point: Some("main"),
        compilation_options: wgpu::PipelineCompilationOptions::default(),
        cache: None,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("doubler_bg"),
        layout: &bgl,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: input_buf.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: result_buf.as_entire_binding(),
            },
        ],
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("doubler_encoder"),
    });
    {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("doubler_pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.dispatch_workgroups(1, 1, 1);
    }
    encoder.copy_buffer_to_buffer(
        &result_buf,
        0,
        &staging_buf,
        0,
        std::mem::size_of::<NumberArray>() as u64,
    );
    queue.submit(Some(encoder.finish()));

    let map_complete = Arc::new(AtomicBool::new(false));
    {
        let map_complete = map_complete.clone();
        staging_buf
            .slice(..)
            .map_async(wgpu::MapMode::Read, move |result| {
                if result.is_ok() {
                    map_complete.store(true, Ordering::SeqCst);
                }
            });
    }

    // Poll until the map callback fires, then show the result.
    let document = document.clone();
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let _ = device.poll(wgpu::Maintain::Poll);
        if !map_complete.load(Ordering::SeqCst) {
            if let (Some(w), Some(closure)) = (web::window(), tick_clone.borrow().as_ref()) {
                let _ = w.request_animation_frame(closure.as_ref().unchecked_ref());
            }
            return;
        }

        let result = {
            let data = staging_buf.slice(..).get_mapped_range();
            *bytemuck::from_bytes::<NumberArray>(&data)
        };
        staging_buf.unmap();

        log::info!("playground result: {:?}", result.numbers);
        dom::set_text(
            &document,
            "playground-output",
            &format!("input:  {:?}\noutput: {:?}", input.numbers, result.numbers),
        );
    }) as Box<dyn FnMut()>));

    if let (Some(w), Some(closure)) = (web::window(), tick.borrow().as_ref()) {
        let _ = w.request_animation_frame(closure.as_ref().unchecked_ref());
    }
    Ok(())
}
