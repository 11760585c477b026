#![cfg(target_arch = "wasm32")]
//! WASM entry point for the WebGPU demo collection.
//!
//! With no `?demo=` query the page renders the demo index; otherwise the
//! named demo takes over the `#app` element. Any initialization failure
//! (most commonly a browser without WebGPU) is rendered as an error panel.

mod demos;
mod dom;
mod events;
mod gpu;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

struct DemoEntry {
    id: &'static str,
    title: &'static str,
    description: &'static str,
}

const DEMOS: &[DemoEntry] = &[
    DemoEntry {
        id: "playground",
        title: "Playground",
        description: "Compute-shader sandbox: double an array on the GPU",
    },
    DemoEntry {
        id: "image-filter",
        title: "Image Filter",
        description: "Real-time GPU image filtering",
    },
    DemoEntry {
        id: "particle-system",
        title: "Particle System",
        description: "Solar system with tens of thousands of GPU particles",
    },
    DemoEntry {
        id: "snow-dome",
        title: "Snow Dome",
        description: "3D snow dome (particles + interaction)",
    },
];

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("demo-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {e:?}");
            if let Ok((_, document)) = dom::window_document() {
                if let Ok(app) = dom::element_by_id(&document, "app") {
                    show_webgpu_error(&app, &format!("{e:#}"));
                }
            }
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let (window, document) = dom::window_document()?;
    let app = dom::element_by_id(&document, "app")?;

    let selected = demo_from_location(&window);
    match selected.as_deref() {
        None => {
            render_demo_index(&document, &app)?;
            Ok(())
        }
        Some("particle-system") => demos::solar::run(&document, &app).await,
        Some("image-filter") => demos::filter::run(&document, &app).await,
        Some("playground") => demos::playground::run(&document, &app).await,
        Some("snow-dome") => demos::snow_dome::run(&app),
        Some(other) => {
            show_webgpu_error(&app, &format!("unknown demo '{other}'"));
            Ok(())
        }
    }
}

/// Read the `demo` query parameter, if any.
fn demo_from_location(window: &web::Window) -> Option<String> {
    let search = window.location().search().ok()?;
    let params = web::UrlSearchParams::new_with_str(&search).ok()?;
    params.get("demo")
}

fn render_demo_index(document: &web::Document, app: &web::Element) -> anyhow::Result<()> {
    let list = document
        .create_element("ul")
        .map_err(|e| anyhow::anyhow!(format!("{e:?}")))?;
    list.set_class_name("demo-list");

    for demo in DEMOS {
        let li = document
            .create_element("li")
            .map_err(|e| anyhow::anyhow!(format!("{e:?}")))?;
        let a = document
            .create_element("a")
            .map_err(|e| anyhow::anyhow!(format!("{e:?}")))?;
        a.set_attribute("href", &format!("?demo={}", demo.id)).ok();
        a.set_inner_html(&format!(
            "<strong>{}</strong><div class=\"demo-description\">{}</div>",
            demo.title, demo.description
        ));
        li.append_child(&a).ok();
        list.append_child(&li).ok();
    }
    app.append_child(&list)
        .map_err(|e| anyhow::anyhow!(format!("{e:?}")))?;
    Ok(())
}

/// Error panel shown when WebGPU setup (or anything before it) fails.
fn show_webgpu_error(container: &web::Element, message: &str) {
    container.set_inner_html(&format!(
        "<div style=\"padding: 2rem; background: #1a1a1a; border: 1px solid #f87171; \
         border-radius: 8px; color: #f87171;\">\
           <h2>WebGPU Error</h2>\
           <p>{message}</p>\
           <p style=\"color: #888; font-size: 0.9rem;\">\
             Use a browser with WebGPU support (Chrome 113+, Edge 113+, Firefox Nightly).\
           </p>\
         </div>"
    ));
}
