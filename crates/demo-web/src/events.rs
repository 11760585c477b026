use std::cell::RefCell;
use std::rc::Rc;

use anyhow::anyhow;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use demo_core::camera::{DragMode, OrbitCamera};

fn set_cursor(canvas: &web::HtmlCanvasElement, cursor: &str) {
    if let Ok(el) = canvas.clone().dyn_into::<web::HtmlElement>() {
        let _ = el.style().set_property("cursor", cursor);
    }
}

/// Attach orbit-camera pointer and wheel controls to a canvas.
///
/// Pointer moves and releases are tracked on the window so a drag that
/// leaves the canvas keeps working. Wheel zoom is registered non-passive
/// so the page does not scroll under the canvas.
pub fn wire_camera_controls(
    canvas: &web::HtmlCanvasElement,
    camera: Rc<RefCell<OrbitCamera>>,
) -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow!("no window"))?;
    set_cursor(canvas, "grab");

    {
        let camera = camera.clone();
        let canvas_for_cursor = canvas.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            let mode = DragMode::from_pointer(ev.button(), ev.shift_key());
            if mode == DragMode::None {
                return;
            }
            camera
                .borrow_mut()
                .begin_drag(ev.client_x() as f32, ev.client_y() as f32, mode);
            let cursor = if mode == DragMode::Pan { "move" } else { "grabbing" };
            set_cursor(&canvas_for_cursor, cursor);
        }) as Box<dyn FnMut(web::PointerEvent)>);
        canvas
            .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow!(format!("{:?}", e)))?;
        closure.forget();
    }

    {
        let camera = camera.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::PointerEvent| {
            camera
                .borrow_mut()
                .drag_to(ev.client_x() as f32, ev.client_y() as f32);
        }) as Box<dyn FnMut(web::PointerEvent)>);
        window
            .add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow!(format!("{:?}", e)))?;
        closure.forget();
    }

    {
        let camera = camera.clone();
        let canvas_for_cursor = canvas.clone();
        let closure = Closure::wrap(Box::new(move |_ev: web::PointerEvent| {
            camera.borrow_mut().end_drag();
            set_cursor(&canvas_for_cursor, "grab");
        }) as Box<dyn FnMut(web::PointerEvent)>);
        window
            .add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow!(format!("{:?}", e)))?;
        closure.forget();
    }

    {
        let camera = camera.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::WheelEvent| {
            ev.prevent_default();
            camera.borrow_mut().zoom(ev.delta_y() as f32);
        }) as Box<dyn FnMut(web::WheelEvent)>);
        let opts = web::AddEventListenerOptions::new();
        opts.set_passive(false);
        canvas
            .add_event_listener_with_callback_and_add_event_listener_options(
                "wheel",
                closure.as_ref().unchecked_ref(),
                &opts,
            )
            .map_err(|e| anyhow!(format!("{:?}", e)))?;
        closure.forget();
    }

    {
        let camera = camera.clone();
        let closure = Closure::wrap(Box::new(move |_ev: web::MouseEvent| {
            camera.borrow_mut().reset();
        }) as Box<dyn FnMut(web::MouseEvent)>);
        canvas
            .add_event_listener_with_callback("dblclick", closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow!(format!("{:?}", e)))?;
        closure.forget();
    }

    {
        // Right-drag pans, so suppress the context menu on the canvas.
        let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
            ev.prevent_default();
        }) as Box<dyn FnMut(web::MouseEvent)>);
        canvas
            .add_event_listener_with_callback("contextmenu", closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow!(format!("{:?}", e)))?;
        closure.forget();
    }

    Ok(())
}
