use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

type FrameCallback = Closure<dyn FnMut(f64)>;

/// Run `on_frame` on every display refresh with the `requestAnimationFrame`
/// timestamp (milliseconds).
///
/// The next frame is requested before `on_frame` runs, so the loop keeps going
/// whatever the frame does. The closure owns itself and lives for the rest of
/// the page.
pub fn animation_loop<F>(mut on_frame: F) -> Result<(), JsValue>
where
    F: FnMut(f64) + 'static,
{
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
    let slot: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
    let rearm = slot.clone();
    let win = window.clone();

    *slot.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
        if let Some(callback) = rearm.borrow().as_ref() {
            if let Err(e) = win.request_animation_frame(callback.as_ref().unchecked_ref()) {
                log::error!("requestAnimationFrame failed: {:?}", e);
            }
        }
        on_frame(timestamp);
    }));

    if let Some(callback) = slot.borrow().as_ref() {
        window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    }
    Ok(())
}
