pub mod runner;
pub mod schedule;

pub use frame_engine;
pub use runner::{App, FrameRunner};
pub use schedule::animation_loop;

/// Generate all `#[wasm_bindgen]` exports for an app.
///
/// Generates `thread_local!` storage for the `FrameRunner`, a `with_runner()`
/// helper, and the exports JS calls: `frame_init` (or
/// `frame_init_with_config`), `frame_load_atlas`,
/// `frame_start`, input handlers and a few accessors.
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod app;
/// use app::MyApp;
///
/// frame_web::export_frames!(MyApp, "my-app");
/// ```
///
/// The app type must implement `frame_web::App` and `Default`. The calling
/// crate needs `wasm-bindgen`, `js-sys`, `log`, `console_log` and
/// `console_error_panic_hook` as dependencies.
///
/// `frame_start(present)` starts the loop; every frame `present` is called
/// with the frame's draw commands as a JSON string.
#[macro_export]
macro_rules! export_frames {
    ($app_type:ty, $app_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::FrameRunner<$app_type>>> = RefCell::new(None);
        }

        fn with_runner<R>(f: impl FnOnce(&mut $crate::FrameRunner<$app_type>) -> R) -> Option<R> {
            RUNNER.with(|cell| {
                let mut borrow = cell.borrow_mut();
                match borrow.as_mut() {
                    Some(runner) => Some(f(runner)),
                    None => {
                        log::error!("{}: not initialized, call frame_init() first", $app_name);
                        None
                    }
                }
            })
        }

        fn to_js_error(e: $crate::frame_engine::EngineError) -> JsValue {
            JsValue::from_str(&e.to_string())
        }

        #[wasm_bindgen]
        pub fn frame_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let runner = $crate::FrameRunner::new(<$app_type as Default>::default());
            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });
            log::info!("{}: initialized", $app_name);
        }

        /// `frame_init`, with a partial JSON engine config over the app's own.
        #[wasm_bindgen]
        pub fn frame_init_with_config(json: &str) -> Result<(), JsValue> {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let runner = $crate::FrameRunner::with_config_json(<$app_type as Default>::default(), json)
                .map_err(to_js_error)?;
            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some(runner);
            });
            log::info!("{}: initialized with config override", $app_name);
            Ok(())
        }

        /// `image_count` images must already be loaded by the page, in atlas order.
        #[wasm_bindgen]
        pub fn frame_load_atlas(json: &str, image_count: u32) -> Result<(), JsValue> {
            match with_runner(|r| r.load_atlas(json, image_count)) {
                Some(result) => result.map_err(to_js_error),
                None => Err(JsValue::from_str(concat!($app_name, ": not initialized"))),
            }
        }

        #[wasm_bindgen]
        pub fn frame_start(present: js_sys::Function) -> Result<(), JsValue> {
            match with_runner(|r| r.start()) {
                Some(result) => result.map_err(to_js_error)?,
                None => return Err(JsValue::from_str(concat!($app_name, ": not initialized"))),
            }
            $crate::animation_loop(move |timestamp| match with_runner(|r| r.tick(timestamp)) {
                Some(Ok(frame)) => {
                    if let Err(e) = present.call1(&JsValue::NULL, &JsValue::from_str(&frame)) {
                        log::error!("{}: presenter failed: {:?}", $app_name, e);
                    }
                }
                Some(Err($crate::frame_engine::EngineError::NoActiveScene)) => {
                    log::error!("{}: frame requested with no active scene", $app_name);
                    panic!("{}: frame loop running without an active scene", $app_name);
                }
                Some(Err(e)) => log::error!("{}: frame failed: {}", $app_name, e),
                None => {}
            })
        }

        #[wasm_bindgen]
        pub fn frame_key_down(key: &str) {
            with_runner(|r| r.key_down(key));
        }

        #[wasm_bindgen]
        pub fn frame_key_up(key: &str) {
            with_runner(|r| r.key_up(key));
        }

        #[wasm_bindgen]
        pub fn frame_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.pointer_down(x, y));
        }

        #[wasm_bindgen]
        pub fn frame_click(x: f32, y: f32) {
            with_runner(|r| r.click(x, y));
        }

        #[wasm_bindgen]
        pub fn frame_touch_start(id: u32, x: f32, y: f32) {
            with_runner(|r| r.touch_start(id, x, y));
        }

        #[wasm_bindgen]
        pub fn frame_touch_move(id: u32, x: f32, y: f32) {
            with_runner(|r| r.touch_move(id, x, y));
        }

        #[wasm_bindgen]
        pub fn frame_touch_end(id: u32) {
            with_runner(|r| r.touch_end(id));
        }

        #[wasm_bindgen]
        pub fn frame_touch_cancel(id: u32) {
            with_runner(|r| r.touch_cancel(id));
        }

        #[wasm_bindgen]
        pub fn frame_set_display_fps(display: bool) {
            with_runner(|r| r.set_display_fps(display));
        }

        #[wasm_bindgen]
        pub fn frame_surface_width() -> f32 {
            with_runner(|r| r.surface_width()).unwrap_or(0.0)
        }

        #[wasm_bindgen]
        pub fn frame_surface_height() -> f32 {
            with_runner(|r| r.surface_height()).unwrap_or(0.0)
        }
    };
}
