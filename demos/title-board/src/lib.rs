use wasm_bindgen::prelude::*;

mod app;
pub mod scenes;

pub use app::TitleBoard;

frame_web::export_frames!(TitleBoard, "title-board");
