pub mod frame_canvas;
pub mod overlay_renderer;
