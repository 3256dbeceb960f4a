mod canvas;
mod toolbar;

pub use canvas::{CanvasState, roi_canvas};
pub use toolbar::toolbar;
