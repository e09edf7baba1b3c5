mod line_handler;

pub use line_handler::{__path_line_callback, line_callback};
