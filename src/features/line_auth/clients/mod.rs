mod line_client;

pub use line_client::{LineClient, LineProfile};
