mod traffy_state;

pub use traffy_state::TraffyState;
