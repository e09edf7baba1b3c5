mod line_dto;

pub use line_dto::{LineCallbackQuery, LineLoginDto};
