mod line_auth_service;

pub use line_auth_service::LineAuthService;
