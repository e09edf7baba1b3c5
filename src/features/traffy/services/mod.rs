mod traffy_service;

pub use traffy_service::TraffyService;
