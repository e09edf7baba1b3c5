pub mod categories;
pub mod dashboard;
pub mod line_auth;
pub mod places;
pub mod reviews;
pub mod traffy;
