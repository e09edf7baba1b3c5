mod traffy_handler;

pub use traffy_handler::{
    __path_get_inprogress_reports, __path_get_nearby_reports, __path_get_start_reports,
    get_inprogress_reports, get_nearby_reports, get_start_reports,
};
