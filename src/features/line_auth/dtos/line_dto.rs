use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::line_auth::clients::LineProfile;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LineCallbackQuery {
    /// Authorization code issued by LINE
    pub code: Option<String>,
    /// Opaque value echoed back by LINE
    pub state: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LineLoginDto {
    pub profile: LineProfile,
}
