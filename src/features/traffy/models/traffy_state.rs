use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Report states the civic API can be queried by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TraffyState {
    Start,
    Inprogress,
}

impl TraffyState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TraffyState::Start => "start",
            TraffyState::Inprogress => "inprogress",
        }
    }
}

impl FromStr for TraffyState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(TraffyState::Start),
            "inprogress" => Ok(TraffyState::Inprogress),
            _ => Err("Invalid state value".to_string()),
        }
    }
}
