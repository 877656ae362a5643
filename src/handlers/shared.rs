use serde::{Deserialize, Serialize};

use crate::database::models::{Timestamp, parse_date};
use crate::error::AppError;

/// Envelope used for error bodies.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl ApiResponse<()> {
    // Error response (no data)
    pub fn error(message: &str) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.to_string()),
        }
    }
}

/// `?begin=<RFC3339>&end=<RFC3339>`; missing and empty values both mean no bound.
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeQuery {
    pub begin: Option<String>,
    pub end: Option<String>,
}

impl DateRangeQuery {
    pub fn bounds(&self) -> Result<(Option<Timestamp>, Option<Timestamp>), AppError> {
        Ok((
            parse_bound("begin", self.begin.as_deref())?,
            parse_bound("end", self.end.as_deref())?,
        ))
    }
}

fn parse_bound(name: &str, value: Option<&str>) -> Result<Option<Timestamp>, AppError> {
    let Some(value) = value else {
        return Ok(None);
    };

    parse_date(value).map_err(|e| {
        AppError::BadRequest(format!("Invalid {} date {:?}: {}", name, value, e))
    })
}
