use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome of one auto-release sweep. Individual failures never abort the
/// batch; they are collected here instead.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SweepReport {
    pub processed: usize,
    pub released: usize,
    pub errors: Vec<String>,
}
