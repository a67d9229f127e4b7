use serde::{Deserialize, Serialize};

/// Aggregated timing for one traced function.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionStats {
    pub name: String,
    pub calls: u32,
    pub total_us: u64,
    pub avg_us: u64,
    pub max_us: u64,
}
