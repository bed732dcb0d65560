//! Process-local operation ids for log correlation.
//!
//! These ids are diagnostic only: they are never persisted, never shared
//! between processes, and restart from 1 with every process. The file-backed
//! counter remains the single source of truth for committed values.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_OP_ID: AtomicU64 = AtomicU64::new(1);

/// Next operation id for this process.
pub fn next_op_id() -> u64 {
    NEXT_OP_ID.fetch_add(1, Ordering::Relaxed)
}
