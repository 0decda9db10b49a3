//! Tenant-scoped persistence accessors.
//!
//! Every function takes the caller's `spa_id` and constrains its queries
//! by it. Mutations targeting a row that does not belong to that tenant
//! return `None` / `false` without touching anything.

pub mod appointments;
pub mod catalog;
pub mod clients;
pub mod goals;
pub mod manicurists;
pub mod scheduling;
