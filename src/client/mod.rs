mod builds;
mod core;
mod projects;
pub mod types;
mod work_items;

pub use self::core::AdoClient;
