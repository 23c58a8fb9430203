//! 基础设施层

pub mod airtable;
pub mod logger;
pub mod store;
