pub mod auth;
pub mod import;
pub mod search;
pub mod site_config;
pub mod student;
