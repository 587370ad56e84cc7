pub mod admin_user;
pub mod site_config;
pub mod student;
