mod common;

mod auth;
mod import;
mod search;
