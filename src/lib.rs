pub mod auth;
pub mod calendar;
pub mod db;
pub mod filters;
pub mod models;
pub mod routes;
pub mod state;
pub mod status;
pub mod store;
pub mod validate;
