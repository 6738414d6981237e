// HTTP middleware

pub mod auth; // Bearer token authentication
