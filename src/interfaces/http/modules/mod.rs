pub mod admin;
pub mod auth;
pub mod berger;
pub mod departments;
pub mod health;
pub mod members;
pub mod metrics;
pub mod presence;
pub mod request_id;
