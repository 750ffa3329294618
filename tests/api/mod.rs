//! REST API Tests

mod health_tests;
mod history_tests;
mod servers_tests;
mod status_tests;
mod tunnel_tests;
