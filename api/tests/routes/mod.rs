mod attendance;
mod auth;
mod health_test;
