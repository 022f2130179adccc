//! HTTP boundary for the Tollgate token service
//!
//! Exposes `POST /api/v1/auth/login` and `POST /api/v1/auth/refresh` over
//! the core lifecycle service, plus `GET /health`.

pub mod app;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;
