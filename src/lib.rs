//! pie-api - a small CRUD HTTP service for pie records
//!
//! Routes translate HTTP requests into [`repository::PieRepository`] calls and
//! wrap every answer in the same JSON envelope. Failures the handlers do not
//! answer themselves go through an ordered error pipeline.

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod pie;
pub mod repository;
