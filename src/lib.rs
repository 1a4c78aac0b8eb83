// Biblioteca do backend: os módulos ficam expostos para o binário e para
// os testes de cenário em tests/.

pub mod common;
pub mod config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
