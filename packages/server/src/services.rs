pub mod game_service;
pub mod session_store;
