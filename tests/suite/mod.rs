mod config;
mod persistence;
mod session_flow;
