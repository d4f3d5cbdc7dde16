pub mod bearer_middleware;
pub mod master_key_middleware;
