mod server;

pub use server::{AppState, build_router, decide_for, run};
