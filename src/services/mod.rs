pub mod chat_handler;
pub mod handlers;

pub use chat_handler::*;
pub use handlers::*;
