mod commands;
mod handlers;
mod replies;

pub use handlers::handle_message;
