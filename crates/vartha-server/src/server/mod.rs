pub mod app;
pub mod error;
pub mod routes;

pub use app::*;
pub use error::*;
pub use routes::*;
