mod cache;
pub use cache::{Cache, Rows};

pub mod engine;
pub use engine::{get, normalize};

mod error;
pub use error::{Error, IntoError};

pub mod schema;
pub use schema::Model;

pub mod stmt;

/// A Result type alias that uses relcache's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
