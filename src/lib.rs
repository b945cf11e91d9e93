pub mod bot;
pub mod config;
pub mod dispatch;
pub mod enums;
pub mod error;
pub mod messages;
pub mod store;

pub use config::Config;
pub use dispatch::{ButtonTag, Dispatcher, Event, Keyboard, Reply};
pub use enums::{TokenKind, UserAction, UserState};
pub use error::{AppError, Result};
pub use store::{StateStore, StoreStats, UserRecord};
