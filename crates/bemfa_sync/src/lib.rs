pub mod config;
pub mod entity;
pub mod error;
pub mod message;
pub mod service;
pub mod sync;
pub mod topic;

pub use config::Config;
pub use config::ConfigError;
pub use config::LogLevel;
pub use entity::Attributes;
pub use entity::EntityState;
pub use error::SyncError;
pub use message::Message;
pub use message::MsgField;
pub use service::Service;
pub use service::ServiceCall;
pub use sync::SyncAdapter;
pub use topic::TopicSuffix;
