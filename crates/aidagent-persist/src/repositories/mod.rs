mod alert;
mod chat;

pub use alert::MongoAlertRepository;
pub use chat::MongoChatSessionRepository;
