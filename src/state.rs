use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::services::email::EmailSender;
use crate::services::storage::DocumentStore;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub email: Box<dyn EmailSender>,
    pub documents: Box<dyn DocumentStore>,
}
