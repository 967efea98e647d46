pub mod auth;
pub mod email;
pub mod intent;
pub mod jobs;
pub mod search;
pub mod storage;
