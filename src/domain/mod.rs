pub mod auth;
pub mod boost;
pub mod email;
pub mod feed;
pub mod playback;
pub mod profile;
pub mod realtime;
pub mod social;
pub mod splik;
pub mod storage;
