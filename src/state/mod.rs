pub mod app;
pub mod directory;
pub mod recents;
pub mod session;
pub mod stack;
