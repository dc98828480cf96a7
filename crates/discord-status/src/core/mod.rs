pub mod announcer;
mod app;
pub mod shutdown;

pub use announcer::StatusAnnouncer;
pub use app::App;
pub use shutdown::Shutdowner;
