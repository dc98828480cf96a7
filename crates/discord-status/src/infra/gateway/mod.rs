pub mod discord_adapter;

pub use discord_adapter::DiscordGateway;
