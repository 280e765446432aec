// Export music utilities
pub mod embedded_messages;
pub mod event_handlers;
pub mod music_manager;
pub mod player;
pub mod track_source;
pub mod voice_gateway;
