pub mod leave;
pub mod pause;
pub mod play;
pub mod resume;
pub mod stop;

pub mod audio_sources;
pub mod utils;

use crate::{CommandResult, Context};
