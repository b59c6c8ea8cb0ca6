pub mod adapter;
pub mod echo;
pub mod error;

pub use adapter::{GenerationMeta, Generator};
pub use echo::{ECHO_PREFIX, ECHO_PROMPT_CHARS, EchoGenerator, ScriptedGenerator};
pub use error::{GenerationError, Result};
