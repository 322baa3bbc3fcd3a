//! taskfile2d2 - D2 diagrams of Taskfile task relationships

pub mod assets;
pub mod config;
pub mod d2_writer;
pub mod error;
pub mod ids;
pub mod taskfile;
pub mod translate;

pub use config::Config;
pub use d2_writer::D2Writer;
pub use error::{ConvertError, FixSuggestion};
pub use ids::IdScheme;
pub use taskfile::{Call, RequiredVariable, Task, Taskfile, Variable};
pub use translate::{translate, translate_with, Translator};

/// Parse Taskfile bytes and render the diagram in one step
pub fn taskfile_to_d2(bytes: &[u8], config: &Config) -> error::Result<String> {
    let taskfile = Taskfile::from_yaml(bytes)?;
    translate_with(&taskfile, config)
}
