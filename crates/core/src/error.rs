use thiserror::Error;

use crate::model::{ContactError, ParseModeError, SettingsError, WordError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Word(#[from] WordError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Contact(#[from] ContactError),
    #[error(transparent)]
    Mode(#[from] ParseModeError),
}
