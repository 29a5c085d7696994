//! 截图导入流水线
//!
//! ImageValidator -> Encoder -> RecognitionClient -> ResultClassifier -> Reconciler

mod encoder;
mod reconciler;
mod validator;

pub use encoder::{encode_data_uri, EncodeError};
pub use reconciler::{
    Reconciler, CHARACTER_NOT_FOUND, ECHO_NOT_FOUND, NO_FREE_ECHO_PANEL, SELECT_CHARACTER_FIRST,
    WEAPON_NOT_FOUND,
};
pub use validator::{ImageValidator, IngestionLimits, ValidationError};
