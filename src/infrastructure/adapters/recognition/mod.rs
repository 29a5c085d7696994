//! Recognition Adapter - 截图识别客户端实现

mod backoff;
mod fake_recognition_client;
mod http_recognition_client;

pub use backoff::{Backoff, TokioBackoff};
pub use fake_recognition_client::FakeRecognitionClient;
pub use http_recognition_client::*;
