//! Encoder - 截图 -> base64 data URI

use base64::{engine::general_purpose, Engine as _};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt};

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),
}

/// 读取全部内容并编码为 `data:<mime>;base64,...`
pub async fn encode_data_uri<R>(mime_type: &str, mut reader: R) -> Result<String, EncodeError>
where
    R: AsyncRead + Unpin,
{
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).await?;
    Ok(format!(
        "data:{};base64,{}",
        mime_type,
        general_purpose::STANDARD.encode(&bytes)
    ))
}
