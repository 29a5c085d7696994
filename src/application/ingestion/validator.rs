//! ImageValidator - 上传校验
//!
//! 纯判断，不产生副作用。错误信息原样展示给用户。

use thiserror::Error;

const MIB: usize = 1024 * 1024;

/// 上传限制
#[derive(Debug, Clone)]
pub struct IngestionLimits {
    /// 会话内最多截图数
    pub max_images: usize,
    /// 单张大小上限（字节）
    pub max_file_size: usize,
    /// 允许的 MIME 类型
    pub allowed_types: Vec<String>,
}

impl Default for IngestionLimits {
    fn default() -> Self {
        Self {
            max_images: 10,
            max_file_size: 40 * MIB,
            allowed_types: vec!["image/jpeg".to_string(), "image/png".to_string()],
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid file type. Only JPEG and PNG files are allowed.")]
    InvalidType(String),

    #[error("File too large. Maximum size is {max_mib}MB.")]
    TooLarge { size: usize, max_mib: usize },

    #[error("Maximum {0} images allowed")]
    TooManyImages(usize),
}

#[derive(Debug, Clone, Default)]
pub struct ImageValidator {
    limits: IngestionLimits,
}

impl ImageValidator {
    pub fn new(limits: IngestionLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &IngestionLimits {
        &self.limits
    }

    /// 校验单个文件的类型与大小
    pub fn validate(&self, mime_type: &str, size: usize) -> Result<(), ValidationError> {
        let mime_type = mime_type.trim();
        if !self
            .limits
            .allowed_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(mime_type))
        {
            return Err(ValidationError::InvalidType(mime_type.to_string()));
        }
        if size > self.limits.max_file_size {
            return Err(ValidationError::TooLarge {
                size,
                max_mib: self.limits.max_file_size / MIB,
            });
        }
        Ok(())
    }

    /// 校验批次数量: 已有 + 新增不得超过上限
    pub fn check_capacity(&self, existing: usize, incoming: usize) -> Result<(), ValidationError> {
        if existing + incoming > self.limits.max_images {
            return Err(ValidationError::TooManyImages(self.limits.max_images));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_png_and_jpeg() {
        let validator = ImageValidator::default();
        assert!(validator.validate("image/png", 1024).is_ok());
        assert!(validator.validate("image/jpeg", 40 * MIB).is_ok());
    }

    #[test]
    fn test_rejects_type_and_size() {
        let validator = ImageValidator::default();
        let err = validator.validate("image/gif", 10).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid file type. Only JPEG and PNG files are allowed."
        );

        let err = validator.validate("image/png", 40 * MIB + 1).unwrap_err();
        assert_eq!(err.to_string(), "File too large. Maximum size is 40MB.");
    }

    #[test]
    fn test_capacity() {
        let validator = ImageValidator::default();
        assert!(validator.check_capacity(4, 6).is_ok());
        assert_eq!(
            validator.check_capacity(4, 7),
            Err(ValidationError::TooManyImages(10))
        );
        assert_eq!(
            validator.check_capacity(0, 11).unwrap_err().to_string(),
            "Maximum 10 images allowed"
        );
    }
}
