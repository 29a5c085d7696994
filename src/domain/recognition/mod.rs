//! Recognition Context - 截图识别上下文
//!
//! 职责:
//! - 识别分析结果的封闭和类型
//! - 原始响应的结构校验与分类

mod analysis;
mod classifier;

pub use analysis::{
    AnalysisKind, AnalysisVariant, ForteBranch, RawStat, RecognitionOutcome, RecognitionResult,
    StatReading,
};
pub use classifier::{classify, parse_stat_value};
