//! Script normalization for model output and transcripts.
//!
//! Whisper and chat models often answer Chinese prompts in simplified script;
//! the desk serves traditional-script readers, so text is converted before it
//! leaves the service.

use crate::config::ScriptTarget;
use std::sync::Arc;
use zhconv::{zhconv, Variant};

/// A pure text transform applied to everything returned to users.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, text: &str) -> String;
}

/// Simplified to traditional Chinese conversion.
#[derive(Debug, Default, Clone, Copy)]
pub struct TraditionalChinese;

impl Normalizer for TraditionalChinese {
    fn normalize(&self, text: &str) -> String {
        zhconv(text, Variant::ZhHant)
    }
}

/// Leaves text unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl Normalizer for Passthrough {
    fn normalize(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Build the normalizer for a configured script target.
pub fn for_target(target: ScriptTarget) -> Arc<dyn Normalizer> {
    match target {
        ScriptTarget::Traditional => Arc::new(TraditionalChinese),
        ScriptTarget::None => Arc::new(Passthrough),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simplified_becomes_traditional() {
        let out = TraditionalChinese.normalize("请到教务处办理学籍证明");
        assert_eq!(out, "請到教務處辦理學籍證明");
    }

    #[test]
    fn test_traditional_is_stable() {
        let text = "請到教務處辦理學籍證明";
        let once = TraditionalChinese.normalize(text);
        assert_eq!(once, text);
        assert_eq!(TraditionalChinese.normalize(&once), once);
    }

    #[test]
    fn test_non_chinese_untouched() {
        let text = "Office hours: 9:00-17:00\nhttps://example.edu/registrar";
        assert_eq!(TraditionalChinese.normalize(text), text);
        assert_eq!(for_target(ScriptTarget::None).normalize("学"), "学");
    }
}
