//! Prompt profiles for Ragdesk.
//!
//! Each profile bundles a system instruction with its retrieval count and
//! whether conversation history is blended into the prompt. Profiles can be
//! customized by placing `<profile>.toml` files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Name of the registrar-office profile.
pub const REGISTRAR: &str = "registrar";
/// Name of the global-affairs-office profile.
pub const GLOBAL_AFFAIRS: &str = "global_affairs";

/// Collection of all prompt profiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Prompts {
    pub registrar: ProfilePrompt,
    pub global_affairs: ProfilePrompt,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            registrar: ProfilePrompt::registrar(),
            global_affairs: ProfilePrompt::global_affairs(),
            variables: HashMap::new(),
        }
    }
}

/// A system instruction plus the retrieval shape that goes with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilePrompt {
    pub system: String,
    /// Number of documents to retrieve per question.
    pub k: usize,
    /// Blend prior turns into the prompt context.
    pub include_history: bool,
}

impl Default for ProfilePrompt {
    fn default() -> Self {
        Self::registrar()
    }
}

impl ProfilePrompt {
    fn registrar() -> Self {
        Self {
            system: "你是一位負責回答教務處相關問題的人員，學生會向你詢問教務處相關的問題，\
當學生向你詢問問題時，請先分析那些資料能更好的協助解決這個問題，像是相關人員的聯絡方式或某件事的處理流程，\
並提供完整的回答，所有跟問題有關的資訊都要條列式列出，並附上必要的網頁連接，不要只回答一句話。"
                .to_string(),
            k: 4,
            include_history: false,
        }
    }

    fn global_affairs() -> Self {
        Self {
            system: "你是一位負責回答國際事務處相關問題的人員，學生與外籍人士會向你詢問交換計畫、雙聯學位、\
簽證與居留、獎學金、國際志工及境外學生生活輔導等相關問題。回答時請遵守以下原則：\n\
1. 先閱讀先前的對話紀錄，理解使用者目前問題的上下文，必要時延續先前的回答。\n\
2. 從提供的資料中找出與問題最相關的內容，例如申請資格、申請期限、所需文件、承辦人員與聯絡方式。\n\
3. 所有跟問題有關的資訊都要條列式列出，並附上必要的網頁連接。\n\
4. 若資料中沒有足夠的資訊，請明確說明，並建議使用者直接聯繫國際事務處，不要自行編造內容。\n\
5. 使用繁體中文回答，語氣親切且專業，不要只回答一句話。"
                .to_string(),
            k: 8,
            include_history: true,
        }
    }
}

/// Fields a custom profile file may override; absent keys keep the built-in value.
#[derive(Debug, Default, Deserialize)]
struct ProfileOverride {
    system: Option<String>,
    k: Option<usize>,
    include_history: Option<bool>,
}

impl ProfileOverride {
    fn apply(self, profile: &mut ProfilePrompt) {
        if let Some(system) = self.system {
            profile.system = system;
        }
        if let Some(k) = self.k {
            profile.k = k;
        }
        if let Some(include_history) = self.include_history {
            profile.include_history = include_history;
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let registrar_path = custom_path.join(format!("{}.toml", REGISTRAR));
            if registrar_path.exists() {
                let content = std::fs::read_to_string(&registrar_path)?;
                let overlay: ProfileOverride = toml::from_str(&content)?;
                overlay.apply(&mut prompts.registrar);
            }

            let global_path = custom_path.join(format!("{}.toml", GLOBAL_AFFAIRS));
            if global_path.exists() {
                let content = std::fs::read_to_string(&global_path)?;
                let overlay: ProfileOverride = toml::from_str(&content)?;
                overlay.apply(&mut prompts.global_affairs);
            }
        }

        Ok(prompts)
    }

    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Option<&ProfilePrompt> {
        match name {
            REGISTRAR => Some(&self.registrar),
            GLOBAL_AFFAIRS | "global-affairs" => Some(&self.global_affairs),
            _ => None,
        }
    }

    /// Names of the built-in profiles.
    pub fn profile_names() -> [&'static str; 2] {
        [REGISTRAR, GLOBAL_AFFAIRS]
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a template with the custom config variables.
    pub fn render_with_custom(&self, template: &str) -> String {
        Self::render(template, &self.variables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profiles() {
        let prompts = Prompts::default();
        let registrar = prompts.profile(REGISTRAR).unwrap();
        let global = prompts.profile(GLOBAL_AFFAIRS).unwrap();

        assert!(registrar.system.contains("教務處"));
        assert_eq!(registrar.k, 4);
        assert!(!registrar.include_history);

        assert_eq!(global.k, 8);
        assert!(global.include_history);
        assert!(global.system.len() > registrar.system.len());

        assert!(prompts.profile("bursar").is_none());
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_custom_profile_file_overrides_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("registrar.toml"),
            "system = \"You answer for {{office}}.\"\nk = 2\n",
        )
        .unwrap();

        let mut vars = HashMap::new();
        vars.insert("office".to_string(), "the registrar".to_string());

        let prompts = Prompts::load(dir.path().to_str(), Some(&vars)).unwrap();
        let registrar = prompts.profile(REGISTRAR).unwrap();
        assert_eq!(registrar.k, 2);
        assert_eq!(
            prompts.render_with_custom(&registrar.system),
            "You answer for the registrar."
        );
        assert!(!registrar.include_history);
        // untouched profile keeps its default
        assert_eq!(prompts.global_affairs.k, 8);
    }
}
