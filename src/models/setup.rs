use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::industry_defaults;

/// Identifiers for the AI providers the platform can call.
///
/// `Free` is the hosted no-credential fallback; everything else is
/// bring-your-own-key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Free,
    OpenAi,
    Claude,
    Gemini,
    Grok,
    Llama,
    Custom,
}

impl ProviderId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::OpenAi => "openai",
            Self::Claude => "claude",
            Self::Gemini => "gemini",
            Self::Grok => "grok",
            Self::Llama => "llama",
            Self::Custom => "custom",
        }
    }
}

/// Per-provider credentials and overrides stored in the tenant config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,
    /// Model name; empty means the provider default.
    #[serde(default)]
    pub model: String,
    /// Endpoint override; empty means the provider default.
    #[serde(default)]
    pub endpoint: String,
}

impl ProviderConfig {
    pub fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// Which providers to use and in what preference. `primary` is `None`
/// until the setup wizard's model step is completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiModelSettings {
    #[serde(default)]
    pub primary: Option<ProviderId>,
    #[serde(default)]
    pub configs: BTreeMap<ProviderId, ProviderConfig>,
}

impl Default for AiModelSettings {
    fn default() -> Self {
        let mut configs = BTreeMap::new();
        for id in [
            ProviderId::OpenAi,
            ProviderId::Claude,
            ProviderId::Gemini,
            ProviderId::Grok,
            ProviderId::Llama,
            ProviderId::Custom,
        ] {
            configs.insert(id, ProviderConfig::default());
        }
        Self {
            primary: None,
            configs,
        }
    }
}

/// Company profile captured by the setup wizard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    pub name: String,
    pub industry: String,
    pub size: String,
    #[serde(default)]
    pub departments: Vec<String>,
    #[serde(default)]
    pub safety_requirements: Vec<String>,
    pub default_language: String,
    #[serde(default)]
    pub supported_languages: Vec<String>,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            industry: String::new(),
            size: String::new(),
            departments: vec![],
            safety_requirements: vec![],
            default_language: "en".into(),
            supported_languages: vec!["en".into(), "es".into(), "fr".into(), "pt".into(), "de".into()],
        }
    }
}

/// Where company documents live; treated as opaque settings by the core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSourceConfig {
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub settings: BTreeMap<String, String>,
}

/// New-hire onboarding defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingConfig {
    #[serde(default)]
    pub default_trainings: Vec<String>,
    pub probation_days: u32,
    pub mentor_assignment: bool,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            default_trainings: vec![],
            probation_days: 90,
            mentor_assignment: true,
        }
    }
}

/// Full tenant configuration, created once per company by the setup wizard
/// and consulted by every subsequent generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupConfig {
    pub company: CompanyProfile,
    pub ai_models: AiModelSettings,
    pub data_source: DataSourceConfig,
    pub onboarding: OnboardingConfig,
}

impl SetupConfig {
    /// Replace departments, safety requirements and default trainings with
    /// the presets for the company's industry.
    pub fn apply_industry_defaults(&mut self) {
        let defaults = industry_defaults(&self.company.industry);
        self.company.departments = defaults.departments.iter().map(|s| s.to_string()).collect();
        self.company.safety_requirements = defaults
            .safety_requirements
            .iter()
            .map(|s| s.to_string())
            .collect();
        self.onboarding.default_trainings = defaults
            .default_trainings
            .iter()
            .map(|s| s.to_string())
            .collect();
    }

    /// Config for a provider, defaulting when the tenant never touched it.
    pub fn provider_config(&self, id: ProviderId) -> ProviderConfig {
        self.ai_models.configs.get(&id).cloned().unwrap_or_default()
    }
}
