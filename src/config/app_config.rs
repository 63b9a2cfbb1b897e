// ==========================================
// 啤酒库存对账系统 - 运行配置
// ==========================================
// 职责: 交付层配置加载（输出目录 / 试运行 / Telegram 凭据 / 语言）
// 来源优先级（低 → 高）:
// 1. 内置默认值
// 2. stock_manager.{toml,yaml,json}（可选）
// 3. 环境变量（.env 先经 dotenvy 载入）
// 4. 命令行参数（ConfigOverrides）
// 红线: 核心引擎不读取配置
// ==========================================

use crate::i18n;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// 默认配置文件名（不含扩展名）
pub const DEFAULT_CONFIG_FILE: &str = "stock_manager";

/// Telegram Bot API 默认地址
pub const DEFAULT_TELEGRAM_API: &str = "https://api.telegram.org";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub out_dir: PathBuf,
    pub dry_run: bool,
    pub locale: String,
    pub max_scan: usize,
    pub telegram_api_base: String,
    #[serde(default)]
    pub telegram_bot_token: Option<String>,
    #[serde(default)]
    pub telegram_chat_id: Option<String>,
}

/// Telegram 凭据（token 与 chat_id 均非空时才有效）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    pub api_base: String,
    pub bot_token: String,
    pub chat_id: String,
}

/// 命令行覆写项
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub out_dir: Option<PathBuf>,
    pub dry_run: Option<bool>,
    pub locale: Option<String>,
}

impl AppConfig {
    /// 从默认配置文件与进程环境变量加载
    pub fn load() -> Result<Self, ConfigError> {
        // .env 不存在时忽略
        dotenvy::dotenv().ok();
        Self::load_from(Some(DEFAULT_CONFIG_FILE), None)
    }

    /// 从指定配置文件与环境变量加载
    ///
    /// # 参数
    /// - file: 配置文件路径（不含扩展名亦可）, None 表示不读文件
    /// - env: 显式环境变量表, None 表示读取进程环境
    pub fn load_from(
        file: Option<&str>,
        env: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("out_dir", "out")?
            .set_default("dry_run", true)?
            .set_default("locale", i18n::DEFAULT_LOCALE)?
            .set_default("max_scan", crate::importer::DEFAULT_MAX_SCAN as i64)?
            .set_default("telegram_api_base", DEFAULT_TELEGRAM_API)?;

        if let Some(file) = file {
            builder = builder.add_source(File::with_name(file).required(false));
        }

        // OUT_DIR → out_dir, TELEGRAM_BOT_TOKEN → telegram_bot_token ...
        builder = builder.add_source(Environment::default().source(env));

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 应用命令行覆写
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        if let Some(out_dir) = overrides.out_dir {
            self.out_dir = out_dir;
        }
        if let Some(dry_run) = overrides.dry_run {
            self.dry_run = dry_run;
        }
        if let Some(locale) = overrides.locale {
            self.locale = locale;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !i18n::is_supported(&self.locale) {
            return Err(ConfigError::Message(format!(
                "不支持的语言: {} (可选: {})",
                self.locale,
                i18n::SUPPORTED_LOCALES.join(", ")
            )));
        }
        if self.max_scan == 0 {
            return Err(ConfigError::Message("max_scan 必须大于 0".to_string()));
        }
        Ok(())
    }

    /// Telegram 凭据,未配置完整时返回 None
    pub fn telegram(&self) -> Option<TelegramConfig> {
        let non_empty = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Some(TelegramConfig {
            api_base: self.telegram_api_base.trim_end_matches('/').to_string(),
            bot_token: non_empty(&self.telegram_bot_token)?,
            chat_id: non_empty(&self.telegram_chat_id)?,
        })
    }

    /// 是否真正发送通知（非试运行且凭据完整）
    pub fn should_send(&self) -> bool {
        !self.dry_run && self.telegram().is_some()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("out"),
            dry_run: true,
            locale: i18n::DEFAULT_LOCALE.to_string(),
            max_scan: crate::importer::DEFAULT_MAX_SCAN,
            telegram_api_base: DEFAULT_TELEGRAM_API.to_string(),
            telegram_bot_token: None,
            telegram_chat_id: None,
        }
    }
}
