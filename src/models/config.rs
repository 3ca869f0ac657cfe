use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use anyhow::{Context, Result};

/// CMS 接口地址的环境变量
pub const ENV_API_ENDPOINT: &str = "PRISMIC_API_ENDPOINT";
/// CMS 访问令牌的环境变量
pub const ENV_ACCESS_TOKEN: &str = "PRISMIC_ACCESS_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub title: String,
    pub description: Option<String>,
    pub author: Option<String>,
    /// 日期格式化使用的区域，例如 pt_BR、en_US
    pub language: String,
    pub url: Option<String>,
    pub theme: String,
    pub public_dir: String,
    pub server: ServerConfig,
    pub cms: CmsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CmsConfig {
    /// API 根地址，例如 https://repo.cdn.prismic.io/api/v2
    pub endpoint: String,
    pub access_token: Option<String>,
    /// 文章的文档类型
    pub document_type: String,
    /// 首页每页文章数
    pub page_size: u32,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "spacetraveling".to_string(),
            description: None,
            author: None,
            language: "pt_BR".to_string(),
            url: None,
            theme: "default".to_string(),
            public_dir: "public".to_string(),
            server: ServerConfig::default(),
            cms: CmsConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
        }
    }
}

impl Default for CmsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://spacetraveling.cdn.prismic.io/api/v2".to_string(),
            access_token: None,
            document_type: "posts".to_string(),
            page_size: 1,
            timeout_secs: 10,
        }
    }
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("解析配置文件失败: {}", path.display()))?;
        Ok(config)
    }

    /// 加载站点目录下的 _config.yml，不存在时使用默认配置，然后应用环境变量覆盖
    pub fn load(base_dir: &Path) -> Result<Self> {
        let config_path = base_dir.join("_config.yml");
        let mut config = if config_path.exists() {
            Self::from_file(&config_path)?
        } else {
            Config::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    /// 环境变量优先于配置文件
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            env::var(ENV_API_ENDPOINT).ok(),
            env::var(ENV_ACCESS_TOKEN).ok(),
        );
    }

    fn apply_overrides(&mut self, endpoint: Option<String>, token: Option<String>) {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            self.cms.endpoint = endpoint;
        }
        if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
            self.cms.access_token = Some(token);
        }
    }
}
