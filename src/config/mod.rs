//! 统一配置系统
//!
//! 提供TOML/JSON配置文件、环境变量覆盖和验证

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub mod particles;
pub mod physics;

pub use particles::ParticleConfig;
pub use physics::PhysicsConfig;

use crate::impl_default;

/// 环境变量前缀
pub const ENV_PREFIX: &str = "SCENE_RUNTIME_";

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 运行时主配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// 粒子配置
    #[serde(default)]
    pub particles: ParticleConfig,

    /// 物理配置
    #[serde(default)]
    pub physics: PhysicsConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RuntimeConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 保存为JSON文件
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 从 `SCENE_RUNTIME_*` 环境变量覆盖配置
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(format!("{}{}", ENV_PREFIX, key)).ok());
    }

    /// 用 `lookup` 查询覆盖值，键不含前缀；无法解析的值被忽略
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        fn parse<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
            let value = lookup(key)?;
            match value.trim().parse() {
                Ok(parsed) => Some(parsed),
                Err(_) => {
                    tracing::warn!(target: "config", "Ignoring invalid value '{}' for {}{}", value, ENV_PREFIX, key);
                    None
                }
            }
        }

        // 粒子配置
        if let Some(max) = parse(&lookup, "MAX_PARTICLES") {
            self.particles.max_particles = max;
        }
        if let Some(world_space) = parse(&lookup, "PARTICLES_WORLD_SPACE") {
            self.particles.world_space = world_space;
        }
        if let Some(restitution) = parse(&lookup, "COLLISION_RESTITUTION") {
            self.particles.collisions.restitution = restitution;
        }
        if let Some(dampening) = parse(&lookup, "COLLISION_DAMPENING") {
            self.particles.collisions.dampening = dampening;
        }

        // 物理配置
        if let Some(gravity_y) = parse(&lookup, "PHYSICS_GRAVITY_Y") {
            self.physics.gravity.y = gravity_y;
        }
        if let Some(layer) = parse(&lookup, "PHYSICS_DEFAULT_LAYER") {
            self.physics.default_layer = layer;
        }

        // 日志配置
        if let Some(level) = parse(&lookup, "LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        self.particles.validate()?;
        self.physics.validate()?;
        Ok(())
    }

    /// 自动查找并加载配置文件
    ///
    /// 按以下顺序查找：
    /// 1. ./scene_runtime.toml
    /// 2. ./scene_runtime.json
    /// 3. ~/.config/scene_runtime/config.toml
    /// 4. 使用默认配置
    pub fn load_or_default() -> Self {
        if let Ok(config) = Self::from_toml_file("scene_runtime.toml") {
            tracing::info!(target: "config", "Loaded config from scene_runtime.toml");
            return config;
        }

        if let Ok(config) = Self::from_json_file("scene_runtime.json") {
            tracing::info!(target: "config", "Loaded config from scene_runtime.json");
            return config;
        }

        if let Some(home) = env::var_os("HOME") {
            let config_path = PathBuf::from(home)
                .join(".config")
                .join("scene_runtime")
                .join("config.toml");

            if let Ok(config) = Self::from_toml_file(&config_path) {
                tracing::info!(target: "config", "Loaded config from {:?}", config_path);
                return config;
            }
        }

        tracing::info!(target: "config", "Using default configuration");
        Self::default()
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: LogLevel,

    /// 是否输出到控制台
    pub log_to_console: bool,
}

impl_default!(LoggingConfig {
    level: LogLevel::Info,
    log_to_console: true,
});

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    /// 跟踪
    Trace,
    /// 调试
    Debug,
    /// 信息
    Info,
    /// 警告
    Warn,
    /// 错误
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(ConfigError::ParseError(format!("Unknown log level: {}", other))),
        }
    }
}
