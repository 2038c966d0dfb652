//! 依赖注入容器抽象接口
//!
//! 提供依赖注入容器的核心抽象与配置

use crate::registry::ComponentRegistry;
use crate::resolver::ComponentResolver;
use crate::scanner::ComponentScanner;
use config::{Config, Environment, File, FileFormat};
use infrastructure_common::{ConfigError, ConfigResult, DependencyResult, Module, TypeDescriptor};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// 依赖注入容器 trait
///
/// 先注册、后解析。注册需要可变借用，解析只需要共享借用，
/// 因此解析期间容器的映射表不会被修改。
pub trait DiContainer: ComponentRegistry + ComponentResolver {
    /// 容器配置
    fn config(&self) -> &ContainerConfig;

    /// 容器统计信息
    fn stats(&self) -> ContainerStats;
}

/// 容器构建器 trait
pub trait ContainerBuilder {
    /// 关联的容器类型
    type Container: DiContainer;

    /// 构建容器，依次注册添加的模块和类型
    fn build(self) -> DependencyResult<Self::Container>;

    /// 设置容器配置
    fn with_config(self, config: ContainerConfig) -> Self
    where
        Self: Sized;

    /// 添加模块
    fn add_module(self, module: Module) -> Self
    where
        Self: Sized;

    /// 添加单个类型
    fn add_type(self, descriptor: TypeDescriptor) -> Self
    where
        Self: Sized;

    /// 配置扫描器
    fn with_scanner(self, scanner: Box<dyn ComponentScanner>) -> Self
    where
        Self: Sized;
}

/// 容器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerConfig {
    /// 是否启用循环依赖检测
    pub enable_circular_dependency_detection: bool,
    /// 最大解析深度
    pub max_resolution_depth: usize,
    /// 是否为每次解析记录调试日志
    pub log_resolutions: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            enable_circular_dependency_detection: true,
            max_resolution_depth: 100,
            log_resolutions: false,
        }
    }
}

impl ContainerConfig {
    /// 从 TOML 文本加载配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Self = Config::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 从配置文件加载配置
    ///
    /// 文件不存在时使用默认值，`DI_` 前缀的环境变量覆盖文件中的值，
    /// 例如 `DI_MAX_RESOLUTION_DEPTH=32`。
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!("加载容器配置: {}", path.display());

        let config: Self = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("DI").try_parsing(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_resolution_depth == 0 {
            return Err(ConfigError::validation("max_resolution_depth 必须大于 0"));
        }
        Ok(())
    }
}

/// 容器统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContainerStats {
    /// 已注册模块数量
    pub registered_modules: usize,
    /// 已注册契约数量
    pub registered_contracts: usize,
    /// 已构建工厂数量
    pub registered_factories: usize,
    /// 成功解析的顶层请求数量
    pub resolved_components: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_cycle_detection() {
        let config = ContainerConfig::default();
        assert!(config.enable_circular_dependency_detection);
        assert_eq!(config.max_resolution_depth, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn loads_partial_toml_over_defaults() {
        let config = ContainerConfig::from_toml_str(
            r#"
            max_resolution_depth = 16
            log_resolutions = true
            "#,
        )
        .unwrap();
        assert_eq!(config.max_resolution_depth, 16);
        assert!(config.log_resolutions);
        assert!(config.enable_circular_dependency_detection);
    }

    #[test]
    fn rejects_zero_depth() {
        let result = ContainerConfig::from_toml_str("max_resolution_depth = 0");
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = ContainerConfig::load("does/not/exist/container.toml").unwrap();
        assert_eq!(config.max_resolution_depth, ContainerConfig::default().max_resolution_depth);
    }
}
