//! 错误类型定义

use thiserror::Error;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置加载失败: {source}")]
    LoadError {
        #[from]
        source: config::ConfigError,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

impl ConfigError {
    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }
}

/// 依赖注入错误类型
///
/// 注册与解析过程中的所有失败都会立即返回给调用方，不做重试，
/// 也不会回滚此前已经写入容器的注册信息。
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("模块已注册: {module}")]
    DuplicateModule { module: String },

    #[error("契约重复注册: {contract}, 已映射到 {existing}, 拒绝映射到 {rejected}")]
    DuplicateContract {
        contract: String,
        existing: String,
        rejected: String,
    },

    #[error("类型声明了多个构造函数: {type_name} ({count} 个)")]
    MultipleConstructors { type_name: String, count: usize },

    #[error("导入属性引用了声明类型自身: {type_name}.{property}")]
    SelfReferentialProperty { type_name: String, property: String },

    #[error("契约未实现: {type_name} 没有实现 {contract}")]
    ContractNotImplemented { type_name: String, contract: String },

    #[error("类型未注册: {type_name}")]
    UnregisteredType { type_name: String },

    #[error("没有可用的构造工厂: {type_name}")]
    NoFactory { type_name: String },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("解析深度超过上限 {max_depth}: {type_name}")]
    ResolutionDepthExceeded { type_name: String, max_depth: usize },

    #[error("实例类型不匹配: 期望 {expected}")]
    TypeMismatch { expected: String },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ComponentCreationFailed {
        type_name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl DependencyError {
    /// 创建类型不匹配错误
    pub fn type_mismatch(expected: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
        }
    }

    /// 创建组件创建失败错误
    pub fn creation_failed(
        type_name: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::ComponentCreationFailed {
            type_name: type_name.into(),
            source: source.into(),
        }
    }

    /// 是否为注册阶段产生的错误
    pub fn is_registration_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateModule { .. }
                | Self::DuplicateContract { .. }
                | Self::MultipleConstructors { .. }
                | Self::SelfReferentialProperty { .. }
                | Self::ContractNotImplemented { .. }
        )
    }
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
