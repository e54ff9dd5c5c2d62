//! 统一错误处理模块
//!
//! 提供运行时范围内的统一错误类型定义。
//!
//! 粒子演化器本身不返回错误（参数在构造时钳制，缺失资源时降级为默认行为），
//! 这里的错误类型只用于边界操作：配置加载、碰撞体挂载、脚本参数解析、音频控制等。

use thiserror::Error;

use crate::config::ConfigError;

/// 运行时核心错误类型
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),

    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("General error: {0}")]
    General(String),
}

/// 物理系统错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    #[error("Invalid rigid body handle")]
    InvalidRigidBody,

    #[error("Invalid collider handle")]
    InvalidCollider,

    #[error("Collider is not attached to a physics world")]
    NotAttached,

    #[error("Invalid physics parameter: {0}")]
    InvalidParameter(String),
}

/// 脚本桥接错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    #[error("Invalid script arguments for {function}: expected {expected}")]
    InvalidArguments {
        function: String,
        expected: String,
    },

    #[error("Entity not found: {0}")]
    EntityNotFound(u64),

    #[error("Component not found on entity {entity}: {component}")]
    ComponentNotFound { entity: u64, component: String },

    #[error("Function '{0}' not found")]
    FunctionNotFound(String),

    #[error("Required resource missing: {0}")]
    ResourceMissing(String),

    #[error("Physics error: {0}")]
    Physics(#[from] PhysicsError),

    #[error("Script world lock poisoned")]
    LockPoisoned,
}

/// 音频系统错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AudioError {
    #[error("No audio clip assigned")]
    NoClip,

    #[error("Audio clip is not loaded")]
    ClipNotLoaded,

    #[error("Seek position {position} outside of clip length {length}")]
    SeekOutOfRange { position: f32, length: f32 },
}

/// 资源错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    #[error("Resource not loaded: {0}")]
    NotLoaded(String),

    #[error("Resource failed to load: {0}")]
    Failed(String),

    #[error("Resource lock poisoned")]
    LockPoisoned,
}

/// 运行时结果类型别名
pub type RuntimeResult<T> = Result<T, RuntimeError>;
pub type PhysicsResult<T> = Result<T, PhysicsError>;
pub type ScriptCallResult<T> = Result<T, ScriptError>;
pub type AudioResult<T> = Result<T, AudioError>;
pub type ResourceResult<T> = Result<T, ResourceError>;
