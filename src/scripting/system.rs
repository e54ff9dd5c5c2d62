//! 脚本值与调用结果

use glam::Vec3;
use std::collections::HashMap;

use crate::core::{ScriptCallResult, ScriptError};

/// 脚本执行结果
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptResult {
    Success(String),
    Value(ScriptValue),
    Error(String),
    Void,
}

impl ScriptResult {
    pub fn is_error(&self) -> bool {
        matches!(self, ScriptResult::Error(_))
    }

    /// 取出返回值
    pub fn value(&self) -> Option<&ScriptValue> {
        match self {
            ScriptResult::Value(value) => Some(value),
            _ => None,
        }
    }
}

/// 脚本值 - 跨语言的通用数据类型
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<ScriptValue>),
    Object(HashMap<String, ScriptValue>),
}

impl ScriptValue {
    /// 整数和浮点数都可以作为数值
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            ScriptValue::Int(i) => Some(*i as f32),
            ScriptValue::Float(f) => Some(*f as f32),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ScriptValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            ScriptValue::Int(i) => u32::try_from(*i).ok(),
            _ => None,
        }
    }

    /// 接受 `[x, y, z]` 数组或 `{x, y, z}` 对象
    pub fn as_vec3(&self) -> Option<Vec3> {
        match self {
            ScriptValue::Array(items) if items.len() == 3 => Some(Vec3::new(
                items[0].as_f32()?,
                items[1].as_f32()?,
                items[2].as_f32()?,
            )),
            ScriptValue::Object(fields) => Some(Vec3::new(
                fields.get("x")?.as_f32()?,
                fields.get("y")?.as_f32()?,
                fields.get("z")?.as_f32()?,
            )),
            _ => None,
        }
    }

    pub fn from_vec3(v: Vec3) -> Self {
        let mut obj = HashMap::new();
        obj.insert("x".to_string(), ScriptValue::Float(v.x as f64));
        obj.insert("y".to_string(), ScriptValue::Float(v.y as f64));
        obj.insert("z".to_string(), ScriptValue::Float(v.z as f64));
        ScriptValue::Object(obj)
    }
}

/// 按位置解析脚本参数
pub struct ScriptArgs<'a> {
    function: &'static str,
    expected: &'static str,
    args: &'a [ScriptValue],
}

impl<'a> ScriptArgs<'a> {
    /// `expected` 描述参数列表，用于错误信息
    pub fn new(function: &'static str, expected: &'static str, args: &'a [ScriptValue]) -> Self {
        Self {
            function,
            expected,
            args,
        }
    }

    fn invalid(&self) -> ScriptError {
        ScriptError::InvalidArguments {
            function: self.function.to_string(),
            expected: self.expected.to_string(),
        }
    }

    fn get<T>(&self, index: usize, convert: impl FnOnce(&ScriptValue) -> Option<T>) -> ScriptCallResult<T> {
        self.args
            .get(index)
            .and_then(convert)
            .ok_or_else(|| self.invalid())
    }

    /// 实体 ID（`Entity::to_bits` 的值）
    pub fn entity_bits(&self, index: usize) -> ScriptCallResult<u64> {
        self.get(index, |value| match value {
            ScriptValue::Int(i) => Some(*i as u64),
            _ => None,
        })
    }

    pub fn vec3(&self, index: usize) -> ScriptCallResult<Vec3> {
        self.get(index, ScriptValue::as_vec3)
    }

    pub fn bool(&self, index: usize) -> ScriptCallResult<bool> {
        self.get(index, ScriptValue::as_bool)
    }

    pub fn u32(&self, index: usize) -> ScriptCallResult<u32> {
        self.get(index, ScriptValue::as_u32)
    }

    pub fn f32(&self, index: usize) -> ScriptCallResult<f32> {
        self.get(index, ScriptValue::as_f32)
    }
}
