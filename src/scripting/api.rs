use super::system::{ScriptResult, ScriptValue};
use crate::core::ScriptError;
use std::collections::HashMap;

type ScriptFunction = Box<dyn Fn(&[ScriptValue]) -> ScriptResult + Send + Sync>;

/// 脚本API - 脚本可调用的引擎函数表
pub struct ScriptApi {
    registered_functions: HashMap<String, ScriptFunction>,
}

impl Default for ScriptApi {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptApi {
    pub fn new() -> Self {
        let mut api = Self {
            registered_functions: HashMap::new(),
        };

        // 注册内置函数
        api.register_builtin_functions();

        api
    }

    /// 注册内置函数
    fn register_builtin_functions(&mut self) {
        self.register_function("log", |args| {
            if let Some(ScriptValue::String(msg)) = args.first() {
                tracing::info!(target: "scripting", "[Script] {}", msg);
                ScriptResult::Void
            } else {
                ScriptResult::Error("log() requires a string argument".to_string())
            }
        });
    }

    /// 注册自定义函数，同名函数会被替换
    pub fn register_function<F>(&mut self, name: &str, func: F)
    where
        F: Fn(&[ScriptValue]) -> ScriptResult + Send + Sync + 'static,
    {
        if self
            .registered_functions
            .insert(name.to_string(), Box::new(func))
            .is_some()
        {
            tracing::debug!(target: "scripting", "Replaced script function '{}'", name);
        }
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.registered_functions.contains_key(name)
    }

    /// 已注册函数名，按字母排序
    pub fn function_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.registered_functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// 调用已注册的函数
    pub fn call(&self, name: &str, args: &[ScriptValue]) -> ScriptResult {
        if let Some(func) = self.registered_functions.get(name) {
            func(args)
        } else {
            ScriptResult::Error(ScriptError::FunctionNotFound(name.to_string()).to_string())
        }
    }
}
