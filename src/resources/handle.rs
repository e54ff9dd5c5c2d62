//! 资源句柄
//!
//! 句柄在资源加载完成前就可以被持有和传递；使用方在每次访问时检查加载状态，
//! 未加载的资源降级为默认行为。

use std::sync::{Arc, RwLock};

use crate::core::{ResourceError, ResourceResult};

#[derive(Debug)]
pub enum LoadState<T> {
    Loading,
    Loaded(Arc<T>),
    Failed(String),
}

#[derive(Debug)]
pub struct AssetContainer<T> {
    pub state: RwLock<LoadState<T>>,
}

#[derive(Debug)]
pub struct Handle<T: 'static + Send + Sync> {
    pub container: Arc<AssetContainer<T>>,
}

impl<T: 'static + Send + Sync> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            container: Arc::clone(&self.container),
        }
    }
}

impl<T: 'static + Send + Sync> Handle<T> {
    fn with_state(state: LoadState<T>) -> Self {
        Self {
            container: Arc::new(AssetContainer {
                state: RwLock::new(state),
            }),
        }
    }

    /// 创建处于加载中状态的句柄
    pub fn new_loading() -> Self {
        Self::with_state(LoadState::Loading)
    }

    /// 创建已加载的句柄
    pub fn loaded(value: T) -> Self {
        Self::with_state(LoadState::Loaded(Arc::new(value)))
    }

    /// 完成加载
    pub fn set_loaded(&self, value: T) -> ResourceResult<()> {
        let mut state = self
            .container
            .state
            .write()
            .map_err(|_| ResourceError::LockPoisoned)?;
        *state = LoadState::Loaded(Arc::new(value));
        Ok(())
    }

    /// 标记加载失败
    pub fn set_failed(&self, reason: impl Into<String>) -> ResourceResult<()> {
        let mut state = self
            .container
            .state
            .write()
            .map_err(|_| ResourceError::LockPoisoned)?;
        *state = LoadState::Failed(reason.into());
        Ok(())
    }

    /// 获取已加载的资源，未加载、失败或锁中毒时返回 `None`
    pub fn get(&self) -> Option<Arc<T>> {
        self.container
            .state
            .read()
            .ok()
            .and_then(|state| match &*state {
                LoadState::Loaded(v) => Some(Arc::clone(v)),
                _ => None,
            })
    }

    /// 获取资源，并把未加载的原因转换成错误
    pub fn try_get(&self) -> ResourceResult<Arc<T>> {
        let state = self
            .container
            .state
            .read()
            .map_err(|_| ResourceError::LockPoisoned)?;
        match &*state {
            LoadState::Loaded(v) => Ok(Arc::clone(v)),
            LoadState::Loading => Err(ResourceError::NotLoaded(
                std::any::type_name::<T>().to_string(),
            )),
            LoadState::Failed(reason) => Err(ResourceError::Failed(reason.clone())),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.container
            .state
            .read()
            .map(|state| matches!(*state, LoadState::Loaded(_)))
            .unwrap_or(false)
    }

    /// 两个句柄是否指向同一资源
    pub fn same_resource(&self, other: &Handle<T>) -> bool {
        Arc::ptr_eq(&self.container, &other.container)
    }
}
