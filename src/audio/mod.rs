//! 音频模块
//!
//! 音频源组件保存片段句柄、空间参数和播放状态，`audio_source_update_system`
//! 每帧按 [`Time`](crate::ecs::Time) 推进播放时间。

pub mod source;

pub use source::{audio_source_update_system, AudioClip, AudioSource, AudioSourceState};
