//! 音频源组件
//!
//! 只维护播放状态与参数，实际的混音由后端根据这些数据完成。

use bevy_ecs::prelude::*;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::{AudioError, AudioResult};
use crate::ecs::Time;
use crate::impl_default;
use crate::resources::Handle;

/// 音频片段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioClip {
    pub name: String,
    /// 时长（秒）
    pub length: f32,
}

impl AudioClip {
    pub fn new(name: impl Into<String>, length: f32) -> Self {
        Self {
            name: name.into(),
            length: length.max(0.0),
        }
    }
}

/// 音频源状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AudioSourceState {
    Playing,
    Paused,
    #[default]
    Stopped,
}

/// 音频源
#[derive(Component, Debug, Clone)]
pub struct AudioSource {
    clip: Option<Handle<AudioClip>>,
    pub position: Vec3,
    pub velocity: Vec3,
    volume: f32,
    pub pitch: f32,
    pub looping: bool,
    /// 数值越小优先级越高，声道不足时先丢弃优先级低的音源
    pub priority: u32,
    /// 小于该距离时不衰减
    pub min_distance: f32,
    /// 超过最小距离后的衰减速度
    pub attenuation: f32,
    state: AudioSourceState,
    time: f32,
}

impl_default!(AudioSource {
    clip: None,
    position: Vec3::ZERO,
    velocity: Vec3::ZERO,
    volume: 1.0,
    pitch: 1.0,
    looping: false,
    priority: 0,
    min_distance: 1.0,
    attenuation: 1.0,
    state: AudioSourceState::Stopped,
    time: 0.0,
});

impl AudioSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clip(mut self, clip: Handle<AudioClip>) -> Self {
        self.clip = Some(clip);
        self
    }

    pub fn clip(&self) -> Option<&Handle<AudioClip>> {
        self.clip.as_ref()
    }

    /// 更换片段会停止当前播放
    pub fn set_clip(&mut self, clip: Option<Handle<AudioClip>>) {
        self.clip = clip;
        self.state = AudioSourceState::Stopped;
        self.time = 0.0;
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
    }

    pub fn state(&self) -> AudioSourceState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == AudioSourceState::Playing
    }

    /// 当前播放位置（秒）
    pub fn time(&self) -> f32 {
        self.time
    }

    fn clip_length(&self) -> AudioResult<f32> {
        let clip = self.clip.as_ref().ok_or(AudioError::NoClip)?;
        let clip = clip.get().ok_or(AudioError::ClipNotLoaded)?;
        Ok(clip.length)
    }

    /// 开始播放；暂停状态下从暂停位置继续
    pub fn play(&mut self) -> AudioResult<()> {
        self.clip_length()?;
        match self.state {
            AudioSourceState::Paused => {
                tracing::debug!(target: "audio", "Resuming audio source at {:.3}s", self.time);
            }
            AudioSourceState::Playing | AudioSourceState::Stopped => {
                self.time = 0.0;
            }
        }
        self.state = AudioSourceState::Playing;
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.state == AudioSourceState::Playing {
            self.state = AudioSourceState::Paused;
        }
    }

    /// 停止并回到开头
    pub fn stop(&mut self) {
        self.state = AudioSourceState::Stopped;
        self.time = 0.0;
    }

    /// 跳转到指定位置，不改变播放状态
    pub fn seek(&mut self, position: f32) -> AudioResult<()> {
        let length = self.clip_length()?;
        if !(0.0..=length).contains(&position) {
            return Err(AudioError::SeekOutOfRange { position, length });
        }
        self.time = position;
        Ok(())
    }

    /// 推进播放时间，时间按音调缩放
    pub fn advance(&mut self, dt: f32) {
        if self.state != AudioSourceState::Playing {
            return;
        }
        let Ok(length) = self.clip_length() else {
            self.stop();
            return;
        };

        self.time += dt.max(0.0) * self.pitch.max(0.0);
        if self.time < length {
            return;
        }

        if self.looping && length > 0.0 {
            self.time %= length;
        } else {
            tracing::debug!(target: "audio", "Audio source reached end of clip");
            self.stop();
        }
    }

    /// 按距离计算衰减后的增益
    pub fn gain_at(&self, listener: Vec3) -> f32 {
        let distance = self.position.distance(listener);
        if distance <= self.min_distance {
            return self.volume;
        }
        let min_distance = self.min_distance.max(f32::EPSILON);
        let gain = min_distance / (min_distance + self.attenuation.max(0.0) * (distance - min_distance));
        self.volume * gain
    }
}

/// 按帧时间推进所有音频源
pub fn audio_source_update_system(time: Res<Time>, mut query: Query<&mut AudioSource>) {
    let dt = time.delta_seconds;
    for mut source in query.iter_mut() {
        source.advance(dt);
    }
}
