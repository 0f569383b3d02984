// 该文件是 Ramyeon （拉面识别） 项目的一部分。
// src/model.rs - 模型
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::convert::Infallible;

use crate::frame::RawTensor;

pub trait Model {
  type Input;
  type Output;
  type Error;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

/// 推理执行边界，模型加载与执行由外部负责，这里只关心输出的原始张量
pub trait Inference {
  type Frame;
  type Error;

  fn run(&self, frame: &Self::Frame) -> Result<RawTensor, Self::Error>;
}

/// 已录制的推理输出，帧本身就是原始张量
#[derive(Debug, Clone, Copy, Default)]
pub struct Recorded;

impl Inference for Recorded {
  type Frame = RawTensor;
  type Error = Infallible;

  fn run(&self, frame: &Self::Frame) -> Result<RawTensor, Self::Error> {
    Ok(frame.clone())
  }
}

/// 单个检测结果，构造后不可变
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
  center_x: f32,
  center_y: f32,
  width: f32,
  height: f32,
  class_id: i32,
  confidence: f32,
}

impl Detection {
  pub fn new(
    center_x: f32,
    center_y: f32,
    width: f32,
    height: f32,
    class_id: i32,
    confidence: f32,
  ) -> Self {
    Self {
      center_x,
      center_y,
      width,
      height,
      class_id,
      confidence,
    }
  }

  pub fn center_x(&self) -> f32 {
    self.center_x
  }

  pub fn center_y(&self) -> f32 {
    self.center_y
  }

  pub fn width(&self) -> f32 {
    self.width
  }

  pub fn height(&self) -> f32 {
    self.height
  }

  /// 类别下标，未设置时为 -1
  pub fn class_id(&self) -> i32 {
    self.class_id
  }

  pub fn class_index(&self) -> Option<usize> {
    usize::try_from(self.class_id).ok()
  }

  pub fn confidence(&self) -> f32 {
    self.confidence
  }

  /// 按给定约定换算为 [x_min, y_min, x_max, y_max]
  pub fn corner_box(&self, convention: BoxConvention) -> [f32; 4] {
    let (x, y) = match convention {
      BoxConvention::AsCorner => (self.center_x, self.center_y),
      BoxConvention::Center => (
        self.center_x - self.width / 2.0,
        self.center_y - self.height / 2.0,
      ),
    };
    [x, y, x + self.width, y + self.height]
  }
}

/// 一帧的检测结果，按置信度降序排列
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectResult {
  pub items: Box<[Detection]>,
}

impl From<Vec<Detection>> for DetectResult {
  fn from(items: Vec<Detection>) -> Self {
    Self {
      items: items.into_boxed_slice(),
    }
  }
}

impl DetectResult {
  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, Detection> {
    self.items.iter()
  }

  /// 置信度最高的检测结果
  pub fn best(&self) -> Option<&Detection> {
    self.items.first()
  }
}

impl<'a> IntoIterator for &'a DetectResult {
  type Item = &'a Detection;
  type IntoIter = std::slice::Iter<'a, Detection>;

  fn into_iter(self) -> Self::IntoIter {
    self.items.iter()
  }
}

mod config;
pub mod decode;
mod detector;
mod label;
pub mod nms;

pub use self::config::PipelineConfig;
pub use self::decode::{UNSET_CLASS_ID, decode, record_stride};
pub use self::detector::{Detector, DetectorBuilder, DetectorError};
pub use self::label::{LabelError, LabelTable, RAMYEON_LABELS, UNKNOWN_LABEL};
pub use self::nms::{BoxConvention, iou, iou_with, suppress, suppress_with};
