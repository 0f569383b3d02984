// 该文件是 Ramyeon （拉面识别） 项目的一部分。
// src/model/config.rs - 后处理参数
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

use tracing::warn;

use crate::model::{BoxConvention, decode::record_stride};

pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.25;
pub const DEFAULT_IOU_THRESHOLD: f32 = 0.45;
pub const DEFAULT_CLASS_COUNT: i32 = 31;
pub const DEFAULT_INPUT_W: u32 = 640;
pub const DEFAULT_INPUT_H: u32 = 640;

/// 解码与抑制的可调参数
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
  /// 置信度阈值，严格大于才保留
  pub confidence_threshold: f32,
  /// NMS IoU 阈值
  pub iou_threshold: f32,
  /// 每条记录的类别分数数量
  pub class_count: i32,
  /// 模型输入宽度
  pub input_width: u32,
  /// 模型输入高度
  pub input_height: u32,
  /// 计算 IoU 时的几何约定
  pub box_convention: BoxConvention,
}

impl Default for PipelineConfig {
  fn default() -> Self {
    Self {
      confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
      iou_threshold: DEFAULT_IOU_THRESHOLD,
      class_count: DEFAULT_CLASS_COUNT,
      input_width: DEFAULT_INPUT_W,
      input_height: DEFAULT_INPUT_H,
      box_convention: BoxConvention::default(),
    }
  }
}

impl PipelineConfig {
  /// 单条记录的步长: 4 个几何字段 + 1 个置信度 + 类别分数
  pub fn stride(&self) -> usize {
    record_stride(self.class_count)
  }

  /// 检查参数是否合理，只告警不报错
  pub fn check(&self) {
    if !(0.0..=1.0).contains(&self.confidence_threshold) {
      warn!("置信度阈值 {} 不在 [0, 1] 范围内", self.confidence_threshold);
    }
    if !(0.0..=1.0).contains(&self.iou_threshold) {
      warn!("IoU 阈值 {} 不在 [0, 1] 范围内", self.iou_threshold);
    }
    if self.class_count <= 0 {
      warn!("类别数量 {} 无效, 检测结果将不含类别", self.class_count);
    }
    if self.input_width == 0 || self.input_height == 0 {
      warn!(
        "输入尺寸 {}x{} 无效",
        self.input_width, self.input_height
      );
    }
  }

  /// 将检测框换算为相对输入尺寸归一化的 [x_min, y_min, x_max, y_max]
  pub fn normalized_box(&self, bbox: [f32; 4]) -> [f32; 4] {
    let w = self.input_width.max(1) as f32;
    let h = self.input_height.max(1) as f32;
    [bbox[0] / w, bbox[1] / h, bbox[2] / w, bbox[3] / h]
  }
}
