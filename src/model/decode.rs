// 该文件是 Ramyeon （拉面识别） 项目的一部分。
// src/model/decode.rs - 原始检测张量解码
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

use tracing::{debug, warn};

use crate::model::Detection;

/// 几何字段数量 (cx, cy, w, h)
pub const GEOMETRY_FIELDS: usize = 4;
/// 置信度（objectness）字段偏移
pub const OBJECTNESS_OFFSET: usize = 4;
/// 类别分数起始偏移
pub const CLASS_SCORE_OFFSET: usize = 5;
/// 未设置类别时的哨兵值
pub const UNSET_CLASS_ID: i32 = -1;

/// 根据类别数量计算单条记录的步长
///
/// 类别数量小于等于 0 时按 0 处理。
pub fn record_stride(class_count: i32) -> usize {
  CLASS_SCORE_OFFSET + class_count.max(0) as usize
}

/// 将扁平张量解码为候选检测结果
///
/// 张量按 `stride` 切分为若干记录，每条记录布局为
/// `[cx, cy, w, h, objectness, score_0, .., score_{K-1}]`。
///
/// - 末尾不足一条记录的数据被忽略；
/// - 仅保留 `objectness > confidence_threshold` 的记录（阈值不含等号，NaN 永远不保留）；
/// - 几何字段原样拷贝，不做归一化或裁剪；
/// - `classId` 取类别分数最大值的下标，分数相同时取较小下标；
/// - `class_count <= 0` 时不扫描类别，`classId` 为 [`UNSET_CLASS_ID`]；
/// - `5 + class_count` 超过 `stride` 时，仅扫描记录中实际存在的分数字段；
/// - `stride < 5` 时记录中不存在置信度字段，直接返回空结果。
///
/// 该函数不会 panic，输出顺序与记录顺序一致。
pub fn decode(
  tensor: &[f32],
  stride: usize,
  class_count: i32,
  confidence_threshold: f32,
) -> Vec<Detection> {
  if stride <= OBJECTNESS_OFFSET {
    warn!(
      "记录步长 {} 过小, 至少需要 {} 个字段, 跳过解码",
      stride,
      OBJECTNESS_OFFSET + 1
    );
    return Vec::new();
  }

  let remainder = tensor.len() % stride;
  if remainder != 0 {
    debug!(
      "张量长度 {} 不是步长 {} 的整数倍, 忽略末尾 {} 个数值",
      tensor.len(),
      stride,
      remainder
    );
  }

  let scan = (class_count.max(0) as usize).min(stride - CLASS_SCORE_OFFSET);
  if class_count > 0 && scan < class_count as usize {
    warn!(
      "类别数量 {} 超出记录步长 {} 的容量, 仅扫描 {} 个类别",
      class_count, stride, scan
    );
  }

  let mut detections = Vec::new();
  for record in tensor.chunks_exact(stride) {
    let confidence = record[OBJECTNESS_OFFSET];
    let keep = confidence > confidence_threshold;
    if !keep {
      continue;
    }

    let scores = &record[CLASS_SCORE_OFFSET..CLASS_SCORE_OFFSET + scan];
    detections.push(Detection::new(
      record[0],
      record[1],
      record[2],
      record[3],
      argmax(scores),
      confidence,
    ));
  }

  debug!(
    "解码 {} 条记录, 保留 {} 个候选",
    tensor.len() / stride,
    detections.len()
  );
  detections
}

/// 返回最大分数的下标，没有可比较的分数时返回哨兵值
fn argmax(scores: &[f32]) -> i32 {
  let mut best = f32::NEG_INFINITY;
  let mut class_id = UNSET_CLASS_ID;
  for (idx, &score) in scores.iter().enumerate() {
    if score > best {
      best = score;
      class_id = idx as i32;
    }
  }
  class_id
}
