// 该文件是 Ramyeon （拉面识别） 项目的一部分。
// src/model/nms.rs - 非极大值抑制
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

use std::str::FromStr;

use tracing::debug;

use crate::model::Detection;

/// 计算 IoU 时对几何字段的解释方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BoxConvention {
  /// 直接把 (cx, cy) 当作左上角使用，不做转换
  #[default]
  AsCorner,
  /// 先换算左上角: `x = cx - w / 2`, `y = cy - h / 2`
  Center,
}

impl FromStr for BoxConvention {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "corner" => Ok(BoxConvention::AsCorner),
      "center" => Ok(BoxConvention::Center),
      other => Err(format!("未知的边界框约定: {}", other)),
    }
  }
}

/// 非极大值抑制，使用默认的几何约定
pub fn suppress(detections: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
  suppress_with(detections, iou_threshold, BoxConvention::default())
}

/// 非极大值抑制
///
/// 按置信度降序稳定排序（置信度相同时保持输入顺序），
/// 逐个与已保留的结果比较，与任意一个的 IoU 大于 `iou_threshold` 即丢弃。
/// 不区分类别。
pub fn suppress_with(
  mut detections: Vec<Detection>,
  iou_threshold: f32,
  convention: BoxConvention,
) -> Vec<Detection> {
  let candidates = detections.len();
  detections.sort_by(|a, b| b.confidence().total_cmp(&a.confidence()));

  let mut kept: Vec<Detection> = Vec::with_capacity(detections.len());
  for det in detections {
    let overlapped = kept
      .iter()
      .any(|res| iou_with(&det, res, convention) > iou_threshold);
    if !overlapped {
      kept.push(det);
    }
  }

  debug!("NMS: {} 个候选, 保留 {} 个", candidates, kept.len());
  kept
}

/// 计算两个检测框的 IoU，使用默认的几何约定
pub fn iou(a: &Detection, b: &Detection) -> f32 {
  iou_with(a, b, BoxConvention::default())
}

/// 计算两个检测框的 IoU
///
/// 几何字段非有限值、并集面积不为正或结果不是有限值时返回 0，结果裁剪到 `[0, 1]`。
pub fn iou_with(a: &Detection, b: &Detection, convention: BoxConvention) -> f32 {
  let box_a = a.corner_box(convention);
  let box_b = b.corner_box(convention);
  if !box_a.iter().chain(box_b.iter()).all(|v| v.is_finite()) {
    return 0.0;
  }
  // 面积在 f64 中计算，避免大框相乘溢出
  let [ax1, ay1, ax2, ay2] = box_a.map(f64::from);
  let [bx1, by1, bx2, by2] = box_b.map(f64::from);

  let inter_w = (ax2.min(bx2) - ax1.max(bx1)).max(0.0);
  let inter_h = (ay2.min(by2) - ay1.max(by1)).max(0.0);
  let intersection = inter_w * inter_h;

  let area_a = f64::from(a.width()) * f64::from(a.height());
  let area_b = f64::from(b.width()) * f64::from(b.height());
  let union = area_a + area_b - intersection;

  if !(union.is_finite() && union > 0.0) {
    return 0.0;
  }

  let ratio = intersection / union;
  if ratio.is_finite() {
    ratio.clamp(0.0, 1.0) as f32
  } else {
    0.0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn det(x: f32, y: f32, w: f32, h: f32, class_id: i32, confidence: f32) -> Detection {
    Detection::new(x, y, w, h, class_id, confidence)
  }

  #[test]
  fn identical_boxes_have_full_overlap() {
    let a = det(10.0, 10.0, 20.0, 20.0, 0, 0.9);
    assert!((iou(&a, &a) - 1.0).abs() < 1e-6);
  }

  #[test]
  fn disjoint_boxes_have_no_overlap() {
    let a = det(0.0, 0.0, 10.0, 10.0, 0, 0.9);
    let b = det(20.0, 20.0, 10.0, 10.0, 0, 0.9);
    assert_eq!(iou(&a, &b), 0.0);
  }

  #[test]
  fn corner_interpretation_matches_reference_formula() {
    // [0,10]x[0,10] 与 [5,15]x[0,10]: 交 50, 并 150
    let a = det(0.0, 0.0, 10.0, 10.0, 0, 0.9);
    let b = det(5.0, 0.0, 10.0, 10.0, 0, 0.9);
    assert!((iou(&a, &b) - 50.0 / 150.0).abs() < 1e-6);
  }

  #[test]
  fn center_interpretation_shifts_boxes() {
    // 作为中心: [0,10]x[0,10] 与 [-5,5]x[-5,5]，交 25，并 175
    let a = det(5.0, 5.0, 10.0, 10.0, 0, 0.9);
    let b = det(0.0, 0.0, 10.0, 10.0, 0, 0.9);
    let center = iou_with(&a, &b, BoxConvention::Center);
    assert!((center - 25.0 / 175.0).abs() < 1e-6);

    // 作为左上角: [5,15]x[5,15] 与 [0,10]x[0,10]
    let corner = iou_with(&a, &b, BoxConvention::AsCorner);
    assert!((corner - 25.0 / 175.0).abs() < 1e-6);

    // 尺寸不同时两种解释给出不同结果
    let c = det(0.0, 0.0, 20.0, 10.0, 0, 0.9);
    let d = det(15.0, 0.0, 10.0, 10.0, 0, 0.9);
    assert!((iou_with(&c, &d, BoxConvention::AsCorner) - 0.2).abs() < 1e-6);
    assert_eq!(iou_with(&c, &d, BoxConvention::Center), 0.0);
  }

  #[test]
  fn zero_area_boxes_give_zero() {
    let a = det(1.0, 1.0, 0.0, 0.0, 0, 0.9);
    assert_eq!(iou(&a, &a), 0.0);
    let b = det(1.0, 1.0, 0.0, 5.0, 0, 0.9);
    assert_eq!(iou(&a, &b), 0.0);
  }

  #[test]
  fn nan_geometry_gives_zero() {
    let a = det(f32::NAN, 0.0, 10.0, 10.0, 0, 0.9);
    let b = det(0.0, 0.0, 10.0, 10.0, 0, 0.9);
    assert_eq!(iou(&a, &b), 0.0);
  }

  #[test]
  fn huge_identical_boxes_still_overlap() {
    let a = det(0.0, 0.0, 1e20, 1e20, 0, 0.9);
    let b = det(0.0, 0.0, 1e20, 1e20, 3, 0.8);
    assert_eq!(iou(&a, &a), 1.0);
    assert_eq!(suppress(vec![a, b], 0.45), vec![a]);
  }

  #[test]
  fn suppression_is_cross_class() {
    let a = det(0.0, 0.0, 10.0, 10.0, 0, 0.6);
    let b = det(1.0, 1.0, 10.0, 10.0, 7, 0.9);
    let kept = suppress(vec![a, b], 0.45);
    assert_eq!(kept, vec![b]);
  }

  #[test]
  fn equal_confidence_keeps_input_order() {
    let a = det(0.0, 0.0, 10.0, 10.0, 0, 0.5);
    let b = det(100.0, 0.0, 10.0, 10.0, 1, 0.5);
    let c = det(200.0, 0.0, 10.0, 10.0, 2, 0.5);
    assert_eq!(suppress(vec![a, b, c], 0.45), vec![a, b, c]);
  }

  #[test]
  fn empty_input_gives_empty_output() {
    assert!(suppress(Vec::new(), 0.45).is_empty());
  }

  #[test]
  fn parses_convention_names() {
    assert_eq!("corner".parse::<BoxConvention>(), Ok(BoxConvention::AsCorner));
    assert_eq!("center".parse::<BoxConvention>(), Ok(BoxConvention::Center));
    assert!("middle".parse::<BoxConvention>().is_err());
  }
}
