// 该文件是 Ramyeon （拉面识别） 项目的一部分。
// src/report.rs - 分类结果描述
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

use std::fmt;

use crate::model::{DetectResult, LabelTable};

/// 一帧中置信度最高的识别结果，交给界面或语音播报使用
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
  pub class_id: i32,
  pub label: String,
  pub confidence: f32,
}

impl fmt::Display for Classification {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} ({:.2}%)", self.label, self.confidence * 100.0)
  }
}

/// 取置信度最高的检测结果，结果为空时返回 `None`
pub fn classify(result: &DetectResult, labels: &LabelTable) -> Option<Classification> {
  result.best().map(|det| Classification {
    class_id: det.class_id(),
    label: labels.name_or_unknown(det.class_id()).to_string(),
    confidence: det.confidence(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::Detection;

  #[test]
  fn picks_first_item_of_sorted_result() {
    let result = DetectResult::from(vec![
      Detection::new(0.0, 0.0, 1.0, 1.0, 8, 0.935),
      Detection::new(5.0, 5.0, 1.0, 1.0, 0, 0.4),
    ]);
    let c = classify(&result, &LabelTable::default()).unwrap();
    assert_eq!(c.label, "shin");
    assert_eq!(c.to_string(), "shin (93.50%)");
  }

  #[test]
  fn unset_class_is_unknown() {
    let result = DetectResult::from(vec![Detection::new(0.0, 0.0, 1.0, 1.0, -1, 0.5)]);
    let c = classify(&result, &LabelTable::default()).unwrap();
    assert_eq!(c.label, "unknown");
  }

  #[test]
  fn empty_result_has_no_classification() {
    assert!(classify(&DetectResult::default(), &LabelTable::default()).is_none());
  }
}
