// 该文件是 Ramyeon （拉面识别） 项目的一部分。
// src/output/json_report.rs - JSON 报告输出
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

use std::path::PathBuf;

use chrono::Utc;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  model::DetectResult,
  output::{OutputContext, Render, record::ensure_parent},
  report::classify,
  utils::decoded_path,
};

#[derive(Error, Debug)]
pub enum JsonOutputError {
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("JSON 序列化错误: {0}")]
  JsonError(#[from] serde_json::Error),
}

/// 每帧写出一份 JSON 报告
pub struct JsonOutput {
  path: PathBuf,
  context: OutputContext,
}

impl FromUrlWithScheme for JsonOutput {
  const SCHEME: &'static str = "json";
}

impl FromUrl for JsonOutput {
  type Error = JsonOutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(JsonOutputError::SchemeMismatch(format!(
        "期望 '{}', 实际 '{}'",
        Self::SCHEME,
        url.scheme()
      )));
    }

    Ok(JsonOutput {
      path: PathBuf::from(decoded_path(url)),
      context: OutputContext::default(),
    })
  }
}

impl JsonOutput {
  pub fn with_context(mut self, context: OutputContext) -> Self {
    self.context = context;
    self
  }

  pub fn report(&self, result: &DetectResult) -> Value {
    let OutputContext { labels, config } = &self.context;

    let detections = result
      .iter()
      .map(|det| {
        json!({
          "label": labels.name_or_unknown(det.class_id()),
          "class_id": det.class_id(),
          "confidence": det.confidence(),
          "box": {
            "center_x": det.center_x(),
            "center_y": det.center_y(),
            "width": det.width(),
            "height": det.height(),
          },
          "normalized_xyxy": config.normalized_box(det.corner_box(config.box_convention)),
        })
      })
      .collect::<Vec<_>>();

    let classification = classify(result, labels).map(|c| {
      json!({
        "label": c.label,
        "class_id": c.class_id,
        "confidence": c.confidence,
        "text": c.to_string(),
      })
    });

    json!({
      "timestamp": Utc::now().to_rfc3339(),
      "classification": classification,
      "detections": detections,
    })
  }
}

impl<F> Render<F, DetectResult> for JsonOutput {
  type Error = JsonOutputError;

  fn render_result(&self, _frame: &F, result: &DetectResult) -> Result<(), Self::Error> {
    ensure_parent(&self.path)?;
    let report = self.report(result);
    std::fs::write(&self.path, serde_json::to_string_pretty(&report)?)?;
    debug!("写入 JSON 报告到 {}", self.path.display());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::Detection;

  #[test]
  fn report_lists_detections_and_best_label() {
    let url = Url::parse("json:///tmp/report.json").unwrap();
    let output = JsonOutput::from_url(&url).unwrap();
    let result = DetectResult::from(vec![Detection::new(320.0, 0.0, 64.0, 160.0, 2, 0.5)]);

    let report = output.report(&result);
    assert_eq!(report["classification"]["label"], "wang");
    assert_eq!(report["detections"][0]["class_id"], 2);
    assert_eq!(report["detections"][0]["normalized_xyxy"][0], 0.5);
    assert_eq!(report["detections"][0]["normalized_xyxy"][3], 0.25);
  }

  #[test]
  fn unnamed_classes_are_reported_as_unknown() {
    let url = Url::parse("json:///tmp/report.json").unwrap();
    let output = JsonOutput::from_url(&url).unwrap();
    let result = DetectResult::from(vec![
      Detection::new(1.0, 1.0, 4.0, 4.0, -1, 0.75),
      Detection::new(1.0, 1.0, 4.0, 4.0, 99, 0.5),
    ]);

    let report = output.report(&result);
    assert_eq!(report["detections"][0]["label"], "unknown");
    assert_eq!(report["detections"][1]["label"], "unknown");
    assert_eq!(report["detections"][1]["class_id"], 99);
  }

  #[test]
  fn empty_result_has_null_classification() {
    let url = Url::parse("json:///tmp/report.json").unwrap();
    let output = JsonOutput::from_url(&url).unwrap();
    let report = output.report(&DetectResult::default());
    assert!(report["classification"].is_null());
    assert_eq!(report["detections"], json!([]));
  }
}
