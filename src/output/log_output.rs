// 该文件是 Ramyeon （拉面识别） 项目的一部分。
// src/output/log_output.rs - 日志输出
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

use tracing::{debug, info};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  model::{DetectResult, Detection, LabelTable},
  output::{OutputContext, Render},
  report::classify,
};

/// 把检测结果写入日志
#[derive(Debug, Clone, Default)]
pub struct LogOutput {
  context: OutputContext,
}

impl FromUrlWithScheme for LogOutput {
  const SCHEME: &'static str = "log";
}

impl FromUrl for LogOutput {
  type Error = Infallible;

  fn from_url(_url: &Url) -> Result<Self, Self::Error> {
    Ok(LogOutput::default())
  }
}

impl LogOutput {
  pub fn with_context(mut self, context: OutputContext) -> Self {
    self.context = context;
    self
  }
}

/// 单个检测结果的日志行
pub fn detection_line(det: &Detection, labels: &LabelTable) -> String {
  format!(
    "Detected {} with confidence {:.2}%",
    labels.name_or_unknown(det.class_id()),
    det.confidence() * 100.0
  )
}

impl<F> Render<F, DetectResult> for LogOutput {
  type Error = Infallible;

  fn render_result(&self, _frame: &F, result: &DetectResult) -> Result<(), Self::Error> {
    let labels = &self.context.labels;
    for det in result {
      info!("{}", detection_line(det, labels));
      debug!(
        "边界框: ({:.1}, {:.1}, {:.1}x{:.1})",
        det.center_x(),
        det.center_y(),
        det.width(),
        det.height()
      );
    }

    match classify(result, labels) {
      Some(classification) => info!("识别结果: {}", classification),
      None => info!("未检测到物体"),
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn detection_line_shows_label_and_percent() {
    let labels = LabelTable::default();
    let det = Detection::new(320.0, 240.0, 100.0, 50.0, 8, 0.875);
    assert_eq!(detection_line(&det, &labels), "Detected shin with confidence 87.50%");

    let unnamed = Detection::new(0.0, 0.0, 1.0, 1.0, -1, 0.5);
    assert_eq!(
      detection_line(&unnamed, &labels),
      "Detected unknown with confidence 50.00%"
    );
  }
}
