// 该文件是 Ramyeon （拉面识别） 项目的一部分。
// src/output/record.rs - 文本记录输出
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

use std::{
  fs::OpenOptions,
  io::Write,
  path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  model::{DetectResult, LabelTable},
  output::{OutputContext, Render},
  utils::{decoded_path, has_query_key},
};

#[derive(Error, Debug)]
pub enum RecordOutputError {
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
}

/// 每个检测结果一行: `name, score, cx, cy, w, h`
///
/// `label_with_name` 为 false 时第一列写类别下标。
pub fn format_records(result: &DetectResult, labels: &LabelTable, label_with_name: bool) -> String {
  let mut records = Vec::with_capacity(result.len());
  for det in result {
    let name = if label_with_name {
      labels.name_or_unknown(det.class_id()).to_string()
    } else {
      det.class_id().to_string()
    };
    records.push(format!(
      "{}, {:.4}, {:.4}, {:.4}, {:.4}, {:.4}",
      name,
      det.confidence(),
      det.center_x(),
      det.center_y(),
      det.width(),
      det.height()
    ));
  }
  records.join("\n")
}

pub(crate) fn ensure_parent(path: &Path) -> std::io::Result<()> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)?;
  }
  Ok(())
}

/// 写入单个记录文件，默认每帧覆盖，`?append` 时追加
pub struct RecordOutput {
  path: PathBuf,
  label_with_name: bool,
  append: bool,
  context: OutputContext,
}

impl FromUrlWithScheme for RecordOutput {
  const SCHEME: &'static str = "record";
}

impl FromUrl for RecordOutput {
  type Error = RecordOutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(RecordOutputError::SchemeMismatch(format!(
        "期望 '{}', 实际 '{}'",
        Self::SCHEME,
        url.scheme()
      )));
    }

    let label_with_name = !url
      .query_pairs()
      .any(|(k, v)| k == "record" && v == "id");

    Ok(RecordOutput {
      path: PathBuf::from(decoded_path(url)),
      label_with_name,
      append: has_query_key(url, "append"),
      context: OutputContext::default(),
    })
  }
}

impl RecordOutput {
  pub fn with_context(mut self, context: OutputContext) -> Self {
    self.context = context;
    self
  }
}

impl<F> Render<F, DetectResult> for RecordOutput {
  type Error = RecordOutputError;

  fn render_result(&self, _frame: &F, result: &DetectResult) -> Result<(), Self::Error> {
    ensure_parent(&self.path)?;
    let records = format_records(result, &self.context.labels, self.label_with_name);

    if self.append {
      let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&self.path)?;
      writeln!(file, "{}", records)?;
      writeln!(file)?;
    } else {
      std::fs::write(&self.path, records)?;
    }

    debug!("写入 {} 条记录到 {}", result.len(), self.path.display());
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::Detection;

  #[test]
  fn formats_names_and_ids() {
    let result = DetectResult::from(vec![
      Detection::new(320.0, 240.0, 100.0, 50.0, 9, 0.875),
      Detection::new(1.0, 2.0, 3.0, 4.0, -1, 0.5),
    ]);
    let labels = LabelTable::default();
    assert_eq!(
      format_records(&result, &labels, true),
      "buldak, 0.8750, 320.0000, 240.0000, 100.0000, 50.0000\n\
       unknown, 0.5000, 1.0000, 2.0000, 3.0000, 4.0000"
    );
    assert!(format_records(&result, &labels, false).starts_with("9, 0.8750"));
  }

  #[test]
  fn parses_query_flags() {
    let url = Url::parse("record:///tmp/out.txt?record=id&append").unwrap();
    let output = RecordOutput::from_url(&url).unwrap();
    assert!(!output.label_with_name);
    assert!(output.append);
    assert_eq!(output.path, PathBuf::from("/tmp/out.txt"));
  }

  fn two_frames() -> (DetectResult, DetectResult) {
    (
      DetectResult::from(vec![Detection::new(1.0, 2.0, 3.0, 4.0, 0, 0.5)]),
      DetectResult::from(vec![Detection::new(5.0, 6.0, 7.0, 8.0, 3, 0.75)]),
    )
  }

  #[test]
  fn append_keeps_every_frame() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.txt");
    let url = Url::parse(&format!("record://{}?append", path.display())).unwrap();
    let output = RecordOutput::from_url(&url).unwrap();

    let (first, second) = two_frames();
    output.render_result(&(), &first).unwrap();
    output.render_result(&(), &second).unwrap();

    assert_eq!(
      std::fs::read_to_string(&path).unwrap(),
      "jinHot, 0.5000, 1.0000, 2.0000, 3.0000, 4.0000\n\n\
       king, 0.7500, 5.0000, 6.0000, 7.0000, 8.0000\n\n"
    );
  }

  #[test]
  fn default_mode_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/records.txt");
    let url = Url::parse(&format!("record://{}", path.display())).unwrap();
    let output = RecordOutput::from_url(&url).unwrap();

    let (first, second) = two_frames();
    output.render_result(&(), &first).unwrap();
    output.render_result(&(), &second).unwrap();

    assert_eq!(
      std::fs::read_to_string(&path).unwrap(),
      "king, 0.7500, 5.0000, 6.0000, 7.0000, 8.0000"
    );
  }
}
