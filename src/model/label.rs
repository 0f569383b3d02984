// 该文件是 Ramyeon （拉面识别） 项目的一部分。
// src/model/label.rs - 类别标签表
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

use std::{path::Path, sync::Arc};

use thiserror::Error;
use tracing::info;

/// 拉面包装类别名称
pub const RAMYEON_LABELS: [&str; 32] = [
  "jinHot",
  "jinMild",
  "wang",
  "king",
  "kimchi",
  "ojingeo",
  "sesame",
  "kaguri",
  "shin",
  "buldak",
  "buldakCarbo",
  "buldak4Cheese",
  "kingSoup",
  "kingSoup2",
  "jinMildSoup",
  "sesameSoup1",
  "sesameSoup2",
  "sesameSoup3",
  "buldakSoup",
  "buldakSoup2",
  "jinHotSoup",
  "shinSoup",
  "kimchiSoup",
  "kimchiSoup2",
  "carboSoup",
  "carboSoup2",
  "kaguriSoup",
  "ojingeoSoup",
  "cheeseSoup",
  "cheeseSoup2",
  "wangSoup",
  "wangSoup2",
];

/// 无法找到类别名称时使用的占位名称
pub const UNKNOWN_LABEL: &str = "unknown";

#[derive(Error, Debug)]
pub enum LabelError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("标签文件解析错误: {0}")]
  ParseError(#[from] serde_json::Error),
  #[error("标签表为空")]
  Empty,
}

/// 有序且不可变的类别标签表
///
/// 克隆只增加引用计数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
  labels: Arc<[String]>,
}

impl Default for LabelTable {
  fn default() -> Self {
    Self::new(RAMYEON_LABELS.iter().map(|s| s.to_string()))
  }
}

impl LabelTable {
  pub fn new<I: IntoIterator<Item = String>>(labels: I) -> Self {
    Self {
      labels: labels.into_iter().collect(),
    }
  }

  /// 从 JSON 字符串数组加载标签表
  pub fn from_json_str(json: &str) -> Result<Self, LabelError> {
    let labels: Vec<String> = serde_json::from_str(json)?;
    if labels.is_empty() {
      return Err(LabelError::Empty);
    }
    Ok(Self::new(labels))
  }

  pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, LabelError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let table = Self::from_json_str(&content)?;
    info!("从 {} 加载 {} 个类别标签", path.display(), table.len());
    Ok(table)
  }

  pub fn len(&self) -> usize {
    self.labels.len()
  }

  pub fn is_empty(&self) -> bool {
    self.labels.is_empty()
  }

  /// 按类别下标查找名称，哨兵值和越界下标返回 `None`
  pub fn name(&self, class_id: i32) -> Option<&str> {
    usize::try_from(class_id)
      .ok()
      .and_then(|idx| self.labels.get(idx))
      .map(String::as_str)
  }

  /// 按类别下标查找名称，找不到时返回 [`UNKNOWN_LABEL`]
  pub fn name_or_unknown(&self, class_id: i32) -> &str {
    self.name(class_id).unwrap_or(UNKNOWN_LABEL)
  }

  pub fn iter(&self) -> impl Iterator<Item = &str> {
    self.labels.iter().map(String::as_str)
  }
}
