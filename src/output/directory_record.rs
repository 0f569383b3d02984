// 该文件是 Ramyeon （拉面识别） 项目的一部分。
// src/output/directory_record.rs - 目录记录输出
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
use std::sync::Mutex;

use chrono::{Datelike, Utc};
use thiserror::Error;
use tracing::debug;

use crate::{
  FromUrl, FromUrlWithScheme,
  model::DetectResult,
  output::{OutputContext, Render, format_records},
  utils::{decoded_path, has_query_key},
};

#[derive(Error, Debug)]
pub enum DirectoryRecordOutputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("帧计数器不可用")]
  CounterPoisoned,
}

/// 按日期分目录，每帧写出一个记录文件
pub struct DirectoryRecordOutput {
  directory: PathBuf,
  label_with_name: bool,
  frame_counter: Mutex<u16>,
  always: bool,
  context: OutputContext,
}

impl FromUrlWithScheme for DirectoryRecordOutput {
  const SCHEME: &'static str = "folder";
}

impl FromUrl for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn from_url(uri: &url::Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(DirectoryRecordOutputError::SchemeMismatch);
    }

    let label_with_name = !uri
      .query_pairs()
      .any(|(k, v)| k == "record" && v == "id");

    Ok(DirectoryRecordOutput {
      directory: PathBuf::from(decoded_path(uri)),
      label_with_name,
      frame_counter: Mutex::new(0),
      always: has_query_key(uri, "always"),
      context: OutputContext::default(),
    })
  }
}

impl DirectoryRecordOutput {
  pub fn with_context(mut self, context: OutputContext) -> Self {
    self.context = context;
    self
  }

  fn frame_id(&self) -> Result<u16, DirectoryRecordOutputError> {
    let mut counter = self
      .frame_counter
      .lock()
      .map_err(|_| DirectoryRecordOutputError::CounterPoisoned)?;
    *counter = counter.wrapping_add(1);
    Ok(*counter)
  }

  fn frame_path(&self) -> Result<PathBuf, DirectoryRecordOutputError> {
    let now = Utc::now();
    let directory = self
      .directory
      .join(now.year().to_string())
      .join(format!("{:02}", now.month()))
      .join(format!("{:02}", now.day()));
    std::fs::create_dir_all(&directory)?;

    Ok(directory.join(format!(
      "{}-{:04X}.txt",
      now.format("%H-%M-%S"),
      self.frame_id()?
    )))
  }
}

impl<F> Render<F, DetectResult> for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn render_result(&self, _frame: &F, result: &DetectResult) -> Result<(), Self::Error> {
    if !self.always && result.is_empty() {
      return Ok(());
    }

    let path = self.frame_path()?;
    let records = format_records(result, &self.context.labels, self.label_with_name);
    std::fs::write(&path, records)?;
    debug!("写入记录文件 {}", path.display());
    Ok(())
  }
}
