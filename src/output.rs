// 该文件是 Ramyeon （拉面识别） 项目的一部分。
// src/output.rs - 输出模块
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

use thiserror::Error;
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  model::{DetectResult, Detector, LabelTable, PipelineConfig},
};

#[cfg(feature = "directory_record")]
mod directory_record;
mod json_report;
mod log_output;
mod record;

#[cfg(feature = "directory_record")]
pub use self::directory_record::{DirectoryRecordOutput, DirectoryRecordOutputError};
pub use self::json_report::{JsonOutput, JsonOutputError};
pub use self::log_output::LogOutput;
pub use self::record::{RecordOutput, RecordOutputError, format_records};

pub trait Render<F, D> {
  type Error;
  fn render_result(&self, frame: &F, result: &D) -> Result<(), Self::Error>;
}

/// 渲染结果时需要的上下文: 标签表与检测参数
#[derive(Debug, Clone, Default)]
pub struct OutputContext {
  pub labels: LabelTable,
  pub config: PipelineConfig,
}

impl<E> From<&Detector<E>> for OutputContext {
  fn from(detector: &Detector<E>) -> Self {
    Self {
      labels: detector.labels().clone(),
      config: *detector.config(),
    }
  }
}

pub enum OutputWrapper {
  Log(LogOutput),
  Record(RecordOutput),
  Json(JsonOutput),
  #[cfg(feature = "directory_record")]
  Directory(DirectoryRecordOutput),
}

#[derive(Error, Debug)]
pub enum OutputWrapperError {
  #[error("不支持的输出方案: {0}")]
  UnsupportedScheme(String),
  #[error("记录输出错误: {0}")]
  Record(#[from] RecordOutputError),
  #[error("JSON 输出错误: {0}")]
  Json(#[from] JsonOutputError),
  #[cfg(feature = "directory_record")]
  #[error("目录记录输出错误: {0}")]
  Directory(#[from] DirectoryRecordOutputError),
}

impl FromUrl for OutputWrapper {
  type Error = OutputWrapperError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    match url.scheme() {
      s if s == LogOutput::SCHEME => Ok(OutputWrapper::Log(LogOutput::default())),
      s if s == RecordOutput::SCHEME => Ok(OutputWrapper::Record(RecordOutput::from_url(url)?)),
      s if s == JsonOutput::SCHEME => Ok(OutputWrapper::Json(JsonOutput::from_url(url)?)),
      #[cfg(feature = "directory_record")]
      s if s == DirectoryRecordOutput::SCHEME => Ok(OutputWrapper::Directory(
        DirectoryRecordOutput::from_url(url)?,
      )),
      other => Err(OutputWrapperError::UnsupportedScheme(other.to_string())),
    }
  }
}

impl OutputWrapper {
  pub fn with_context(self, context: OutputContext) -> Self {
    match self {
      OutputWrapper::Log(output) => OutputWrapper::Log(output.with_context(context)),
      OutputWrapper::Record(output) => OutputWrapper::Record(output.with_context(context)),
      OutputWrapper::Json(output) => OutputWrapper::Json(output.with_context(context)),
      #[cfg(feature = "directory_record")]
      OutputWrapper::Directory(output) => OutputWrapper::Directory(output.with_context(context)),
    }
  }
}

impl<F> Render<F, DetectResult> for OutputWrapper {
  type Error = OutputWrapperError;

  fn render_result(&self, frame: &F, result: &DetectResult) -> Result<(), Self::Error> {
    match self {
      OutputWrapper::Log(output) => match output.render_result(frame, result) {
        Ok(()) => Ok(()),
        Err(never) => match never {},
      },
      OutputWrapper::Record(output) => Ok(output.render_result(frame, result)?),
      OutputWrapper::Json(output) => Ok(output.render_result(frame, result)?),
      #[cfg(feature = "directory_record")]
      OutputWrapper::Directory(output) => Ok(output.render_result(frame, result)?),
    }
  }
}
