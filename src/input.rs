// 该文件是 Ramyeon （拉面识别） 项目的一部分。
// src/input.rs - 原始张量输入
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

use std::path::Path;

use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::{FromUrl, FromUrlWithScheme, frame::RawTensor};

mod json_tensor;
mod tensor_directory;
mod tensor_file;

pub use self::json_tensor::JsonTensorInput;
pub use self::tensor_directory::TensorDirectoryInput;
pub use self::tensor_file::TensorFileInput;

#[derive(Error, Debug)]
pub enum TensorInputError {
  #[error("URI 方案不匹配: 期望 '{expected}', 实际 '{found}'")]
  SchemeMismatch {
    expected: &'static str,
    found: String,
  },
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("JSON 张量解析错误: {0}")]
  JsonError(#[from] serde_json::Error),
}

impl TensorInputError {
  pub(crate) fn check_scheme(url: &Url, expected: &'static str) -> Result<(), Self> {
    if url.scheme() != expected {
      return Err(TensorInputError::SchemeMismatch {
        expected,
        found: url.scheme().to_string(),
      });
    }
    Ok(())
  }
}

/// 读取小端 f32 二进制张量文件
pub fn read_tensor_bin<P: AsRef<Path>>(path: P) -> Result<RawTensor, TensorInputError> {
  let path = path.as_ref();
  let bytes = std::fs::read(path)?;
  let (tensor, dropped) = RawTensor::from_le_bytes(&bytes);
  if dropped != 0 {
    warn!(
      "张量文件 {} 长度不是 4 的整数倍, 忽略末尾 {} 个字节",
      path.display(),
      dropped
    );
  }
  Ok(tensor)
}

/// 读取 JSON 数组形式的张量文件
pub fn read_tensor_json<P: AsRef<Path>>(path: P) -> Result<RawTensor, TensorInputError> {
  let content = std::fs::read_to_string(path)?;
  let data: Vec<f32> = serde_json::from_str(&content)?;
  Ok(RawTensor::from(data))
}

pub enum InputWrapper {
  TensorFile(TensorFileInput),
  JsonTensor(JsonTensorInput),
  Directory(TensorDirectoryInput),
}

#[derive(Error, Debug)]
pub enum InputWrapperError {
  #[error("不支持的输入方案: {0}")]
  UnsupportedScheme(String),
  #[error("输入错误: {0}")]
  Input(#[from] TensorInputError),
}

impl FromUrl for InputWrapper {
  type Error = InputWrapperError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    match url.scheme() {
      s if s == TensorFileInput::SCHEME => {
        Ok(InputWrapper::TensorFile(TensorFileInput::from_url(url)?))
      }
      s if s == JsonTensorInput::SCHEME => {
        Ok(InputWrapper::JsonTensor(JsonTensorInput::from_url(url)?))
      }
      s if s == TensorDirectoryInput::SCHEME => Ok(InputWrapper::Directory(
        TensorDirectoryInput::from_url(url)?,
      )),
      other => Err(InputWrapperError::UnsupportedScheme(other.to_string())),
    }
  }
}

impl Iterator for InputWrapper {
  type Item = RawTensor;

  fn next(&mut self) -> Option<Self::Item> {
    match self {
      InputWrapper::TensorFile(input) => input.next(),
      InputWrapper::JsonTensor(input) => input.next(),
      InputWrapper::Directory(input) => input.next(),
    }
  }
}
