// 该文件是 Ramyeon （拉面识别） 项目的一部分。
// src/input/tensor_directory.rs - 目录张量输入
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

use std::{collections::VecDeque, path::PathBuf};

use tracing::{debug, error, info};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::RawTensor,
  input::{TensorInputError, read_tensor_bin, read_tensor_json},
  utils::decoded_path,
};

/// 目录中的 `*.bin` 与 `*.json` 张量文件，按文件名顺序逐个读取
pub struct TensorDirectoryInput {
  files: VecDeque<PathBuf>,
}

impl FromUrlWithScheme for TensorDirectoryInput {
  const SCHEME: &'static str = "folder";
}

impl FromUrl for TensorDirectoryInput {
  type Error = TensorInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    TensorInputError::check_scheme(url, Self::SCHEME)?;
    let directory = PathBuf::from(decoded_path(url));

    let mut files = Vec::new();
    for entry in std::fs::read_dir(&directory)? {
      let path = entry?.path();
      if path.is_file() && tensor_kind(&path).is_some() {
        files.push(path);
      }
    }
    files.sort();

    info!("目录 {} 中共有 {} 个张量文件", directory.display(), files.len());
    Ok(TensorDirectoryInput {
      files: files.into(),
    })
  }
}

enum TensorKind {
  Bin,
  Json,
}

fn tensor_kind(path: &std::path::Path) -> Option<TensorKind> {
  match path.extension()?.to_str()? {
    "bin" => Some(TensorKind::Bin),
    "json" => Some(TensorKind::Json),
    _ => None,
  }
}

impl Iterator for TensorDirectoryInput {
  type Item = RawTensor;

  fn next(&mut self) -> Option<Self::Item> {
    while let Some(path) = self.files.pop_front() {
      let loaded = match tensor_kind(&path) {
        Some(TensorKind::Bin) => read_tensor_bin(&path),
        Some(TensorKind::Json) => read_tensor_json(&path),
        None => continue,
      };
      match loaded {
        Ok(tensor) => {
          debug!("读取张量文件 {}, 长度 {}", path.display(), tensor.len());
          return Some(tensor);
        }
        Err(e) => error!("读取张量文件 {} 失败, 跳过: {}", path.display(), e),
      }
    }
    None
  }
}
