// 该文件是 Ramyeon （拉面识别） 项目的一部分。
// src/input/tensor_file.rs - 二进制张量文件输入
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

use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::RawTensor,
  input::{TensorInputError, read_tensor_bin},
  utils::decoded_path,
};

/// 单个小端 f32 张量文件，产出一帧
pub struct TensorFileInput {
  tensor: Option<RawTensor>,
}

impl FromUrlWithScheme for TensorFileInput {
  const SCHEME: &'static str = "tensor";
}

impl FromUrl for TensorFileInput {
  type Error = TensorInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    TensorInputError::check_scheme(url, Self::SCHEME)?;
    let tensor = read_tensor_bin(decoded_path(url))?;
    Ok(TensorFileInput {
      tensor: Some(tensor),
    })
  }
}

impl Iterator for TensorFileInput {
  type Item = RawTensor;

  fn next(&mut self) -> Option<Self::Item> {
    self.tensor.take()
  }
}
