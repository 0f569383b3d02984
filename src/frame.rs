// 该文件是 Ramyeon （拉面识别） 项目的一部分。
// src/frame.rs - 原始张量帧定义
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

const F32_BYTES: usize = std::mem::size_of::<f32>();

/// 推理模型输出的扁平浮点张量，只读
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTensor {
  data: Box<[f32]>,
}

impl From<Vec<f32>> for RawTensor {
  fn from(data: Vec<f32>) -> Self {
    Self {
      data: data.into_boxed_slice(),
    }
  }
}

impl From<&[f32]> for RawTensor {
  fn from(data: &[f32]) -> Self {
    Self { data: data.into() }
  }
}

impl RawTensor {
  /// 从小端 f32 字节流构造张量，返回张量及末尾被丢弃的字节数
  pub fn from_le_bytes(bytes: &[u8]) -> (Self, usize) {
    let chunks = bytes.chunks_exact(F32_BYTES);
    let dropped = chunks.remainder().len();
    let data = chunks
      .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
      .collect::<Vec<_>>();
    (Self::from(data), dropped)
  }

  pub fn to_le_bytes(&self) -> Vec<u8> {
    self.data.iter().flat_map(|v| v.to_le_bytes()).collect()
  }

  pub fn len(&self) -> usize {
    self.data.len()
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  pub fn as_slice(&self) -> &[f32] {
    &self.data
  }

  /// 按给定步长可完整解析的记录数量
  pub fn records(&self, stride: usize) -> usize {
    if stride == 0 { 0 } else { self.data.len() / stride }
  }
}

impl AsRef<[f32]> for RawTensor {
  fn as_ref(&self) -> &[f32] {
    &self.data
  }
}
