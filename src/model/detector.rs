// 该文件是 Ramyeon （拉面识别） 项目的一部分。
// src/model/detector.rs - 检测器定义
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

use thiserror::Error;
use tracing::{debug, info, warn};
use url::Url;

use crate::{
  FromUrl, FromUrlWithScheme,
  model::{
    BoxConvention, DetectResult, Inference, LabelError, LabelTable, Model, PipelineConfig, decode,
    suppress_with,
  },
  utils::decoded_path,
};

#[derive(Error, Debug)]
pub enum DetectorError {
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
  #[error("参数 {key} 的值 '{value}' 无效")]
  InvalidParameter { key: String, value: String },
  #[error("未知参数: {0}")]
  UnknownParameter(String),
  #[error("标签表错误: {0}")]
  LabelError(#[from] LabelError),
}

impl DetectorError {
  fn invalid(key: &str, value: &str) -> Self {
    DetectorError::InvalidParameter {
      key: key.to_string(),
      value: value.to_string(),
    }
  }
}

#[derive(Debug, Clone, Default)]
pub struct DetectorBuilder {
  config: PipelineConfig,
  labels_path: Option<PathBuf>,
  labels: Option<LabelTable>,
}

impl FromUrlWithScheme for DetectorBuilder {
  const SCHEME: &'static str = "ramyeon";
}

impl FromUrl for DetectorBuilder {
  type Error = DetectorError;

  /// 形如 `ramyeon:///?conf=0.25&iou=0.45&classes=31&size=640x640&boxes=corner&labels=/path.json`
  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      return Err(DetectorError::SchemeMismatch(format!(
        "模型路径必须使用 {} 方案, 实际为 {}",
        Self::SCHEME,
        url.scheme()
      )));
    }

    let mut builder = DetectorBuilder::default();
    for (key, value) in url.query_pairs() {
      builder = builder.apply(&key, &value)?;
    }

    let path = decoded_path(url);
    if builder.labels_path.is_none() && !path.is_empty() && path != "/" {
      builder.labels_path = Some(PathBuf::from(path));
    }

    Ok(builder)
  }
}

impl DetectorBuilder {
  fn apply(mut self, key: &str, value: &str) -> Result<Self, DetectorError> {
    match key {
      "conf" => {
        self.config.confidence_threshold = value
          .parse()
          .map_err(|_| DetectorError::invalid(key, value))?;
      }
      "iou" => {
        self.config.iou_threshold = value
          .parse()
          .map_err(|_| DetectorError::invalid(key, value))?;
      }
      "classes" => {
        self.config.class_count = value
          .parse()
          .map_err(|_| DetectorError::invalid(key, value))?;
      }
      "size" => {
        let (w, h): (u32, u32) = value
          .split_once('x')
          .and_then(|(w, h)| Some((w.parse().ok()?, h.parse().ok()?)))
          .ok_or_else(|| DetectorError::invalid(key, value))?;
        self.config.input_width = w;
        self.config.input_height = h;
      }
      "boxes" => {
        self.config.box_convention = value
          .parse()
          .map_err(|_| DetectorError::invalid(key, value))?;
      }
      "labels" => {
        self.labels_path = Some(PathBuf::from(value));
      }
      other => return Err(DetectorError::UnknownParameter(other.to_string())),
    }
    Ok(self)
  }

  pub fn config(mut self, config: PipelineConfig) -> Self {
    self.config = config;
    self
  }

  pub fn confidence_threshold(mut self, threshold: f32) -> Self {
    self.config.confidence_threshold = threshold;
    self
  }

  pub fn iou_threshold(mut self, threshold: f32) -> Self {
    self.config.iou_threshold = threshold;
    self
  }

  pub fn class_count(mut self, class_count: i32) -> Self {
    self.config.class_count = class_count;
    self
  }

  pub fn input_size(mut self, width: u32, height: u32) -> Self {
    self.config.input_width = width;
    self.config.input_height = height;
    self
  }

  pub fn box_convention(mut self, convention: BoxConvention) -> Self {
    self.config.box_convention = convention;
    self
  }

  /// 直接指定标签表，优先于标签文件
  pub fn labels(mut self, labels: LabelTable) -> Self {
    self.labels = Some(labels);
    self
  }

  pub fn labels_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
    self.labels_path = Some(path.into());
    self
  }

  pub fn build<E: Inference>(self, engine: E) -> Result<Detector<E>, DetectorError> {
    let labels = match (self.labels, self.labels_path) {
      (Some(labels), _) => labels,
      (None, Some(path)) => LabelTable::from_json_file(path)?,
      (None, None) => LabelTable::default(),
    };

    let config = self.config;
    config.check();
    if config.class_count > 0 && config.class_count as usize > labels.len() {
      warn!(
        "类别数量 {} 超过标签数量 {}, 多出的类别将显示为 unknown",
        config.class_count,
        labels.len()
      );
    }

    info!(
      "检测器参数: 置信度阈值 {}, IoU 阈值 {}, 类别数 {}, 步长 {}, 输入 {}x{}, 边界框约定 {:?}",
      config.confidence_threshold,
      config.iou_threshold,
      config.class_count,
      config.stride(),
      config.input_width,
      config.input_height,
      config.box_convention
    );

    Ok(Detector {
      engine,
      config,
      labels,
    })
  }
}

/// 检测器: 执行推理后对原始张量做解码与非极大值抑制
pub struct Detector<E> {
  engine: E,
  config: PipelineConfig,
  labels: LabelTable,
}

impl<E> Detector<E> {
  pub fn config(&self) -> &PipelineConfig {
    &self.config
  }

  pub fn labels(&self) -> &LabelTable {
    &self.labels
  }

  /// 解码并抑制重叠框
  pub fn postprocess(&self, tensor: &[f32]) -> DetectResult {
    debug!("后处理模型输出, 张量长度 {}", tensor.len());
    let candidates = decode(
      tensor,
      self.config.stride(),
      self.config.class_count,
      self.config.confidence_threshold,
    );
    let kept = suppress_with(
      candidates,
      self.config.iou_threshold,
      self.config.box_convention,
    );
    debug!("检测到 {} 个物体", kept.len());
    DetectResult::from(kept)
  }
}

impl<E: Inference> Model for Detector<E> {
  type Input = E::Frame;
  type Output = DetectResult;
  type Error = E::Error;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
    debug!("执行模型推理");
    let tensor = self.engine.run(input)?;
    Ok(self.postprocess(tensor.as_slice()))
  }
}
