// 该文件是 Ramyeon （拉面识别） 项目的一部分。
// src/bin/simple_oneshot.rs - 单帧推理
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

use anyhow::Result;
use clap::Parser;
use url::Url;

use ramyeon::{
  FromUrl,
  input::InputWrapper,
  model::{DetectorBuilder, Recorded},
  output::{OutputContext, OutputWrapper},
  task::{OneShotTask, Task},
};
use tracing::info;

/// Ramyeon 单帧推理参数
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 检测参数，例如 ramyeon:///?conf=0.25&iou=0.45&classes=31
  #[arg(long, value_name = "MODEL", default_value = "ramyeon:///")]
  pub model: Url,
  /// 原始张量来源 (tensor://, json://, folder://)
  #[arg(long, value_name = "SOURCE")]
  pub input: Url,
  /// 输出 (log:, record://, json://, folder://)
  #[arg(long, value_name = "OUTPUT", default_value = "log:")]
  pub output: Url,
}

fn main() -> Result<()> {
  tracing_subscriber::fmt::init();

  let args = Args::parse();

  info!("检测参数: {}", args.model);
  info!("输入来源: {}", args.input);
  info!("输出路径: {}", args.output);

  let input = InputWrapper::from_url(&args.input)?;
  let model = DetectorBuilder::from_url(&args.model)?.build(Recorded)?;
  let output = OutputWrapper::from_url(&args.output)?.with_context(OutputContext::from(&model));

  OneShotTask.run_task(input, model, output)?;

  Ok(())
}
