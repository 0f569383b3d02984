// 该文件是 Ramyeon （拉面识别） 项目的一部分。
// src/utils.rs - 工具函数
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

/// 取出 URL 中经过百分号解码的路径
pub fn decoded_path(url: &Url) -> String {
  match urlencoding::decode(url.path()) {
    Ok(path) => path.into_owned(),
    Err(_) => url.path().to_string(),
  }
}

/// 查询参数中是否出现某个键
pub fn has_query_key(url: &Url, key: &str) -> bool {
  url.query_pairs().any(|(k, _)| k == key)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn decodes_escaped_path() {
    let url = Url::parse("tensor:///tmp/my%20frames/a.bin").unwrap();
    assert_eq!(decoded_path(&url), "/tmp/my frames/a.bin");
  }

  #[test]
  fn finds_flag_keys() {
    let url = Url::parse("folder:///tmp/out?always").unwrap();
    assert!(has_query_key(&url, "always"));
    assert!(!has_query_key(&url, "record"));
  }
}
