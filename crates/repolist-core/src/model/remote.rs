//! SSH 形式の Git リモート

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static SSH_SHORTHAND: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<user>[A-Za-z0-9._-]+)@(?P<host>[A-Za-z0-9.-]+):(?P<path>[A-Za-z0-9._~/-]+)\.git$")
        .expect("SSH shorthand pattern is valid")
});

/// `user@host:path.git` を分解したもの
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GitRemote {
    pub user: String,
    pub host: String,
    /// `.git` を除いたパス（例: `thani2808/dan-p81`）
    pub path: String,
}

impl GitRemote {
    /// SSH 短縮形式をパースする。形式に合わない場合は None
    pub fn parse(url: &str) -> Option<Self> {
        let caps = SSH_SHORTHAND.captures(url)?;
        let path = &caps["path"];
        if path.trim_matches('/').is_empty() {
            return None;
        }

        Some(Self {
            user: caps["user"].to_string(),
            host: caps["host"].to_string(),
            path: path.to_string(),
        })
    }

    /// パス末尾のリポジトリ名
    pub fn repository(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

impl fmt::Display for GitRemote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}.git", self.user, self.host, self.path)
    }
}
