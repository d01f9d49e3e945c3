//! 사용자 역할
//!
//! 역할은 토큰 클레임과 저장소에 소문자 레이블로 기록됩니다.
//!
//! | 역할 | id | 레이블 |
//! |------|----|--------|
//! | 관리자 | 1 | `admin` |
//! | 편집자 | 2 | `editor` |
//! | 고객 | 3 | `customer` |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    Customer,
}

impl Role {
    /// 역할 테이블의 고정 id
    pub fn id(&self) -> u8 {
        match self {
            Role::Admin => 1,
            Role::Editor => 2,
            Role::Customer => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Customer => "customer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "editor" => Ok(Role::Editor),
            "customer" => Ok(Role::Customer),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}
