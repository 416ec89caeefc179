use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 单个用户的账户：积分余额 + 拥有的子域名标签
///
/// 子域名按创建顺序保存，会以编号列表的形式展示给用户。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// 积分余额
    pub credits: u64,
    /// 拥有的子域名标签（不含基础域名）
    #[serde(default)]
    pub subdomains: Vec<String>,
}

impl UserAccount {
    /// 是否拥有指定标签
    pub fn owns(&self, label: &str) -> bool {
        self.subdomains.iter().any(|s| s == label)
    }

    /// 移除标签，返回是否存在
    pub fn release(&mut self, label: &str) -> bool {
        let before = self.subdomains.len();
        self.subdomains.retain(|s| s != label);
        self.subdomains.len() != before
    }
}

/// 账本：用户 ID → 账户
///
/// 持久化格式为以用户 ID 为键的单个 JSON 对象。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    accounts: BTreeMap<String, UserAccount>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user_id: &str) -> Option<&UserAccount> {
        self.accounts.get(user_id)
    }

    pub fn get_mut(&mut self, user_id: &str) -> Option<&mut UserAccount> {
        self.accounts.get_mut(user_id)
    }

    /// 获取账户，不存在时插入默认值
    pub fn entry(&mut self, user_id: &str) -> &mut UserAccount {
        self.accounts.entry(user_id.to_string()).or_default()
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.accounts.contains_key(user_id)
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &UserAccount)> {
        self.accounts.iter()
    }

    /// 当前拥有 `label` 的用户
    pub fn owner_of(&self, label: &str) -> Option<&str> {
        self.accounts
            .iter()
            .find(|(_, account)| account.owns(label))
            .map(|(id, _)| id.as_str())
    }
}
