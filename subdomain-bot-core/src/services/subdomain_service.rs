//! 子域名与积分服务

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use rand::distr::Alphanumeric;
use tokio::sync::mpsc;

use crate::error::{CoreError, CoreResult};
use crate::services::{ServiceContext, belongs_to};
use crate::types::{
    Actor, BatchDeleteResult, CreateDnsRecordRequest, DnsRecordType, Reply, UserAccount,
};
use crate::utils::validation::valid_subdomain_label;

/// `reset_all` 确认串长度
const RESET_TOKEN_LEN: usize = 10;

/// 成功创建的子域名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedSubdomain {
    pub label: String,
    pub fqdn: String,
    /// 占位 A 记录指向的地址
    pub address: String,
    /// 扣费后的余额
    pub remaining_credits: u64,
}

/// 删除子域名的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalReport {
    pub label: String,
    pub fqdn: String,
    /// 匹配到的远端记录数
    pub matched: usize,
    pub deleted: usize,
    pub failed: usize,
}

impl RemovalReport {
    /// 远端是否有该子域名的记录
    pub fn found_remote_records(&self) -> bool {
        self.matched > 0
    }
}

/// 等待管理员回显的确认串
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetChallenge {
    pub token: String,
    pub window: Duration,
}

/// 子域名与积分服务
pub struct SubdomainService {
    ctx: Arc<ServiceContext>,
}

impl SubdomainService {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    // ===== 账户 =====

    /// 获取账户，不存在时创建并持久化（余额 0，无子域名）
    pub async fn get_or_create_account(&self, user_id: &str) -> UserAccount {
        let mut tx = self.ctx.ledger.begin().await;
        if let Some(account) = tx.account(user_id) {
            return account.clone();
        }
        let account = tx.account_mut(user_id).clone();
        tx.commit().await;
        account
    }

    /// 用户拥有的子域名（按创建顺序），不会创建账户
    pub async fn owned_subdomains(&self, user_id: &str) -> Vec<String> {
        self.ctx
            .ledger
            .account(user_id)
            .await
            .map(|account| account.subdomains)
            .unwrap_or_default()
    }

    /// 调整余额，返回新余额
    ///
    /// 结果为负时返回 `InsufficientCredits` 且不修改账本。
    pub async fn adjust_credits(&self, user_id: &str, delta: i64) -> CoreResult<u64> {
        let mut tx = self.ctx.ledger.begin().await;
        let available = tx.account(user_id).map_or(0, |account| account.credits);

        let balance = if delta >= 0 {
            available.checked_add(delta.unsigned_abs()).ok_or_else(|| {
                CoreError::ValidationError(format!("Credit balance overflow for user {user_id}"))
            })?
        } else {
            let required = delta.unsigned_abs();
            available
                .checked_sub(required)
                .ok_or(CoreError::InsufficientCredits {
                    required,
                    available,
                })?
        };

        tx.account_mut(user_id).credits = balance;
        tx.commit().await;

        log::info!("Adjusted credits for user {user_id} by {delta}: {available} -> {balance}");
        Ok(balance)
    }

    // ===== 子域名 =====

    /// 购买子域名
    ///
    /// 账本锁只在检查和扣费时持有，provider 调用期间由标签预留防止重复购买。
    /// 只有 provider 成功创建占位记录后才扣费并登记；扣费前余额已不足时
    /// 删除刚创建的占位记录。
    pub async fn create_subdomain(
        &self,
        user_id: &str,
        label: &str,
    ) -> CoreResult<CreatedSubdomain> {
        let settings = &self.ctx.settings;

        if !valid_subdomain_label(label) {
            return Err(CoreError::InvalidName(label.to_string()));
        }
        let fqdn = settings.fqdn(label);

        let (owned, _reservation) = {
            let tx = self.ctx.ledger.begin().await;
            if tx.ledger().owner_of(label).is_some() {
                return Err(CoreError::AlreadyExists(fqdn));
            }

            let account = tx.account(user_id).cloned().unwrap_or_default();
            if account.credits < settings.subdomain_cost {
                return Err(CoreError::InsufficientCredits {
                    required: settings.subdomain_cost,
                    available: account.credits,
                });
            }

            let Some(reservation) = self.ctx.ledger.reserve(label) else {
                return Err(CoreError::AlreadyExists(fqdn));
            };
            (account.subdomains, reservation)
        };

        let records = self.ctx.provider.list_records().await.map_err(|e| {
            log::error!("Failed to list zone records while creating {fqdn}: {e}");
            CoreError::ProviderUnavailable(e.to_string())
        })?;

        if records.iter().any(|record| record.name == fqdn) {
            return Err(CoreError::AlreadyExists(fqdn));
        }

        // 纯字符串前缀比较：拥有 foo 时 foobar 也会被拒绝
        let shadows_owned = owned
            .iter()
            .any(|existing| fqdn.starts_with(existing.as_str()));
        if shadows_owned || label == settings.base_domain {
            return Err(CoreError::InvalidSubdomain(fqdn));
        }

        let request = CreateDnsRecordRequest::auto(
            DnsRecordType::A,
            fqdn.clone(),
            settings.placeholder_address.clone(),
        );
        let placeholder = match self.ctx.provider.create_record(&request).await {
            Ok(record) => record,
            Err(e) => {
                log::error!("Failed to create placeholder record for {fqdn}: {e}");
                return Err(e.into());
            }
        };

        let mut tx = self.ctx.ledger.begin().await;
        let available = tx.account(user_id).map_or(0, |account| account.credits);
        if available < settings.subdomain_cost {
            drop(tx);
            log::warn!("Balance of user {user_id} changed while creating {fqdn}, rolling back");
            if let Err(e) = self.ctx.provider.delete_record(&placeholder.id).await {
                log::error!("Failed to roll back placeholder record for {fqdn}: {e}");
            }
            return Err(CoreError::InsufficientCredits {
                required: settings.subdomain_cost,
                available,
            });
        }

        let account = tx.account_mut(user_id);
        account.credits -= settings.subdomain_cost;
        account.subdomains.push(label.to_string());
        let remaining_credits = account.credits;
        tx.commit().await;

        log::info!("User {user_id} created subdomain {fqdn}, {remaining_credits} credit(s) left");
        Ok(CreatedSubdomain {
            label: label.to_string(),
            fqdn,
            address: settings.placeholder_address.clone(),
            remaining_credits,
        })
    }

    /// 管理员删除用户的子域名及其全部远端记录
    ///
    /// 远端删除部分失败时仍然从账本中移除该标签。provider 调用期间不持有账本锁。
    pub async fn remove_subdomain(
        &self,
        actor: &Actor,
        target_user_id: &str,
        label: &str,
    ) -> CoreResult<RemovalReport> {
        if !actor.is_admin {
            return Err(CoreError::PermissionDenied(
                "remove_subdomain requires administrator".to_string(),
            ));
        }

        if !self
            .ctx
            .ledger
            .account(target_user_id)
            .await
            .is_some_and(|account| account.owns(label))
        {
            return Err(CoreError::NotFound(format!(
                "{label} is not owned by user {target_user_id}"
            )));
        }

        let fqdn = self.ctx.settings.fqdn(label);
        let records = self
            .ctx
            .provider
            .list_records()
            .await
            .map_err(CoreError::from_provider_read)?;

        let record_ids: Vec<String> = records
            .into_iter()
            .filter(|record| belongs_to(&record.name, &fqdn))
            .map(|record| record.id)
            .collect();

        let result = if record_ids.is_empty() {
            log::warn!("No DNS records found for {fqdn}, removing from ledger only");
            BatchDeleteResult::default()
        } else {
            self.ctx.provider.batch_delete_records(&record_ids).await
        };
        for failure in &result.failures {
            log::warn!(
                "Failed to delete record {} of {fqdn}: {}",
                failure.record_id,
                failure.reason
            );
        }

        let mut tx = self.ctx.ledger.begin().await;
        if tx
            .account(target_user_id)
            .is_some_and(|account| account.owns(label))
        {
            tx.account_mut(target_user_id).release(label);
            tx.commit().await;
        }

        log::info!(
            "Administrator {} removed {fqdn} from user {target_user_id}",
            actor.user_id
        );

        if target_user_id != actor.user_id {
            let notice = Reply::warning(
                "Subdomain Removed",
                format!("An administrator has removed your subdomain {fqdn}."),
            );
            if let Err(e) = self.ctx.gateway.send_direct(target_user_id, &notice).await {
                log::debug!("Could not notify user {target_user_id}: {e}");
            }
        }

        Ok(RemovalReport {
            label: label.to_string(),
            fqdn,
            matched: record_ids.len(),
            deleted: result.success_count,
            failed: result.failed_count,
        })
    }

    // ===== 重置 =====

    /// 生成 `reset_all` 的确认串
    pub fn reset_challenge(&self, actor: &Actor) -> CoreResult<ResetChallenge> {
        if !actor.is_admin {
            return Err(CoreError::PermissionDenied(
                "reset_all requires administrator".to_string(),
            ));
        }
        let token: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(RESET_TOKEN_LEN)
            .map(char::from)
            .collect();
        Ok(ResetChallenge {
            token,
            window: self.ctx.settings.reset_confirmation_window,
        })
    }

    /// 等待确认串后清空账本
    ///
    /// `replies` 传入发起者之后发送的每条消息（任意频道）。
    /// 只有与确认串完全相同的消息才算确认。
    pub async fn reset_all(
        &self,
        challenge: &ResetChallenge,
        replies: &mut mpsc::Receiver<String>,
    ) -> CoreResult<usize> {
        let confirmed = tokio::time::timeout(challenge.window, async {
            while let Some(message) = replies.recv().await {
                if message == challenge.token {
                    return true;
                }
            }
            false
        })
        .await
        .unwrap_or(false);

        if !confirmed {
            return Err(CoreError::Timeout(
                "Confirmation string not entered in time".to_string(),
            ));
        }

        let mut tx = self.ctx.ledger.begin().await;
        let cleared = tx.ledger().len();
        tx.clear();
        tx.commit().await;

        log::warn!("Ledger reset, {cleared} account(s) cleared");
        Ok(cleared)
    }
}
