//! 会话状态机

use std::sync::Arc;

use crate::error::{CoreError, CoreResult};
use crate::services::{ServiceContext, belongs_to};
use crate::session::replies;
use crate::session::state::{RecordDraft, SessionState};
use crate::types::{
    CreateDnsRecordRequest, DnsRecord, DnsRecordType, Reply, UpdateDnsRecordRequest,
};
use crate::utils::validation::{valid_hostname, valid_ip};

/// 处理一条输入后的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// 进入下一个状态
    Advance(SessionState, Reply),
    /// 输入无效，停留在当前状态
    Retry(SessionState, Reply),
    /// 会话正常结束（包括用户取消）
    Complete(Reply),
    /// 会话因错误结束
    Abort(Reply),
}

impl Transition {
    pub fn reply(&self) -> &Reply {
        match self {
            Self::Advance(_, reply)
            | Self::Retry(_, reply)
            | Self::Complete(reply)
            | Self::Abort(reply) => reply,
        }
    }

    /// 会话是否到此结束
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete(_) | Self::Abort(_))
    }
}

/// 解析 1 起始的编号
fn pick_index(input: &str, len: usize) -> Option<usize> {
    input
        .parse::<usize>()
        .ok()
        .filter(|n| (1..=len).contains(n))
        .map(|n| n - 1)
}

/// 会话状态机
///
/// 纯粹的 `(状态, 输入) -> 转移`，需要时调用 DNS Provider；
/// 会话表由 [`SessionManager`](super::SessionManager) 维护。
pub struct SessionEngine {
    ctx: Arc<ServiceContext>,
}

impl SessionEngine {
    #[must_use]
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        Self { ctx }
    }

    /// 处理一条私信输入
    pub async fn step(&self, state: SessionState, input: &str) -> Transition {
        let input = input.trim();
        if input.eq_ignore_ascii_case("cancel") {
            return Transition::Complete(replies::cancelled());
        }

        match state {
            SessionState::SelectDomain { domains } => self.select_domain(domains, input),
            SessionState::SelectAction { domain } => self.select_action(domain, input).await,
            SessionState::ListRecords { domain } => self.navigate_listing(domain, input),
            SessionState::CreateRecordType { domain } => Self::choose_record_type(domain, input),
            SessionState::CreateRecordName {
                domain,
                record_type,
            } => Self::enter_record_value(domain, record_type, input),
            SessionState::CreateCnameTarget { domain } => Self::enter_cname_target(domain, input),
            SessionState::ConfirmCreate { domain, draft } => {
                self.confirm_create(&domain, &draft, input).await
            }
            SessionState::ConfirmDelete { domain, records } => {
                self.confirm_delete(domain, records, input).await
            }
            SessionState::EditRecordContent { domain, records } => {
                Self::choose_record_to_edit(domain, records, input)
            }
            SessionState::ConfirmEdit { domain, record_id } => {
                self.confirm_edit(domain, record_id, input).await
            }
        }
    }

    /// 子域名下的全部记录（按 provider 顺序）
    async fn domain_records(&self, domain: &str) -> CoreResult<Vec<DnsRecord>> {
        let fqdn = self.ctx.settings.fqdn(domain);
        let records = self
            .ctx
            .provider
            .list_records()
            .await
            .map_err(CoreError::from_provider_read)?;
        Ok(records
            .into_iter()
            .filter(|record| belongs_to(&record.name, &fqdn))
            .collect())
    }

    // ===== 导航 =====

    fn select_domain(&self, domains: Vec<String>, input: &str) -> Transition {
        let Some(index) = pick_index(input, domains.len()) else {
            return Transition::Retry(
                SessionState::SelectDomain { domains },
                replies::invalid_selection(),
            );
        };
        let domain = domains[index].clone();
        log::debug!("Session selected subdomain {domain}");
        let reply = replies::action_menu(&self.ctx.settings.fqdn(&domain));
        Transition::Advance(SessionState::SelectAction { domain }, reply)
    }

    async fn select_action(&self, domain: String, input: &str) -> Transition {
        let fqdn = self.ctx.settings.fqdn(&domain);
        match input {
            "1" => match self.domain_records(&domain).await {
                Ok(records) => {
                    let reply = replies::record_listing(&fqdn, &records, &self.ctx.settings);
                    Transition::Advance(SessionState::ListRecords { domain }, reply)
                }
                Err(e) => Self::abort_fetch(&fqdn, &e),
            },
            "2" => Transition::Advance(
                SessionState::CreateRecordType { domain },
                replies::type_menu(&fqdn),
            ),
            "3" => match self.domain_records(&domain).await {
                Ok(records) if records.is_empty() => {
                    Transition::Complete(replies::no_records(&fqdn))
                }
                Ok(records) => {
                    let reply = replies::edit_picker(&fqdn, &records, &self.ctx.settings);
                    Transition::Advance(SessionState::EditRecordContent { domain, records }, reply)
                }
                Err(e) => Self::abort_fetch(&fqdn, &e),
            },
            "4" => match self.domain_records(&domain).await {
                Ok(records) if records.is_empty() => {
                    Transition::Complete(replies::no_records(&fqdn))
                }
                Ok(records) => {
                    let reply = replies::delete_picker(&fqdn, &records, &self.ctx.settings);
                    Transition::Advance(SessionState::ConfirmDelete { domain, records }, reply)
                }
                Err(e) => Self::abort_fetch(&fqdn, &e),
            },
            _ => Transition::Retry(
                SessionState::SelectAction { domain },
                replies::invalid_action(),
            ),
        }
    }

    fn navigate_listing(&self, domain: String, input: &str) -> Transition {
        if input.eq_ignore_ascii_case("back") {
            let reply = replies::action_menu(&self.ctx.settings.fqdn(&domain));
            return Transition::Advance(SessionState::SelectAction { domain }, reply);
        }
        Transition::Retry(SessionState::ListRecords { domain }, replies::navigation_hint())
    }

    fn abort_fetch(fqdn: &str, e: &CoreError) -> Transition {
        log::error!("Failed to fetch records for {fqdn}: {e}");
        Transition::Abort(replies::fetch_failed(&e.to_string()))
    }

    // ===== 创建 =====

    fn choose_record_type(domain: String, input: &str) -> Transition {
        let Some(index) = pick_index(input, DnsRecordType::MANAGED.len()) else {
            return Transition::Retry(
                SessionState::CreateRecordType { domain },
                replies::invalid_selection(),
            );
        };
        let record_type = DnsRecordType::MANAGED[index].clone();
        if record_type == DnsRecordType::Cname {
            return Transition::Advance(
                SessionState::CreateCnameTarget { domain },
                replies::prompt_cname_target(),
            );
        }
        let reply = replies::prompt_record_value(&record_type);
        Transition::Advance(
            SessionState::CreateRecordName {
                domain,
                record_type,
            },
            reply,
        )
    }

    fn enter_record_value(domain: String, record_type: DnsRecordType, input: &str) -> Transition {
        if record_type.is_address() && !valid_ip(input) {
            return Transition::Retry(
                SessionState::CreateRecordName {
                    domain,
                    record_type,
                },
                replies::invalid_ip(),
            );
        }
        let reply = replies::confirm_named(&record_type, input);
        Transition::Advance(
            SessionState::ConfirmCreate {
                domain,
                draft: RecordDraft::named(record_type, input),
            },
            reply,
        )
    }

    fn enter_cname_target(domain: String, input: &str) -> Transition {
        if !valid_hostname(input) {
            return Transition::Retry(
                SessionState::CreateCnameTarget { domain },
                replies::invalid_target(),
            );
        }
        Transition::Advance(
            SessionState::ConfirmCreate {
                domain,
                draft: RecordDraft::cname(input),
            },
            replies::confirm_cname(input),
        )
    }

    async fn confirm_create(&self, domain: &str, draft: &RecordDraft, input: &str) -> Transition {
        if !input.eq_ignore_ascii_case("yes") {
            return Transition::Complete(replies::creation_cancelled());
        }

        let name = draft.fqdn(&self.ctx.settings.fqdn(domain));
        let request = CreateDnsRecordRequest::auto(
            draft.record_type.clone(),
            name.clone(),
            draft.content.clone(),
        );
        match self.ctx.provider.create_record(&request).await {
            Ok(_) => {
                log::info!("Created {} record {name}", draft.record_type);
                Transition::Complete(replies::record_created(&draft.record_type, &name))
            }
            Err(e) => {
                log::warn!("Failed to create {} record {name}: {e}", draft.record_type);
                Transition::Complete(replies::creation_failed(&e.to_string()))
            }
        }
    }

    // ===== 删除 =====

    async fn confirm_delete(
        &self,
        domain: String,
        records: Vec<DnsRecord>,
        input: &str,
    ) -> Transition {
        let Some(index) = pick_index(input, records.len()) else {
            return Transition::Retry(
                SessionState::ConfirmDelete { domain, records },
                replies::invalid_selection(),
            );
        };
        let record = &records[index];
        match self.ctx.provider.delete_record(&record.id).await {
            Ok(()) => {
                log::info!("Deleted record {} ({})", record.name, record.id);
                Transition::Complete(replies::record_deleted(&record.name))
            }
            Err(e) => {
                log::warn!("Failed to delete record {}: {e}", record.id);
                Transition::Complete(replies::deletion_failed(&e.to_string()))
            }
        }
    }

    // ===== 编辑 =====

    fn choose_record_to_edit(domain: String, records: Vec<DnsRecord>, input: &str) -> Transition {
        let Some(index) = pick_index(input, records.len()) else {
            return Transition::Retry(
                SessionState::EditRecordContent { domain, records },
                replies::invalid_selection(),
            );
        };
        let record = &records[index];
        let reply = replies::prompt_new_content(&record.record_type);
        Transition::Advance(
            SessionState::ConfirmEdit {
                domain,
                record_id: record.id.clone(),
            },
            reply,
        )
    }

    async fn confirm_edit(&self, domain: String, record_id: String, input: &str) -> Transition {
        let record = match self.ctx.provider.get_record(&record_id).await {
            Ok(record) => record,
            Err(e) => {
                log::warn!("Failed to fetch record {record_id} for edit: {e}");
                return Transition::Abort(replies::record_fetch_failed(&e.to_string()));
            }
        };

        let invalid = match record.record_type {
            DnsRecordType::A | DnsRecordType::Aaaa if !valid_ip(input) => Some(replies::invalid_ip()),
            DnsRecordType::Cname if !valid_hostname(input) => {
                Some(replies::invalid_hostname())
            }
            _ => None,
        };
        if let Some(reply) = invalid {
            return Transition::Retry(SessionState::ConfirmEdit { domain, record_id }, reply);
        }

        let request = UpdateDnsRecordRequest::replace_content(&record, input);
        match self.ctx.provider.update_record(&record_id, &request).await {
            Ok(_) => {
                log::info!("Updated {} record {}", record.record_type, record.name);
                Transition::Complete(replies::record_updated(&record.record_type, &record.name))
            }
            Err(e) => {
                log::warn!("Failed to update record {record_id}: {e}");
                Transition::Complete(replies::update_failed(&e.to_string()))
            }
        }
    }
}
