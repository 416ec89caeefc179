use crate::types::{DnsRecord, DnsRecordType};

/// 会话状态
///
/// 每个状态携带它之后的步骤所需的全部上下文。
/// 选择待编辑 / 删除记录的步骤在 `SelectAction` 中完成取数后直接进入
/// `EditRecordContent` / `ConfirmDelete`，没有独立的停留状态。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// 从拥有的子域名中选择一个（值为标签列表快照）
    SelectDomain { domains: Vec<String> },
    /// 选择操作（1-4）
    SelectAction { domain: String },
    /// 已展示记录列表，等待 `back`
    ListRecords { domain: String },
    /// 选择要创建的记录类型
    CreateRecordType { domain: String },
    /// 输入非 CNAME 记录的值
    CreateRecordName {
        domain: String,
        record_type: DnsRecordType,
    },
    /// 输入 CNAME 目标
    CreateCnameTarget { domain: String },
    /// 确认创建
    ConfirmCreate { domain: String, draft: RecordDraft },
    /// 从列出的记录中选择要删除的一条
    ConfirmDelete {
        domain: String,
        records: Vec<DnsRecord>,
    },
    /// 从列出的记录中选择要编辑的一条
    EditRecordContent {
        domain: String,
        records: Vec<DnsRecord>,
    },
    /// 输入新内容
    ConfirmEdit { domain: String, record_id: String },
}

impl SessionState {
    /// 状态名（日志用）
    pub fn name(&self) -> &'static str {
        match self {
            Self::SelectDomain { .. } => "select_domain",
            Self::SelectAction { .. } => "select_action",
            Self::ListRecords { .. } => "list_records",
            Self::CreateRecordType { .. } => "create_record_type",
            Self::CreateRecordName { .. } => "create_record_name",
            Self::CreateCnameTarget { .. } => "create_cname_target",
            Self::ConfirmCreate { .. } => "confirm_create",
            Self::ConfirmDelete { .. } => "confirm_delete",
            Self::EditRecordContent { .. } => "edit_record_content",
            Self::ConfirmEdit { .. } => "confirm_edit",
        }
    }

    /// 当前会话操作的子域名标签（尚未选择时为 `None`）
    pub fn domain(&self) -> Option<&str> {
        match self {
            Self::SelectDomain { .. } => None,
            Self::SelectAction { domain }
            | Self::ListRecords { domain }
            | Self::CreateRecordType { domain }
            | Self::CreateRecordName { domain, .. }
            | Self::CreateCnameTarget { domain }
            | Self::ConfirmCreate { domain, .. }
            | Self::ConfirmDelete { domain, .. }
            | Self::EditRecordContent { domain, .. }
            | Self::ConfirmEdit { domain, .. } => Some(domain),
        }
    }
}

/// 待创建的记录
///
/// 非 CNAME 类型时，用户输入的值同时作为名称前缀和记录内容；
/// CNAME 记录建在子域名本身上，前缀为空。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDraft {
    pub record_type: DnsRecordType,
    pub prefix: String,
    pub content: String,
}

impl RecordDraft {
    pub fn named(record_type: DnsRecordType, value: &str) -> Self {
        Self {
            record_type,
            prefix: value.to_string(),
            content: value.to_string(),
        }
    }

    pub fn cname(target: &str) -> Self {
        Self {
            record_type: DnsRecordType::Cname,
            prefix: String::new(),
            content: target.to_string(),
        }
    }

    /// 记录全名；`domain_fqdn` 为子域名全名
    pub fn fqdn(&self, domain_fqdn: &str) -> String {
        if self.prefix.is_empty() {
            domain_fqdn.to_string()
        } else {
            format!("{}.{domain_fqdn}", self.prefix)
        }
    }
}
