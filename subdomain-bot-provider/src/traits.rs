use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    BatchDeleteFailure, BatchDeleteResult, CreateDnsRecordRequest, DnsRecord,
    UpdateDnsRecordRequest,
};

/// DNS 提供商 Trait
///
/// 每个实例绑定到一个固定的 zone，所有操作都作用于该 zone。
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// 提供商标识符
    fn id(&self) -> &'static str;

    /// 获取 zone 内全部 DNS 记录（按提供商返回顺序）
    async fn list_records(&self) -> Result<Vec<DnsRecord>>;

    /// 获取单条 DNS 记录
    async fn get_record(&self, record_id: &str) -> Result<DnsRecord>;

    /// 创建 DNS 记录
    async fn create_record(&self, req: &CreateDnsRecordRequest) -> Result<DnsRecord>;

    /// 覆盖更新 DNS 记录
    async fn update_record(
        &self,
        record_id: &str,
        req: &UpdateDnsRecordRequest,
    ) -> Result<DnsRecord>;

    /// 删除 DNS 记录
    async fn delete_record(&self, record_id: &str) -> Result<()>;

    /// 并发删除多条记录
    ///
    /// 单条失败只记入 `failures`，不影响其余记录。
    async fn batch_delete_records(&self, record_ids: &[String]) -> BatchDeleteResult {
        let outcomes =
            futures::future::join_all(record_ids.iter().map(|id| self.delete_record(id))).await;

        let failures: Vec<BatchDeleteFailure> = record_ids
            .iter()
            .zip(outcomes)
            .filter_map(|(id, outcome)| {
                outcome.err().map(|e| BatchDeleteFailure {
                    record_id: id.clone(),
                    reason: e.to_string(),
                })
            })
            .collect();

        BatchDeleteResult {
            success_count: record_ids.len() - failures.len(),
            failed_count: failures.len(),
            failures,
        }
    }
}
