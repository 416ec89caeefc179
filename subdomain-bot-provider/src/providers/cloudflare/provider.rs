//! Cloudflare DnsProvider trait 实现

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::DnsProvider;
use crate::types::{CreateDnsRecordRequest, DnsRecord, DnsRecordType, UpdateDnsRecordRequest};

use super::error::Subject;
use super::{CloudflareDnsRecord, CloudflareProvider, CloudflareWriteRecord, MAX_PAGE_SIZE_RECORDS};

impl CloudflareProvider {
    /// 将 Cloudflare 记录转换为 `DnsRecord`
    ///
    /// 未知记录类型保留为 `DnsRecordType::Other`，不会导致转换失败。
    pub(crate) fn cf_record_to_dns_record(cf_record: CloudflareDnsRecord) -> DnsRecord {
        DnsRecord {
            id: cf_record.id,
            record_type: DnsRecordType::parse(&cf_record.record_type),
            name: cf_record.name.trim_end_matches('.').to_string(),
            content: cf_record.content,
            ttl: cf_record.ttl,
            proxied: cf_record.proxied.unwrap_or(false),
            priority: cf_record.priority,
        }
    }

    fn records_path(&self) -> String {
        format!("/zones/{}/dns_records", self.zone_id)
    }

    fn record_path(&self, record_id: &str) -> String {
        format!("/zones/{}/dns_records/{record_id}", self.zone_id)
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    fn id(&self) -> &'static str {
        "cloudflare"
    }

    async fn list_records(&self) -> Result<Vec<DnsRecord>> {
        let mut records = Vec::new();
        let mut page = 1;

        loop {
            let path = format!(
                "{}?page={page}&per_page={MAX_PAGE_SIZE_RECORDS}",
                self.records_path()
            );
            let (cf_records, total_pages): (Vec<CloudflareDnsRecord>, u32) =
                self.get_page(&path).await?;
            let fetched = cf_records.len();
            records.extend(cf_records.into_iter().map(Self::cf_record_to_dns_record));

            if fetched == 0 || page >= total_pages {
                break;
            }
            page += 1;
        }

        log::debug!(
            "[cloudflare] Listed {} records in zone {}",
            records.len(),
            self.zone_id
        );
        Ok(records)
    }

    async fn get_record(&self, record_id: &str) -> Result<DnsRecord> {
        let cf_record: CloudflareDnsRecord = self
            .get(&self.record_path(record_id), Subject::RecordId(record_id))
            .await?;
        Ok(Self::cf_record_to_dns_record(cf_record))
    }

    async fn create_record(&self, req: &CreateDnsRecordRequest) -> Result<DnsRecord> {
        let body = CloudflareWriteRecord {
            record_type: req.record_type.as_str(),
            name: &req.name,
            content: &req.content,
            ttl: req.ttl,
            proxied: req.proxied,
            priority: req.priority,
        };

        let cf_record: CloudflareDnsRecord = self
            .post(&self.records_path(), &body, Subject::RecordName(&req.name))
            .await?;

        Ok(Self::cf_record_to_dns_record(cf_record))
    }

    async fn update_record(
        &self,
        record_id: &str,
        req: &UpdateDnsRecordRequest,
    ) -> Result<DnsRecord> {
        let body = CloudflareWriteRecord {
            record_type: req.record_type.as_str(),
            name: &req.name,
            content: &req.content,
            ttl: req.ttl,
            proxied: req.proxied,
            priority: req.priority,
        };

        let cf_record: CloudflareDnsRecord = self
            .put(
                &self.record_path(record_id),
                &body,
                Subject::RecordId(record_id),
            )
            .await?;

        Ok(Self::cf_record_to_dns_record(cf_record))
    }

    async fn delete_record(&self, record_id: &str) -> Result<()> {
        self.delete(&self.record_path(record_id), Subject::RecordId(record_id))
            .await
    }
}
