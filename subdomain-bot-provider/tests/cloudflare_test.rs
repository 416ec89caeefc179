//! Cloudflare Provider 集成测试
//!
//! 运行方式:
//! ```bash
//! CLOUDFLARE_API_TOKEN=xxx CLOUDFLARE_ZONE_ID=xxx TEST_DOMAIN=example.com \
//!     cargo test -p subdomain-bot-provider --test cloudflare_test -- --ignored --nocapture --test-threads=1
//! ```

mod common;

use common::{TestContext, generate_test_label};
use subdomain_bot_provider::{
    CreateDnsRecordRequest, DnsRecordType, ProviderError, UpdateDnsRecordRequest,
};

#[tokio::test]
#[ignore = "integration test: requires CLOUDFLARE_API_TOKEN, CLOUDFLARE_ZONE_ID and TEST_DOMAIN"]
async fn test_cloudflare_list_records() {
    skip_if_no_credentials!("CLOUDFLARE_ZONE_ID", "TEST_DOMAIN");

    let ctx = require_some!(TestContext::cloudflare(), "创建测试上下文失败");
    let records = require_ok!(ctx.provider.list_records().await, "list_records 调用失败");

    assert!(
        records.iter().all(|r| r.name.ends_with(&ctx.base_domain)),
        "所有记录都应属于测试 zone"
    );
    println!("✓ list_records 测试通过，共 {} 条记录", records.len());
}

#[tokio::test]
#[ignore = "integration test: requires CLOUDFLARE_API_TOKEN, CLOUDFLARE_ZONE_ID and TEST_DOMAIN"]
async fn test_cloudflare_a_record_lifecycle() {
    skip_if_no_credentials!("CLOUDFLARE_ZONE_ID", "TEST_DOMAIN");

    let ctx = require_some!(TestContext::cloudflare(), "创建测试上下文失败");
    let name = ctx.fqdn(&generate_test_label());

    // 创建
    let request = CreateDnsRecordRequest::auto(DnsRecordType::A, &name, "192.0.2.1");
    let created = require_ok!(ctx.provider.create_record(&request).await, "create_record 失败");
    assert_eq!(created.name, name);
    assert_eq!(created.content, "192.0.2.1");
    assert!(!created.proxied);

    // 查询
    let fetched = require_ok!(ctx.provider.get_record(&created.id).await, "get_record 失败");
    assert_eq!(fetched.id, created.id);

    // 覆盖更新
    let update = UpdateDnsRecordRequest::replace_content(&fetched, "192.0.2.2");
    let updated = require_ok!(
        ctx.provider.update_record(&created.id, &update).await,
        "update_record 失败"
    );
    assert_eq!(updated.content, "192.0.2.2");
    assert_eq!(updated.name, name);

    // 删除
    require_ok!(ctx.provider.delete_record(&created.id).await, "delete_record 失败");

    let after = ctx.provider.get_record(&created.id).await;
    assert!(after.is_err(), "删除后不应能查询到记录");

    println!("✓ A 记录生命周期测试通过");
}

#[tokio::test]
#[ignore = "integration test: requires CLOUDFLARE_API_TOKEN, CLOUDFLARE_ZONE_ID and TEST_DOMAIN"]
async fn test_cloudflare_batch_delete() {
    skip_if_no_credentials!("CLOUDFLARE_ZONE_ID", "TEST_DOMAIN");

    let ctx = require_some!(TestContext::cloudflare(), "创建测试上下文失败");
    let first = require_some!(ctx.create_test_record().await, "创建测试记录失败");
    let second = require_some!(ctx.create_test_record().await, "创建测试记录失败");

    let ids = vec![first.id.clone(), second.id.clone(), "does-not-exist".to_string()];
    let result = ctx.provider.batch_delete_records(&ids).await;

    assert_eq!(result.success_count, 2);
    assert_eq!(result.failed_count, 1);
    assert_eq!(result.failures[0].record_id, "does-not-exist");

    println!("✓ batch_delete_records 测试通过");
}

#[tokio::test]
#[ignore = "integration test: requires CLOUDFLARE_API_TOKEN, CLOUDFLARE_ZONE_ID and TEST_DOMAIN"]
async fn test_cloudflare_delete_missing_record() {
    skip_if_no_credentials!("CLOUDFLARE_ZONE_ID", "TEST_DOMAIN");

    let ctx = require_some!(TestContext::cloudflare(), "创建测试上下文失败");
    let err = ctx.provider.delete_record("0000000000000000000000000000dead").await;

    assert!(
        matches!(
            err,
            Err(ProviderError::RecordNotFound { .. } | ProviderError::Unknown { .. })
        ),
        "删除不存在的记录应失败: {err:?}"
    );
}

#[tokio::test]
#[ignore = "integration test: requires CLOUDFLARE_API_TOKEN, CLOUDFLARE_ZONE_ID and TEST_DOMAIN"]
async fn test_cloudflare_cleanup() {
    skip_if_no_credentials!("CLOUDFLARE_ZONE_ID", "TEST_DOMAIN");

    let ctx = require_some!(TestContext::cloudflare(), "创建测试上下文失败");
    ctx.cleanup_all_test_records().await;
    println!("✓ 测试记录清理完成");
}
