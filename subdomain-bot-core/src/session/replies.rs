//! 会话中发给用户的回复

use crate::services::BotSettings;
use crate::types::{DnsRecord, DnsRecordType, Reply};

const CANCEL_FOOTER: &str = "Type 'cancel' to exit";
const CONFIRM_FOOTER: &str = "Type 'yes' to confirm or 'no' to cancel";
const SELECT_FOOTER: &str = "Type the number to select or 'cancel' to exit";

const ACTIONS: [(&str, &str); 4] = [
    ("1. List Records", "View all DNS records for this domain"),
    ("2. Add Record", "Create a new DNS record"),
    ("3. Edit Record", "Modify an existing DNS record"),
    ("4. Delete Record", "Remove a DNS record"),
];

fn type_description(record_type: &DnsRecordType) -> &'static str {
    match record_type {
        DnsRecordType::A => "Maps a domain to an IPv4 address",
        DnsRecordType::Aaaa => "Maps a domain to an IPv6 address",
        DnsRecordType::Cname => "Creates an alias pointing to another domain",
        DnsRecordType::Txt => "Stores text information (e.g., verification)",
        DnsRecordType::Mx => "Specifies mail servers for the domain",
        DnsRecordType::Srv => "Specifies location of services",
        DnsRecordType::Other(_) => "Other record type",
    }
}

// ===== 导航 =====

pub fn no_subdomains() -> Reply {
    Reply::error(
        "No Subdomains",
        "You don't have any subdomains yet.\nUse `create_subdomain name` to create one first.",
    )
}

pub fn domain_menu(domains: &[String], settings: &BotSettings) -> Reply {
    domains
        .iter()
        .enumerate()
        .fold(
            Reply::info(
                "DNS Record Management",
                "Please select a subdomain to manage by typing its number:",
            ),
            |reply, (i, label)| {
                reply.field(
                    format!("{}. {}", i + 1, settings.fqdn(label)),
                    "Type the number to select",
                )
            },
        )
        .footer("Type 'cancel' at any time to exit")
}

pub fn action_menu(domain_fqdn: &str) -> Reply {
    ACTIONS
        .iter()
        .fold(
            Reply::info(
                format!("Managing {domain_fqdn}"),
                "What would you like to do?",
            ),
            |reply, (name, value)| reply.field(*name, *value),
        )
        .footer(CANCEL_FOOTER)
}

pub fn invalid_selection() -> Reply {
    Reply::error(
        "Invalid Selection",
        "Please enter a valid number from the list.",
    )
}

pub fn invalid_action() -> Reply {
    Reply::error("Invalid Selection", "Please enter a number between 1 and 4.")
}

pub fn navigation_hint() -> Reply {
    Reply::info(
        "Navigation",
        "Type 'back' to return to the main menu or 'cancel' to exit.",
    )
}

pub fn cancelled() -> Reply {
    Reply::success("Cancelled", "DNS record management cancelled.")
}

pub fn unexpected_error(detail: &str) -> Reply {
    Reply::error(
        "Error",
        format!("An error occurred while processing your request: {detail}"),
    )
}

// ===== 记录列表 =====

pub fn fetch_failed(detail: &str) -> Reply {
    Reply::error(
        "API Error",
        format!("Failed to fetch DNS records. {detail}"),
    )
}

pub fn no_records(domain_fqdn: &str) -> Reply {
    Reply::error("No Records", format!("No DNS records found for {domain_fqdn}."))
}

fn record_details(record: &DnsRecord) -> String {
    let ttl = if record.is_auto_ttl() {
        "Auto".to_string()
    } else {
        record.ttl.to_string()
    };
    let mut value = format!(
        "Content: {}\nProxied: {}\nTTL: {ttl}",
        record.content,
        if record.proxied { "Yes" } else { "No" }
    );
    if record.record_type == DnsRecordType::Mx {
        let priority = record
            .priority
            .map_or_else(|| "N/A".to_string(), |p| p.to_string());
        value.push_str(&format!("\nPriority: {priority}"));
    }
    value
}

pub fn record_listing(domain_fqdn: &str, records: &[DnsRecord], settings: &BotSettings) -> Reply {
    if records.is_empty() {
        return Reply::info("DNS Records", format!("No DNS records found for {domain_fqdn}."))
            .field("Add Record", "Type 'back' and then '2' to add a new record")
            .footer("Type 'back' to return to action selection or 'cancel' to exit");
    }

    records
        .iter()
        .fold(
            Reply::info("DNS Records", format!("Records for {domain_fqdn}:")),
            |reply, record| {
                reply.field(
                    format!(
                        "{}: {}",
                        record.record_type,
                        settings.relative_name(&record.name)
                    ),
                    record_details(record),
                )
            },
        )
        .footer("Type 'back' to return to action selection or 'cancel' to exit")
}

/// 编号的记录选择菜单（编辑 / 删除共用）
fn record_picker(title: &str, description: String, records: &[DnsRecord], settings: &BotSettings) -> Reply {
    records
        .iter()
        .enumerate()
        .fold(Reply::info(title, description), |reply, (i, record)| {
            reply.field(
                format!(
                    "{}. {}: {}",
                    i + 1,
                    record.record_type,
                    settings.relative_name(&record.name)
                ),
                format!("Content: {}", record.content),
            )
        })
        .footer(SELECT_FOOTER)
}

// ===== 创建 =====

pub fn type_menu(domain_fqdn: &str) -> Reply {
    DnsRecordType::MANAGED
        .iter()
        .enumerate()
        .fold(
            Reply::info(
                "Create DNS Record",
                format!("Select the record type for {domain_fqdn}:"),
            ),
            |reply, (i, record_type)| {
                reply.field(
                    format!("{}. {record_type}", i + 1),
                    type_description(record_type),
                )
            },
        )
        .footer(CANCEL_FOOTER)
}

pub fn prompt_cname_target() -> Reply {
    Reply::info(
        "Create DNS Record",
        "Enter the target domain for the CNAME record (e.g., `google.com`):",
    )
    .footer(CANCEL_FOOTER)
}

pub fn prompt_record_value(record_type: &DnsRecordType) -> Reply {
    Reply::info(
        "Create DNS Record",
        format!("Enter the name for the {record_type} record (leave blank for the root domain):"),
    )
    .footer(CANCEL_FOOTER)
}

pub fn invalid_ip() -> Reply {
    Reply::error("Invalid IP", "The provided IP address is invalid.")
}

pub fn invalid_target() -> Reply {
    Reply::error("Invalid Hostname", "The provided target domain is invalid.")
}

pub fn invalid_hostname() -> Reply {
    Reply::error("Invalid Hostname", "The provided hostname is invalid.")
}

pub fn confirm_named(record_type: &DnsRecordType, value: &str) -> Reply {
    Reply::info(
        "Create DNS Record",
        format!("Please confirm the creation of the {record_type} record with the following details:"),
    )
    .field("Type", record_type.as_str())
    .field("Name", value)
    .footer(CONFIRM_FOOTER)
}

pub fn confirm_cname(target: &str) -> Reply {
    Reply::info(
        "Create DNS Record",
        "Please confirm the creation of the CNAME record with the following details:",
    )
    .field("Type", "CNAME")
    .field("Target Domain", target)
    .footer(CONFIRM_FOOTER)
}

pub fn record_created(record_type: &DnsRecordType, name: &str) -> Reply {
    Reply::success(
        "Record Created",
        format!("Successfully created the {record_type} record for {name}."),
    )
}

pub fn creation_failed(detail: &str) -> Reply {
    Reply::error(
        "Creation Failed",
        format!("Failed to create the record. API Error: {detail}"),
    )
}

pub fn creation_cancelled() -> Reply {
    Reply::info("Cancelled", "Record creation cancelled.")
}

// ===== 删除 =====

pub fn delete_picker(domain_fqdn: &str, records: &[DnsRecord], settings: &BotSettings) -> Reply {
    record_picker(
        "Delete DNS Record",
        format!("Select a record to delete for {domain_fqdn}:"),
        records,
        settings,
    )
}

pub fn record_deleted(name: &str) -> Reply {
    Reply::success(
        "Record Deleted",
        format!("Successfully deleted the record for {name}."),
    )
}

pub fn deletion_failed(detail: &str) -> Reply {
    Reply::error(
        "Deletion Failed",
        format!("Failed to delete the record. API Error: {detail}"),
    )
}

// ===== 编辑 =====

pub fn edit_picker(domain_fqdn: &str, records: &[DnsRecord], settings: &BotSettings) -> Reply {
    record_picker(
        "Edit DNS Record",
        format!("Select a record to edit for {domain_fqdn}:"),
        records,
        settings,
    )
}

pub fn prompt_new_content(record_type: &DnsRecordType) -> Reply {
    Reply::info(
        "Edit DNS Record",
        format!("Enter the new content for the {record_type} record:"),
    )
    .footer(CANCEL_FOOTER)
}

pub fn record_fetch_failed(detail: &str) -> Reply {
    Reply::error(
        "API Error",
        format!("Failed to fetch the DNS record. {detail}"),
    )
}

pub fn record_updated(record_type: &DnsRecordType, name: &str) -> Reply {
    Reply::success(
        "Record Updated",
        format!("Successfully updated the {record_type} record for {name}."),
    )
}

pub fn update_failed(detail: &str) -> Reply {
    Reply::error(
        "Update Failed",
        format!("Failed to update the record. API Error: {detail}"),
    )
}
