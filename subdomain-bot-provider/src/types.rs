use serde::{Deserialize, Serialize};

/// TTL value meaning "automatic" (the provider picks the TTL).
pub const TTL_AUTO: u32 = 1;

// ============ Record Types ============

/// DNS record type.
///
/// The six managed types can be created through the bot. Any other type found
/// in the zone (NS, CAA, ...) is carried as [`Other`](Self::Other) so listings
/// never fail on records the bot does not manage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum DnsRecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Canonical name (alias) record.
    Cname,
    /// Text record.
    Txt,
    /// Mail exchange record.
    Mx,
    /// Service locator record.
    Srv,
    /// A type the bot does not manage, kept verbatim (upper-cased).
    Other(String),
}

impl DnsRecordType {
    /// Record types offered for creation, in menu order.
    pub const MANAGED: [Self; 6] = [
        Self::A,
        Self::Aaaa,
        Self::Cname,
        Self::Txt,
        Self::Mx,
        Self::Srv,
    ];

    /// Upper-case wire name (`"A"`, `"AAAA"`, ...).
    pub fn as_str(&self) -> &str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Txt => "TXT",
            Self::Mx => "MX",
            Self::Srv => "SRV",
            Self::Other(name) => name,
        }
    }

    /// Parse a wire name, case-insensitively.
    pub fn parse(record_type: &str) -> Self {
        match record_type.to_uppercase().as_str() {
            "A" => Self::A,
            "AAAA" => Self::Aaaa,
            "CNAME" => Self::Cname,
            "TXT" => Self::Txt,
            "MX" => Self::Mx,
            "SRV" => Self::Srv,
            other => Self::Other(other.to_string()),
        }
    }

    /// Whether the record's content must be an IP literal.
    pub fn is_address(&self) -> bool {
        matches!(self, Self::A | Self::Aaaa)
    }
}

impl std::fmt::Display for DnsRecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<DnsRecordType> for String {
    fn from(value: DnsRecordType) -> Self {
        value.as_str().to_string()
    }
}

impl From<String> for DnsRecordType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

// ============ Records ============

/// A DNS record as held by the provider.
///
/// `name` is always the fully-qualified domain name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    /// Provider-specific record identifier.
    pub id: String,
    /// Record type.
    #[serde(rename = "type")]
    pub record_type: DnsRecordType,
    /// Fully-qualified record name (e.g., `"www.foo.example.com"`).
    pub name: String,
    /// Record content (address, target, text, ...).
    pub content: String,
    /// TTL in seconds; [`TTL_AUTO`] means automatic.
    pub ttl: u32,
    /// Whether traffic is proxied through the provider.
    pub proxied: bool,
    /// MX priority, when the provider reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
}

impl DnsRecord {
    /// Whether the TTL is left to the provider.
    pub fn is_auto_ttl(&self) -> bool {
        self.ttl == TTL_AUTO
    }
}

/// Request to create a DNS record (a [`DnsRecord`] without its id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDnsRecordRequest {
    /// Record type.
    #[serde(rename = "type")]
    pub record_type: DnsRecordType,
    /// Fully-qualified record name.
    pub name: String,
    /// Record content.
    pub content: String,
    /// TTL in seconds; [`TTL_AUTO`] means automatic.
    pub ttl: u32,
    /// Whether traffic is proxied through the provider.
    pub proxied: bool,
    /// MX priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
}

impl CreateDnsRecordRequest {
    /// Unproxied record with automatic TTL, the shape every bot-created record uses.
    pub fn auto(
        record_type: DnsRecordType,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            record_type,
            name: name.into(),
            content: content.into(),
            ttl: TTL_AUTO,
            proxied: false,
            priority: None,
        }
    }
}

/// Request to overwrite a DNS record.
///
/// All fields are sent; the provider replaces the record wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDnsRecordRequest {
    /// Record type.
    #[serde(rename = "type")]
    pub record_type: DnsRecordType,
    /// Fully-qualified record name.
    pub name: String,
    /// Record content.
    pub content: String,
    /// TTL in seconds; [`TTL_AUTO`] means automatic.
    pub ttl: u32,
    /// Whether traffic is proxied through the provider.
    pub proxied: bool,
    /// MX priority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
}

impl UpdateDnsRecordRequest {
    /// Keep everything about `record` except its content.
    pub fn replace_content(record: &DnsRecord, content: impl Into<String>) -> Self {
        Self {
            record_type: record.record_type.clone(),
            name: record.name.clone(),
            content: content.into(),
            ttl: record.ttl,
            proxied: record.proxied,
            priority: record.priority,
        }
    }
}

// ============ Batch Results ============

/// A single record that failed to delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchDeleteFailure {
    /// Record ID that failed.
    pub record_id: String,
    /// Human-readable failure reason.
    pub reason: String,
}

/// Outcome of deleting several records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchDeleteResult {
    /// Number of records successfully deleted.
    pub success_count: usize,
    /// Number of records that failed to delete.
    pub failed_count: usize,
    /// Per-record failure details.
    pub failures: Vec<BatchDeleteFailure>,
}
