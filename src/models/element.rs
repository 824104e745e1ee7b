use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Element is the unit stored by the registry: a network, an endpoint, or a connection.
///
/// The common fields live here; variant-specific fields live in [`ElementKind`],
/// which is flattened into the same JSON object and discriminated by `elem_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(with = "super::timestamp")]
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub data: String,
    #[serde(flatten)]
    pub kind: ElementKind,
}

/// Variant-specific element fields, tagged by `elem_type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "elem_type", rename_all = "snake_case")]
pub enum ElementKind {
    Network {
        cidr_block: String,
    },
    Endpoint {
        endpoint_type: EndpointType,
        os_type: OsType,
        network: String,
        interfaces: Vec<Interface>,
    },
    Connection {
        interface_from: String,
        interface_to: String,
        line_type: LineType,
    },
}

/// Interface is a network attachment point belonging to an endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interface {
    pub label: String,
    pub interface_id: String,
    pub ipv4: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<String>,
    pub mac: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointType {
    Router,
    Switch,
    Firewall,
    Wap,
    Workstation,
    Server,
    IcsDevice,
    IotDevice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OsType {
    Linux,
    Windows,
    Macosx,
    Android,
    Ios,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    Solid,
    Dashed,
}

/// Canonical element colors used by the generator
pub mod element_color {
    pub const NETWORK: &str = "red";
    pub const ENDPOINT: &str = "gray";
    pub const CONNECTION: &str = "orange";
}

impl Element {
    /// Resource path under which the registry exposes this element
    pub fn resource_path(&self) -> String {
        resource_path(&self.id)
    }

    /// Short variant name, matching the wire `elem_type`
    pub fn elem_type(&self) -> &'static str {
        match self.kind {
            ElementKind::Network { .. } => "network",
            ElementKind::Endpoint { .. } => "endpoint",
            ElementKind::Connection { .. } => "connection",
        }
    }

    pub fn is_endpoint(&self) -> bool {
        matches!(self.kind, ElementKind::Endpoint { .. })
    }

    /// Interfaces of an endpoint; empty for the other variants
    pub fn interfaces(&self) -> &[Interface] {
        match &self.kind {
            ElementKind::Endpoint { interfaces, .. } => interfaces,
            _ => &[],
        }
    }

    /// IPv4 address of the endpoint's first interface, if any
    pub fn primary_ipv4(&self) -> Option<&str> {
        self.interfaces().first().map(|i| i.ipv4.as_str())
    }
}

/// ElementList wraps the full registry listing: {"elements": [...]}
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementList {
    pub elements: Vec<Element>,
}

/// ElementUpdate is returned by a replace, carrying both versions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementUpdate {
    pub orig_element: Element,
    pub new_element: Element,
}

/// Build the resource path for an element id, e.g. `/element/dmz_1`
pub fn resource_path(id: &str) -> String {
    format!("/element/{}", id)
}
