//! Static tool registry and typed tool invocations.
//!
//! The registry is a fixed dispatch table: each tool name maps to one backend route and a set of
//! parameter descriptions. It is built once at startup and never mutated.

use rmcp::model::{JsonObject, Tool, ToolAnnotations};
use serde_json::{Value, json};
use std::sync::Arc;

/// Backend routes reachable through the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolRoute {
    Health,
    SearchProducts,
    GetCarts,
}

impl ToolRoute {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Health => "/health",
            Self::SearchProducts => "/products",
            Self::GetCarts => "/carts",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Integer,
}

impl ParamKind {
    fn json_type(self) -> &'static str {
        match self {
            Self::Integer => "integer",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub kind: ParamKind,
    pub required: bool,
}

/// A tool as advertised to the invoker.
#[derive(Debug, Clone, Copy)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub route: ToolRoute,
    pub params: &'static [ParamSpec],
}

const HEALTH_CHECK: ToolDescriptor = ToolDescriptor {
    name: "health_check",
    description: "Check the backend health endpoint",
    route: ToolRoute::Health,
    params: &[],
};

const SEARCH_PRODUCTS: ToolDescriptor = ToolDescriptor {
    name: "search_products",
    description: "Search for products in a channel catalog",
    route: ToolRoute::SearchProducts,
    params: &[
        ParamSpec {
            name: "channel_id",
            description: "Sales channel identifier",
            kind: ParamKind::Integer,
            required: true,
        },
        ParamSpec {
            name: "catalog_id",
            description: "Catalog identifier within the channel",
            kind: ParamKind::Integer,
            required: true,
        },
    ],
};

const GET_CARTS: ToolDescriptor = ToolDescriptor {
    name: "get_carts",
    description: "Get the shopping carts of a user",
    route: ToolRoute::GetCarts,
    params: &[ParamSpec {
        name: "user_id",
        description: "User whose carts are returned",
        kind: ParamKind::Integer,
        required: true,
    }],
};

impl ToolDescriptor {
    /// JSON Schema for the tool's arguments.
    #[must_use]
    pub fn input_schema(&self) -> Value {
        let mut properties = json!({});
        let mut required: Vec<&str> = Vec::new();

        for param in self.params {
            properties[param.name] = json!({
                "type": param.kind.json_type(),
                "description": param.description,
            });
            if param.required {
                required.push(param.name);
            }
        }

        let mut schema = json!({
            "type": "object",
            "properties": properties,
        });
        if !required.is_empty() {
            schema["required"] = json!(required);
        }
        schema
    }

    /// Render as an MCP `Tool`.
    #[must_use]
    pub fn to_tool(&self) -> Tool {
        let schema_obj = self
            .input_schema()
            .as_object()
            .cloned()
            .unwrap_or_else(JsonObject::new);
        let mut tool = Tool::new(self.name, self.description, Arc::new(schema_obj));
        // Every tool is a plain GET against an external service.
        tool.annotations = Some(ToolAnnotations {
            title: None,
            read_only_hint: Some(true),
            destructive_hint: Some(false),
            idempotent_hint: Some(true),
            open_world_hint: Some(true),
        });
        tool
    }
}

#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
}

impl ToolRegistry {
    /// Build the registry. `health_check` is optional; `get_carts` and `search_products` are
    /// always present.
    #[must_use]
    pub fn new(include_health_check: bool) -> Self {
        let mut tools = Vec::with_capacity(3);
        if include_health_check {
            tools.push(HEALTH_CHECK);
        }
        tools.push(GET_CARTS);
        tools.push(SEARCH_PRODUCTS);
        Self { tools }
    }

    #[must_use]
    pub fn descriptors(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|t| t.name == name)
    }

    #[must_use]
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(ToolDescriptor::to_tool).collect()
    }
}

/// A call argument rendered the way it goes onto the query string.
///
/// Values are forwarded as given: a mistyped id reaches the backend, which rejects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryValue(String);

impl QueryValue {
    fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self(String::new()),
            Value::String(s) => Self(s.clone()),
            other => Self(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

/// A tool call bound to its backend route.
///
/// `required` in the input schema is advisory: an absent argument is left off the query and
/// the backend applies its own default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolInvocation {
    HealthCheck,
    SearchProducts {
        channel_id: Option<QueryValue>,
        catalog_id: Option<QueryValue>,
    },
    GetCarts {
        user_id: Option<QueryValue>,
    },
}

impl ToolInvocation {
    /// Bind raw call arguments to `descriptor`. Keys the tool does not declare are dropped.
    #[must_use]
    pub fn parse(descriptor: &ToolDescriptor, arguments: Option<&JsonObject>) -> Self {
        let arg = |name: &str| {
            arguments
                .and_then(|args| args.get(name))
                .map(QueryValue::from_json)
        };
        match descriptor.route {
            ToolRoute::Health => Self::HealthCheck,
            ToolRoute::SearchProducts => Self::SearchProducts {
                channel_id: arg("channel_id"),
                catalog_id: arg("catalog_id"),
            },
            ToolRoute::GetCarts => Self::GetCarts {
                user_id: arg("user_id"),
            },
        }
    }

    #[must_use]
    pub fn route(&self) -> ToolRoute {
        match self {
            Self::HealthCheck => ToolRoute::Health,
            Self::SearchProducts { .. } => ToolRoute::SearchProducts,
            Self::GetCarts { .. } => ToolRoute::GetCarts,
        }
    }

    /// Query parameters forwarded to the backend, in schema order. Absent arguments are skipped.
    #[must_use]
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let present = |name: &'static str, value: &Option<QueryValue>| {
            value.as_ref().map(|v| (name, v.as_str().to_string()))
        };
        match self {
            Self::HealthCheck => Vec::new(),
            Self::SearchProducts {
                channel_id,
                catalog_id,
            } => [
                present("channel_id", channel_id),
                present("catalog_id", catalog_id),
            ]
            .into_iter()
            .flatten()
            .collect(),
            Self::GetCarts { user_id } => present("user_id", user_id).into_iter().collect(),
        }
    }
}
