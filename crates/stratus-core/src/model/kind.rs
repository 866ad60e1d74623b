//! Component categories and the per-category lookup tables.
//!
//! A [`ComponentKind`] drives everything that differs between a database box
//! and a load balancer box: default colors, the icon shape, the label
//! template used by the model builder, and the row assigned by the
//! hierarchical layout.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::model::style::NodeStyle;

/// Icon-shape prefix used by the Draw.io AWS 2021 shape library.
pub const AWS_ICON_PREFIX: &str = "mxgraph.aws4.";

/// Category of a cloud resource.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// Edge and network plumbing: VPCs, load balancers, CDNs, DNS.
    Network,
    /// Firewalls, identity, secrets.
    Security,
    /// API gateways and other request front doors.
    Api,
    /// Containers, functions, instances.
    Compute,
    /// Relational and key-value databases.
    Database,
    /// Object and file storage.
    Storage,
    /// Anything else. Unknown kinds fall back here.
    #[default]
    Generic,
}

impl ComponentKind {
    /// Every kind, in hierarchical layer order.
    pub const ALL: [ComponentKind; 7] = [
        Self::Network,
        Self::Security,
        Self::Api,
        Self::Compute,
        Self::Database,
        Self::Storage,
        Self::Generic,
    ];

    /// Number of distinct rows the hierarchical layout can produce.
    pub const LAYER_COUNT: usize = 5;

    /// Resolves a kind name or one of its common service aliases.
    ///
    /// Matching is case-insensitive. Anything unrecognised yields
    /// [`ComponentKind::Generic`].
    ///
    /// # Examples
    ///
    /// ```
    /// use stratus_core::model::ComponentKind;
    ///
    /// assert_eq!(ComponentKind::from_name("RDS"), ComponentKind::Database);
    /// assert_eq!(ComponentKind::from_name("fargate"), ComponentKind::Compute);
    /// assert_eq!(ComponentKind::from_name("mainframe"), ComponentKind::Generic);
    /// ```
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "network" | "networking" | "edge" | "vpc" | "alb" | "elb" | "nlb" | "cloudfront"
            | "route53" | "cdn" | "dns" | "load_balancer" => Self::Network,
            "security" | "waf" | "iam" | "cognito" | "kms" | "secrets_manager" | "shield"
            | "identity" => Self::Security,
            "api" | "api_gateway" | "apigateway" | "gateway" | "appsync" => Self::Api,
            "compute" | "ecs" | "eks" | "ec2" | "fargate" | "lambda" | "microservice"
            | "service" | "container" | "function" => Self::Compute,
            "database" | "db" | "rds" | "aurora" | "postgres" | "postgresql" | "mysql"
            | "dynamodb" | "elasticache" | "redis" | "cache" => Self::Database,
            "storage" | "s3" | "efs" | "ebs" | "bucket" | "glacier" => Self::Storage,
            _ => Self::Generic,
        }
    }

    /// Infers a kind from a catalog service-group name such as `databases`.
    ///
    /// Tries the name as-is, then with a trailing plural `s` removed.
    pub fn from_group_name(group: &str) -> Self {
        let kind = Self::from_name(group);
        if kind != Self::Generic {
            return kind;
        }
        group
            .strip_suffix('s')
            .map(Self::from_name)
            .unwrap_or(Self::Generic)
    }

    /// Row index used by the hierarchical layout.
    ///
    /// Order: network/security, api, compute, database/storage, generic.
    pub fn layer(self) -> usize {
        match self {
            Self::Network | Self::Security => 0,
            Self::Api => 1,
            Self::Compute => 2,
            Self::Database | Self::Storage => 3,
            Self::Generic => 4,
        }
    }

    /// Default Draw.io resource icon for this kind.
    ///
    /// Generic components have no icon and render as rounded rectangles.
    pub fn icon(self) -> Option<&'static str> {
        match self {
            Self::Network => Some("mxgraph.aws4.vpc"),
            Self::Security => Some("mxgraph.aws4.waf"),
            Self::Api => Some("mxgraph.aws4.api_gateway"),
            Self::Compute => Some("mxgraph.aws4.ecs"),
            Self::Database => Some("mxgraph.aws4.rds"),
            Self::Storage => Some("mxgraph.aws4.s3"),
            Self::Generic => None,
        }
    }

    /// Default label template used when a catalog entry gives no label.
    ///
    /// Placeholders are `{parameter}` names looked up in the service's
    /// parameters; `{name}` is always available.
    pub fn label_template(self) -> &'static str {
        match self {
            Self::Compute => "{name}\n{cpu} vCPU / {memory} MB",
            Self::Database => "{engine}\n{instance_class}",
            Self::Storage => "{name}\n{storage_class}",
            Self::Network | Self::Security | Self::Api | Self::Generic => "{name}",
        }
    }

    /// Default node style (AWS category palette).
    pub fn default_style(self) -> NodeStyle {
        let (fill, stroke) = match self {
            Self::Network => ("#F3EDFF", "#8C4FFF"),
            Self::Security => ("#FCEBEE", "#DD344C"),
            Self::Api => ("#FDE8F2", "#E7157B"),
            Self::Compute => ("#FFF4E5", "#ED7100"),
            Self::Database => ("#FAEBFB", "#C925D1"),
            Self::Storage => ("#F2F8E8", "#7AA116"),
            Self::Generic => ("#FFFFFF", "#232F3E"),
        };
        NodeStyle::default()
            .with_fill_color(fill)
            .with_stroke_color(stroke)
    }
}

/// Normalizes a user-supplied icon name into a Draw.io shape identifier.
///
/// Short names get the AWS library prefix; qualified names pass through.
///
/// # Examples
///
/// ```
/// use stratus_core::model::normalize_icon;
///
/// assert_eq!(normalize_icon("lambda"), "mxgraph.aws4.lambda");
/// assert_eq!(normalize_icon("mxgraph.azure.sql"), "mxgraph.azure.sql");
/// ```
pub fn normalize_icon(icon: &str) -> String {
    if icon.contains('.') {
        icon.to_string()
    } else {
        format!("{AWS_ICON_PREFIX}{icon}")
    }
}

impl FromStr for ComponentKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl From<ComponentKind> for &'static str {
    fn from(val: ComponentKind) -> Self {
        match val {
            ComponentKind::Network => "network",
            ComponentKind::Security => "security",
            ComponentKind::Api => "api",
            ComponentKind::Compute => "compute",
            ComponentKind::Database => "database",
            ComponentKind::Storage => "storage",
            ComponentKind::Generic => "generic",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &'static str = (*self).into();
        write!(f, "{s}")
    }
}
