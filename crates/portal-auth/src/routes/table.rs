//! Route table with explicit slot ownership.
//!
//! Every route names the identity slot it runs under, so resolving a path
//! never has to guess the slot from its shape. Patterns are `/`-separated;
//! `:name` captures one segment and a trailing `*` captures the rest.
//! When several routes match, the most specific wins: literal segments
//! outrank captures, which outrank the catch-all.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use portal_entity::{PermissionRequest, SlotName};

/// Whether a route is for signed-in or signed-out visitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteAccess {
    /// Login-style pages; signed-in visitors are sent to the dashboard.
    Public,
    /// Signed-in pages; signed-out visitors are sent to login.
    Private,
}

impl fmt::Display for RouteAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Private => write!(f, "private"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
    Rest,
}

fn parse_pattern(pattern: &str) -> Vec<Segment> {
    pattern
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| match s {
            "*" => Segment::Rest,
            _ => match s.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(s.to_string()),
            },
        })
        .collect()
}

/// A declared route.
#[derive(Debug, Clone, Serialize)]
pub struct RouteDef {
    /// Stable route name.
    pub name: String,
    /// Path pattern.
    pub pattern: String,
    /// Slot the route runs under.
    pub slot: SlotName,
    /// Public or private.
    pub access: RouteAccess,
    /// Guard request, if the view is permission-protected.
    pub permission: Option<PermissionRequest>,
    #[serde(skip)]
    segments: Vec<Segment>,
}

impl RouteDef {
    fn new(name: &str, slot: SlotName, pattern: &str, access: RouteAccess) -> Self {
        Self {
            name: name.to_string(),
            pattern: pattern.to_string(),
            slot,
            access,
            permission: None,
            segments: parse_pattern(pattern),
        }
    }

    /// A signed-in route.
    pub fn private(name: &str, slot: SlotName, pattern: &str) -> Self {
        Self::new(name, slot, pattern, RouteAccess::Private)
    }

    /// A signed-out route.
    pub fn public(name: &str, slot: SlotName, pattern: &str) -> Self {
        Self::new(name, slot, pattern, RouteAccess::Public)
    }

    /// Guard the route with `action` on `module`.
    pub fn protected(mut self, module: &str, action: &str) -> Self {
        self.permission = Some(PermissionRequest::new(module, action));
        self
    }

    fn specificity(&self) -> i32 {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Literal(_) => 3,
                Segment::Param(_) => 2,
                Segment::Rest => -1,
            })
            .sum()
    }

    fn capture(&self, path: &[&str]) -> Option<BTreeMap<String, String>> {
        let mut params = BTreeMap::new();
        let mut rest = path;
        for segment in &self.segments {
            match segment {
                Segment::Rest => {
                    params.insert("*".to_string(), rest.join("/"));
                    return Some(params);
                }
                Segment::Literal(literal) => {
                    let (head, tail) = rest.split_first()?;
                    if *head != literal.as_str() {
                        return None;
                    }
                    rest = tail;
                }
                Segment::Param(name) => {
                    let (head, tail) = rest.split_first()?;
                    params.insert(name.clone(), (*head).to_string());
                    rest = tail;
                }
            }
        }
        rest.is_empty().then_some(params)
    }
}

/// A resolved path.
#[derive(Debug, Clone, Serialize)]
pub struct RouteMatch<'a> {
    /// The matching route.
    pub route: &'a RouteDef,
    /// Captured parameters; the catch-all is stored under `*`.
    pub params: BTreeMap<String, String>,
}

/// Ordered set of routes.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<RouteDef>,
}

impl RouteTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a route.
    pub fn with(mut self, route: RouteDef) -> Self {
        self.routes.push(route);
        self
    }

    /// Declared routes, in declaration order.
    pub fn routes(&self) -> &[RouteDef] {
        &self.routes
    }

    /// Find the most specific route for `path`; ties go to the earlier
    /// declaration. Query strings and fragments are ignored.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_>> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let mut best: Option<(i32, RouteMatch<'_>)> = None;
        for route in &self.routes {
            let Some(params) = route.capture(&segments) else {
                continue;
            };
            let score = route.specificity();
            if best.as_ref().is_none_or(|(top, _)| score > *top) {
                best = Some((score, RouteMatch { route, params }));
            }
        }
        best.map(|(_, found)| found)
    }
}
